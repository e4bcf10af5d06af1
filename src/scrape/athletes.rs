//! Athlete search and per-season profile scraping over plain HTTP.

use super::enumerator::cell_text;
use crate::{
    Result,
    client::PageSource,
    models::{AthleteProfile, AthleteSummary, ProfileResult},
    output::{self, OutputFormatter},
};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

pub const DEFAULT_YEARS: std::ops::RangeInclusive<i32> = 2015..=2023;

static ODD_ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr.ligne1").expect("valid selector"));
static EVEN_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr.ligne2").expect("valid selector"));
static INFO_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.tableau1").expect("valid selector"));
static RESULTS_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.tableau2").expect("valid selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid selector"));

pub fn search_url(athletes_url: &str, name: &str, page: usize) -> String {
    let name: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
    format!("{}?nom={}&p={}", athletes_url, name, page)
}

fn cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.select(&CELL).collect()
}

/// `ligne1` rows come before `ligne2` rows.
pub fn parse_search_page(html: &str) -> Vec<AthleteSummary> {
    let document = Html::parse_document(html);

    document
        .select(&ODD_ROW)
        .chain(document.select(&EVEN_ROW))
        .filter_map(|row| {
            let cols = cells(&row);
            if cols.len() < 3 {
                return None;
            }
            Some(AthleteSummary {
                name: cell_text(&cols[0]),
                club: cell_text(&cols[1]),
                link: cols[0]
                    .select(&ANCHOR)
                    .next()
                    .and_then(|a| a.value().attr("href"))
                    .map(str::to_string),
            })
        })
        .collect()
}

pub fn parse_personal_info(html: &str) -> Vec<(String, String)> {
    let document = Html::parse_document(html);
    let Some(table) = document.select(&INFO_TABLE).next() else {
        return Vec::new();
    };

    table
        .select(&ROW)
        .filter_map(|row| {
            let cols = cells(&row);
            (cols.len() >= 2).then(|| (cell_text(&cols[0]), cell_text(&cols[1])))
        })
        .collect()
}

/// Rows of the first `tableau2` table, header row excluded.
pub fn parse_profile_results(html: &str) -> Vec<ProfileResult> {
    let document = Html::parse_document(html);
    let Some(table) = document.select(&RESULTS_TABLE).next() else {
        return Vec::new();
    };

    table
        .select(&ROW)
        .skip(1)
        .filter_map(|row| {
            let cols = cells(&row);
            if cols.len() < 6 {
                return None;
            }
            Some(ProfileResult {
                date: cell_text(&cols[0]),
                competition: cell_text(&cols[1]),
                place: cell_text(&cols[2]),
                performance: cell_text(&cols[3]),
                wind: cell_text(&cols[4]),
                points: cell_text(&cols[5]),
            })
        })
        .collect()
}

pub struct AthleteSearch<'a, P: PageSource + ?Sized> {
    source: &'a P,
    athletes_url: String,
    delay: Duration,
}

impl<'a, P: PageSource + ?Sized> AthleteSearch<'a, P> {
    pub fn new(source: &'a P, athletes_url: impl Into<String>, delay: Duration) -> Self {
        Self {
            source,
            athletes_url: athletes_url.into(),
            delay,
        }
    }

    /// Stops at the first empty page, after `max_pages`, or on a fetch error
    /// (logged), returning what was collected.
    pub async fn search(&self, name: &str, max_pages: usize) -> Vec<AthleteSummary> {
        let mut athletes = Vec::new();

        for page in 1..=max_pages {
            let url = search_url(&self.athletes_url, name, page);
            let html = match self.source.fetch_static(&url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("Error searching athletes: {}", e);
                    break;
                }
            };

            let rows = parse_search_page(&html);
            if rows.is_empty() {
                break;
            }
            athletes.extend(rows);
            tokio::time::sleep(self.delay).await;
        }

        athletes
    }

    /// Personal info comes from the first season only; a season whose fetch
    /// fails is logged and skipped.
    pub async fn profile(&self, athlete_url: &str, years: &[i32]) -> AthleteProfile {
        let mut profile = AthleteProfile::default();

        for (i, year) in years.iter().enumerate() {
            let url = format!("{}&saison={}", athlete_url, year);
            let html = match self.source.fetch_static(&url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("Error getting results for {}: {}", year, e);
                    continue;
                }
            };

            if i == 0 {
                profile.personal_info.extend(parse_personal_info(&html));
            }
            profile.results.extend(parse_profile_results(&html));
            tokio::time::sleep(self.delay).await;
        }

        profile
    }
}

#[derive(Debug, serde::Serialize)]
pub struct SearchResults {
    pub query: String,
    pub athletes: Vec<AthleteSummary>,
}

impl OutputFormatter for SearchResults {
    fn format_text(&self) -> String {
        use crate::output::{TableBuilder, text};
        let mut table = TableBuilder::new().headers(vec!["Name".into(), "Club".into()]);
        for athlete in &self.athletes {
            table = table.row(vec![
                text::truncate(&athlete.name, 20),
                text::truncate(&athlete.club, 20),
            ]);
        }
        format!(
            "{}\n{}{}",
            text::section(&format!("Athletes matching \"{}\"", self.query)),
            table.build(),
            text::info(&format!("{} athletes", self.athletes.len()))
        )
    }

    fn format_json(&self, pretty: bool) -> Result<String> {
        output::to_json(&self.athletes, pretty)
    }
}

impl OutputFormatter for AthleteProfile {
    fn format_text(&self) -> String {
        use crate::output::{TableBuilder, text};
        let mut lines = vec![text::section("Athlete")];
        for (key, value) in &self.personal_info {
            lines.push(text::key_value(key, value));
        }

        let mut table = TableBuilder::new().headers(vec![
            "Date".into(),
            "Competition".into(),
            "Place".into(),
            "Performance".into(),
        ]);
        for result in &self.results {
            table = table.row(vec![
                result.date.clone(),
                text::truncate(&result.competition, 20),
                result.place.clone(),
                result.performance.clone(),
            ]);
        }
        lines.push(text::subsection(&format!("{} results", self.results.len())));
        lines.push(table.build());
        lines.join("\n")
    }

    fn format_json(&self, pretty: bool) -> Result<String> {
        output::to_json(self, pretty)
    }
}
