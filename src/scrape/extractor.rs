use super::enumerator::cell_text;
use crate::{Result, ScraperError, chrome::Session, models::AthleteResult};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::time::Duration;

pub const RESULTS_MARKER: &str = ".datas1";
pub const BODY_MARKER: &str = "body";
pub const ERROR_BANNER: &str = r#"div[style*="background-color:#990000"]"#;
pub const ERROR_PHRASE: &str = "Code Processing Error";
pub const SORT_HEADER_TOKEN: &str = "Tri";
pub const MIN_RESULT_CELLS: usize = 5;
pub const SNAPSHOT_CHARS: usize = 500;

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("valid selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid selector"));
static BANNER: Lazy<Selector> = Lazy::new(|| Selector::parse(ERROR_BANNER).expect("valid selector"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub rank: String,
    pub time: String,
    pub athlete_name: String,
}

#[derive(Debug, Clone)]
pub struct ExtractionFault {
    pub url: String,
    pub message: String,
    pub snapshot: String,
}

/// Outcome of visiting one event page.
#[derive(Debug)]
pub enum Extraction {
    Complete(Vec<AthleteResult>),
    /// A fault stopped the event; `results` holds every row extracted before it.
    Partial {
        results: Vec<AthleteResult>,
        fault: ExtractionFault,
    },
    Unavailable,
    ErrorPage,
}

impl Extraction {
    pub fn results(&self) -> &[AthleteResult] {
        match self {
            Self::Complete(results) | Self::Partial { results, .. } => results,
            Self::Unavailable | Self::ErrorPage => &[],
        }
    }

    pub fn into_results(self) -> Vec<AthleteResult> {
        match self {
            Self::Complete(results) | Self::Partial { results, .. } => results,
            Self::Unavailable | Self::ErrorPage => Vec::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable | Self::ErrorPage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoad {
    Results,
    BodyOnly,
    Unavailable,
}

/// Navigates to `url` and waits for the results table, then for any body.
/// Load timeouts come back as `PageLoad::Unavailable`, never as errors.
pub async fn load_event_page<S: Session + ?Sized>(
    session: &mut S,
    url: &str,
    timeout: Duration,
) -> Result<PageLoad> {
    match session.navigate(url).await {
        Ok(()) => {}
        Err(ScraperError::PageLoadTimeout(secs)) => {
            tracing::warn!("Navigation to {} timed out after {}s", url, secs);
            return Ok(PageLoad::Unavailable);
        }
        Err(e) => return Err(e),
    }

    if session.wait_for(RESULTS_MARKER, timeout).await {
        return Ok(PageLoad::Results);
    }

    tracing::info!("No results table found, checking for alternative content...");
    if session.wait_for(BODY_MARKER, timeout).await {
        return Ok(PageLoad::BodyOnly);
    }

    Ok(PageLoad::Unavailable)
}

pub fn has_error_banner(html: &str) -> bool {
    let document = Html::parse_document(html);
    document
        .select(&BANNER)
        .next()
        .is_some_and(|banner| banner.text().collect::<String>().contains(ERROR_PHRASE))
}

fn is_sort_header(first_row: &ElementRef) -> bool {
    first_row
        .select(&CELL)
        .any(|cell| cell.text().collect::<String>().contains(SORT_HEADER_TOKEN))
}

/// Collects athlete rows from every results table, in document order.
pub fn parse_result_rows(html: &str) -> Vec<ResultRow> {
    let document = Html::parse_document(html);
    let mut rows = Vec::new();

    for table in document.select(&TABLE) {
        let table_rows: Vec<ElementRef> = table.select(&ROW).collect();
        let Some(first) = table_rows.first() else {
            continue;
        };
        if is_sort_header(first) {
            continue;
        }

        for row in &table_rows {
            let cells: Vec<ElementRef> = row.select(&CELL).collect();
            if cells.len() < MIN_RESULT_CELLS {
                continue;
            }
            let Some(link) = cells[4].select(&ANCHOR).next() else {
                continue;
            };

            rows.push(ResultRow {
                rank: cell_text(&cells[0]),
                time: cell_text(&cells[2]),
                athlete_name: cell_text(&link),
            });
        }
    }

    rows
}

fn snapshot(source: &str) -> String {
    source.chars().take(SNAPSHOT_CHARS).collect()
}

enum Stage {
    Done,
    Unavailable,
    ErrorPage,
}

pub struct ResultExtractor {
    wait_timeout: Duration,
}

impl ResultExtractor {
    pub fn new(wait_timeout: Duration) -> Self {
        Self { wait_timeout }
    }

    /// Extracts the athletes of one event. Never fails: faults are reported in
    /// the returned `Extraction` together with the rows gathered so far.
    pub async fn extract<S: Session + ?Sized>(
        &self,
        session: &mut S,
        event_url: &str,
        skip_athletes: &HashSet<String>,
    ) -> Extraction {
        tracing::info!("Getting athletes from: {}", event_url);
        let mut results = Vec::new();

        match self.run(session, event_url, skip_athletes, &mut results).await {
            Ok(Stage::Done) => Extraction::Complete(results),
            Ok(Stage::Unavailable) => Extraction::Unavailable,
            Ok(Stage::ErrorPage) => Extraction::ErrorPage,
            Err(err) => {
                let fault = Self::diagnose(session, event_url, &err).await;
                if let Err(e) = session.close_detail().await {
                    tracing::warn!("Could not return to the home tab: {}", e);
                }
                Extraction::Partial { results, fault }
            }
        }
    }

    async fn run<S: Session + ?Sized>(
        &self,
        session: &mut S,
        event_url: &str,
        skip_athletes: &HashSet<String>,
        results: &mut Vec<AthleteResult>,
    ) -> Result<Stage> {
        if load_event_page(session, event_url, self.wait_timeout).await? == PageLoad::Unavailable {
            tracing::warn!("Page failed to load completely: {}", event_url);
            return Ok(Stage::Unavailable);
        }

        let source = session.page_source().await?;
        if has_error_banner(&source) {
            tracing::warn!("Competition results not found or unavailable: {}", event_url);
            return Ok(Stage::ErrorPage);
        }

        for row in parse_result_rows(&source) {
            if skip_athletes.contains(&row.athlete_name) {
                tracing::debug!("Skipping known athlete {}", row.athlete_name);
                continue;
            }

            let athlete_page = match session.open_detail(&row.athlete_name).await {
                Ok(url) => url,
                Err(ScraperError::LinkNotFound { text }) => {
                    tracing::warn!("Error finding link for {}", text);
                    continue;
                }
                Err(e) => return Err(e),
            };

            tracing::debug!("{} -> {}", row.athlete_name, athlete_page);
            results.push(AthleteResult {
                rank: row.rank,
                time: row.time,
                athlete_name: row.athlete_name,
                athlete_page,
            });

            session.close_detail().await?;
        }

        Ok(Stage::Done)
    }

    async fn diagnose<S: Session + ?Sized>(
        session: &mut S,
        event_url: &str,
        err: &ScraperError,
    ) -> ExtractionFault {
        let url = session
            .current_url()
            .await
            .unwrap_or_else(|_| event_url.to_string());
        let snapshot = session
            .page_source()
            .await
            .map(|s| snapshot(&s))
            .unwrap_or_default();

        let error = ScraperError::Extraction {
            url: url.clone(),
            message: err.to_string(),
        };
        tracing::error!("{}", error);
        tracing::error!("Page source: {}", snapshot);

        ExtractionFault {
            url,
            message: error.to_string(),
            snapshot,
        }
    }
}
