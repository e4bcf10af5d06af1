use crate::{
    Result,
    client::PageSource,
    config::SiteConfig,
    models::Event,
    output::{self, OutputFormatter},
};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::time::Duration;

pub const LINK_MARKER_CLASS: &str = "datasCMP0";
pub const MIN_LISTING_CELLS: usize = 18;

// Column offsets relative to the competition link cell.
const DATE_OFFSET: isize = -4;
const TYPE_OFFSET: isize = -2;
const LOCATION_OFFSET: isize = 2;

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid selector"));

pub fn listing_url(base_url: &str, listing_type: &str, year: i32, page: usize) -> String {
    let listing_type: String = url::form_urlencoded::byte_serialize(listing_type.as_bytes()).collect();
    format!(
        "{}/asp.net/liste.aspx?frmpostback=true&frmbase=resultats&frmmode=2&frmespace=0&frmsaison={}&frmtype1={}&frmposition={}",
        base_url.trim_end_matches('/'),
        year,
        listing_type,
        page
    )
}

pub(crate) fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn offset_text(cells: &[ElementRef], index: usize, offset: isize) -> String {
    index
        .checked_add_signed(offset)
        .and_then(|i| cells.get(i))
        .map(cell_text)
        .unwrap_or_default()
}

/// Parses one listing page into events, in page order. URLs are not
/// deduplicated here.
pub fn parse_listing(html: &str, base_url: &str) -> Vec<Event> {
    let document = Html::parse_document(html);
    let base = base_url.trim_end_matches('/');
    let mut events = Vec::new();

    for row in document.select(&ROW) {
        let cells: Vec<ElementRef> = row.select(&CELL).collect();
        if cells.len() < MIN_LISTING_CELLS {
            continue;
        }

        let link_cell = cells.iter().enumerate().find_map(|(i, cell)| {
            let marked = cell.value().classes().any(|c| c == LINK_MARKER_CLASS);
            if !marked {
                return None;
            }
            cell.select(&ANCHOR).next().map(|a| (i, a))
        });

        let Some((index, link)) = link_cell else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };

        events.push(Event::new(
            offset_text(&cells, index, DATE_OFFSET),
            link.text().collect::<String>().trim().to_string(),
            offset_text(&cells, index, LOCATION_OFFSET),
            offset_text(&cells, index, TYPE_OFFSET),
            format!("{}{}", base, href),
        ));
    }

    events
}

/// Walks the season listing page by page until a page brings no unseen URL.
pub struct EventEnumerator<'a, P: PageSource + ?Sized> {
    source: &'a P,
    base_url: String,
    listing_type: String,
    delay: Duration,
}

impl<'a, P: PageSource + ?Sized> EventEnumerator<'a, P> {
    pub fn new(source: &'a P, site: &SiteConfig, delay: Duration) -> Self {
        Self {
            source,
            base_url: site.base_url.clone(),
            listing_type: site.listing_type.clone(),
            delay,
        }
    }

    /// Events named in `skip_names` are left out of the result but their URLs
    /// still count as new, so they keep pagination going.
    pub async fn enumerate(&self, year: i32, skip_names: &HashSet<String>) -> Result<Vec<Event>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut events = Vec::new();
        let mut page = 0;

        loop {
            let url = listing_url(&self.base_url, &self.listing_type, year, page);
            let html = self.source.fetch_static(&url).await?;

            let mut found_new = false;
            for event in parse_listing(&html, &self.base_url) {
                if !seen.insert(event.url.clone()) {
                    continue;
                }
                found_new = true;

                if skip_names.contains(&event.name) {
                    tracing::debug!("Skipping event {}", event.name);
                    continue;
                }
                events.push(event);
            }

            if !found_new {
                tracing::info!(
                    "Listing page {} had no new events, {} events for {}",
                    page,
                    events.len(),
                    year
                );
                break;
            }

            tracing::debug!("Listing page {}: {} events so far", page, events.len());
            tokio::time::sleep(self.delay).await;
            page += 1;
        }

        Ok(events)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct EventList {
    pub year: i32,
    pub events: Vec<Event>,
}

impl OutputFormatter for EventList {
    fn format_text(&self) -> String {
        use crate::output::{TableBuilder, text};
        let mut table = TableBuilder::new().headers(vec![
            "Date".into(),
            "Type".into(),
            "Competition".into(),
            "Location".into(),
        ]);
        for event in &self.events {
            table = table.row(vec![
                event.date.clone(),
                event.event_type.clone(),
                text::truncate(&event.name, 20),
                text::truncate(&event.location, 20),
            ]);
        }
        format!(
            "{}\n{}{}",
            text::section(&format!("Events {}", self.year)),
            table.build(),
            text::info(&format!("{} events", self.events.len()))
        )
    }

    fn format_json(&self, pretty: bool) -> Result<String> {
        output::to_json(&self.events, pretty)
    }
}
