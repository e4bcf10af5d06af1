#![allow(dead_code)]

use async_trait::async_trait;
use ffa_scraper::{Result, ScraperError, chrome::Session, client::PageSource};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const BASE: &str = "https://bases.athle.fr";

pub fn event_url(id: u32) -> String {
    format!("{}/asp.net/liste.aspx?frmbase=resultats&frmcompetition={}", BASE, id)
}

/// One 18-cell listing row with the competition link in cell 6.
pub fn listing_row(name: &str, id: u32) -> String {
    let mut cells = vec![String::from("<td></td>"); 18];
    cells[2] = "<td>14/03/21</td>".into();
    cells[4] = "<td>Route</td>".into();
    cells[6] = format!(
        "<td class=\"datasCMP0\"><a href=\"/asp.net/liste.aspx?frmbase=resultats&amp;frmcompetition={}\">{}</a></td>",
        id, name
    );
    cells[8] = "<td>PARIS</td>".into();
    format!("<tr>{}</tr>", cells.concat())
}

pub fn listing_page(events: &[(&str, u32)]) -> String {
    let rows: String = events.iter().map(|(n, id)| listing_row(n, *id)).collect();
    format!("<html><body><table>{}</table></body></html>", rows)
}

/// Listing pages served by `frmposition`; pages past the end are empty.
pub struct PagedListing {
    pages: Vec<String>,
    pub requested: Mutex<Vec<usize>>,
}

impl PagedListing {
    pub fn new(pages: Vec<String>) -> Self {
        Self {
            pages,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<usize> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for PagedListing {
    async fn fetch_static(&self, url: &str) -> Result<String> {
        let page: usize = url
            .rsplit("frmposition=")
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| ScraperError::Network(format!("unexpected url {}", url)))?;
        self.requested.lock().unwrap().push(page);
        Ok(self
            .pages
            .get(page)
            .cloned()
            .unwrap_or_else(|| "<html><body></body></html>".into()))
    }
}

pub fn results_row(rank: u32, name: &str) -> String {
    format!(
        "<tr><td>{}</td><td></td><td>0:3{}:00</td><td></td><td><a href=\"javascript:bddThrowAthlete('resultats', {})\">{}</a></td></tr>",
        rank, rank, rank, name
    )
}

pub fn results_page(names: &[&str]) -> String {
    let rows: String = names
        .iter()
        .enumerate()
        .map(|(i, n)| results_row(i as u32 + 1, n))
        .collect();
    format!(
        "<html><body><table class=\"datas1\"><tr><td>Rang</td><td></td><td>Temps</td><td></td><td>Athlète</td></tr>{}</table></body></html>",
        rows
    )
}

/// A listing source that is always down.
pub struct Offline;

#[async_trait]
impl PageSource for Offline {
    async fn fetch_static(&self, url: &str) -> Result<String> {
        Err(ScraperError::Network(format!("{} returned 503 Service Unavailable", url)))
    }
}

pub fn athlete_page(name: &str) -> String {
    format!("{}/asp.net/athletes.aspx?base=resultats&seq={}", BASE, name.replace(' ', "_"))
}

/// In-memory browser: event pages by URL, athlete detail tabs by link text.
#[derive(Default)]
pub struct ScriptedSession {
    pages: HashMap<String, String>,
    unreachable: HashSet<String>,
    missing_links: HashSet<String>,
    faulty_links: HashSet<String>,
    current: String,
    detail: Option<String>,
    pub opened: Vec<String>,
    pub shutdowns: Arc<AtomicUsize>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: String) -> Self {
        self.pages.insert(url.to_string(), html);
        self
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.insert(url.to_string());
        self
    }

    pub fn missing_link(mut self, name: &str) -> Self {
        self.missing_links.insert(name.to_string());
        self
    }

    pub fn faulty_link(mut self, name: &str) -> Self {
        self.faulty_links.insert(name.to_string());
        self
    }

    pub fn detail_open(&self) -> bool {
        self.detail.is_some()
    }

    pub fn shutdown_count(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Session for ScriptedSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        if self.unreachable.contains(url) {
            return Err(ScraperError::PageLoadTimeout(30));
        }
        self.current = url.to_string();
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, _timeout: Duration) -> bool {
        let Some(html) = self.pages.get(&self.current) else {
            return false;
        };
        match selector {
            ".datas1" => html.contains("datas1"),
            _ => true,
        }
    }

    async fn page_source(&mut self) -> Result<String> {
        if let Some(detail) = &self.detail {
            return Ok(format!("<div class=\"innerDatas\">{}</div>", detail));
        }
        Ok(self.pages.get(&self.current).cloned().unwrap_or_default())
    }

    async fn current_url(&mut self) -> Result<String> {
        Ok(self.detail.clone().unwrap_or_else(|| self.current.clone()))
    }

    async fn open_detail(&mut self, link_text: &str) -> Result<String> {
        if self.missing_links.contains(link_text) {
            return Err(ScraperError::LinkNotFound {
                text: link_text.to_string(),
            });
        }
        let url = athlete_page(link_text);
        self.detail = Some(url.clone());
        if self.faulty_links.contains(link_text) {
            return Err(ScraperError::Browser("detail tab crashed".into()));
        }
        self.opened.push(link_text.to_string());
        Ok(url)
    }

    async fn close_detail(&mut self) -> Result<()> {
        self.detail = None;
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
