use super::enumerator::EventEnumerator;
use super::extractor::{Extraction, ResultExtractor};
use crate::{
    Result,
    chrome::{Driver, Session},
    client::PageSource,
    config::Config,
    models::{AthleteResult, Event, RunSummary},
    output::{self, OutputFormatter},
    store::AthleteRegistry,
    utils::signal,
};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub summary: RunSummary,
    pub events: Vec<Event>,
    pub results: Vec<AthleteResult>,
}

/// One season scrape: enumerate events, then visit each with the browser.
pub struct ScrapePipeline<'a, P: PageSource + ?Sized> {
    enumerator: EventEnumerator<'a, P>,
    extractor: ResultExtractor,
    skip_events: HashSet<String>,
    skip_athletes: HashSet<String>,
    limit: Option<usize>,
    interrupted: fn() -> bool,
}

impl<'a, P: PageSource + ?Sized> ScrapePipeline<'a, P> {
    pub fn new(source: &'a P, config: &Config) -> Self {
        Self {
            enumerator: EventEnumerator::new(source, &config.site, config.timing.page_delay()),
            extractor: ResultExtractor::new(config.timing.wait_timeout()),
            skip_events: config.scrape.skip_events.iter().cloned().collect(),
            skip_athletes: config.scrape.skip_athletes.iter().cloned().collect(),
            limit: None,
            interrupted: signal::is_shutdown,
        }
    }

    /// Visit at most `limit` events.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_interrupt_check(mut self, check: fn() -> bool) -> Self {
        self.interrupted = check;
        self
    }

    /// Every extracted row is appended to `registry`; persisting it is left
    /// to the caller so that it also happens when this returns an error.
    pub async fn execute<S: Session + ?Sized>(
        &self,
        year: i32,
        session: &mut S,
        registry: &mut AthleteRegistry,
    ) -> Result<RunOutput> {
        let mut summary = RunSummary::new(year);

        let mut events = self.enumerator.enumerate(year, &self.skip_events).await?;
        summary.events_found = events.len();
        if let Some(limit) = self.limit {
            events.truncate(limit);
        }
        tracing::info!("Found {} events for {}", summary.events_found, year);

        let mut skip: HashSet<String> = self.skip_athletes.clone();
        skip.extend(registry.names().map(str::to_string));

        let mut results = Vec::new();
        let total = events.len();

        for (i, event) in events.iter().enumerate() {
            if (self.interrupted)() {
                tracing::warn!("Interrupted after {} of {} events", i, total);
                summary.interrupted = true;
                break;
            }

            tracing::info!("Processing event {}/{}: {}", i + 1, total, event.name);
            let extraction = self.extractor.extract(session, &event.url, &skip).await;

            summary.events_visited += 1;
            match &extraction {
                Extraction::Unavailable | Extraction::ErrorPage => summary.events_unavailable += 1,
                Extraction::Partial { fault, .. } => {
                    tracing::warn!("Event {} stopped early: {}", event.name, fault.message);
                    summary.events_faulted += 1;
                }
                Extraction::Complete(_) => {}
            }

            let found = extraction.into_results();
            tracing::info!("Found {} new athletes in {}", found.len(), event.name);
            registry.extend_results(&found);
            skip.extend(found.iter().map(|r| r.athlete_name.clone()));
            results.extend(found);
        }

        summary.results_extracted = results.len();
        summary.registry_size = registry.len();
        summary.finished_at = Some(Utc::now());

        Ok(RunOutput {
            summary,
            events,
            results,
        })
    }

    /// Loads the registry, runs, closes the browser and saves the registry,
    /// whatever the outcome of the run. A failed save after a failed run is
    /// logged and the run error is returned. The browser is closed even when
    /// the registry cannot be read, and an unreadable file is left as is.
    pub async fn run_persisted<S: Session>(
        &self,
        year: i32,
        driver: &mut Driver<S>,
        registry_path: &Path,
    ) -> Result<RunOutput> {
        let mut registry = match AthleteRegistry::load(registry_path) {
            Ok(registry) => registry,
            Err(e) => return driver.finish(Err(e)).await,
        };

        let outcome = match driver.session() {
            Ok(session) => self.execute(year, session, &mut registry).await,
            Err(e) => Err(e),
        };
        let mut outcome = driver.finish(outcome).await;

        match registry.save(registry_path) {
            Ok(saved) => {
                if let Ok(output) = &mut outcome {
                    output.summary.registry_size = saved;
                }
                outcome
            }
            Err(save_err) => match outcome {
                Ok(_) => Err(save_err),
                Err(run_err) => {
                    tracing::error!("Could not save registry: {}", save_err);
                    Err(run_err)
                }
            },
        }
    }
}

impl OutputFormatter for RunOutput {
    fn format_text(&self) -> String {
        use crate::output::text;
        let s = &self.summary;
        let mut lines = vec![
            text::section(&format!("Scrape {}", s.year)),
            text::key_value("Events found", &s.events_found.to_string()),
            text::key_value("Events visited", &s.events_visited.to_string()),
            text::key_value("Unavailable", &s.events_unavailable.to_string()),
            text::key_value("Stopped early", &s.events_faulted.to_string()),
            text::key_value("New athletes", &s.results_extracted.to_string()),
            text::key_value("Registry size", &s.registry_size.to_string()),
        ];
        if let Some(finished) = s.finished_at {
            let elapsed = (finished - s.started_at).num_milliseconds().max(0) as u64;
            lines.push(text::key_value("Duration", &text::format_duration_ms(elapsed)));
        }
        if s.interrupted {
            lines.push(text::warning("Run interrupted, partial results saved"));
        } else {
            lines.push(text::success("Run complete"));
        }
        lines.join("\n")
    }

    fn format_json(&self, pretty: bool) -> Result<String> {
        output::to_json(&self.summary, pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_output_text_flags_interruption() {
        let mut summary = RunSummary::new(2023);
        summary.interrupted = true;
        summary.finished_at = Some(summary.started_at);
        let output = RunOutput {
            summary,
            events: Vec::new(),
            results: Vec::new(),
        };

        let text = output.format_text();
        assert!(text.contains("Scrape 2023"));
        assert!(text.contains("interrupted"));
    }
}
