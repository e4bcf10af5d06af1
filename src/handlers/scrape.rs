use crate::{
    Result,
    chrome::Driver,
    client::HttpFetcher,
    config::Config,
    scrape::{EventEnumerator, EventList, RunOutput, ScrapePipeline},
    store,
};
use std::collections::HashSet;
use std::path::PathBuf;

pub async fn handle_events(
    config: &Config,
    year: i32,
    skip: Vec<String>,
    output: Option<PathBuf>,
) -> Result<EventList> {
    let fetcher = HttpFetcher::from_config(config)?;
    let enumerator = EventEnumerator::new(&fetcher, &config.site, config.timing.page_delay());

    let skip: HashSet<String> = config.scrape.skip_events.iter().cloned().chain(skip).collect();
    let events = enumerator.enumerate(year, &skip).await?;

    if let Some(path) = output {
        store::write_json(&path, &events)?;
        tracing::info!("Wrote {} events to {}", events.len(), path.display());
    }

    Ok(EventList { year, events })
}

#[derive(Debug, Default)]
pub struct ScrapeOptions {
    pub year: Option<i32>,
    pub registry: Option<PathBuf>,
    pub results: Option<PathBuf>,
    pub events_output: Option<PathBuf>,
    pub limit: Option<usize>,
}

pub async fn handle_scrape(config: &Config, opts: ScrapeOptions) -> Result<RunOutput> {
    let year = opts.year.unwrap_or(config.scrape.year);
    let registry_path = opts
        .registry
        .unwrap_or_else(|| config.storage.registry_path.clone());

    crate::utils::signal::setup_handlers()?;

    let fetcher = HttpFetcher::from_config(config)?;
    let pipeline = ScrapePipeline::new(&fetcher, config).with_limit(opts.limit);

    let mut driver = Driver::launch(config).await?;
    let run = pipeline
        .run_persisted(year, &mut driver, &registry_path)
        .await?;

    if let Some(path) = opts.results.or_else(|| config.storage.results_path.clone()) {
        store::write_results_csv(&path, &run.results)?;
        tracing::info!("Wrote {} results to {}", run.results.len(), path.display());
    }
    if let Some(path) = opts.events_output {
        store::write_json(&path, &run.events)?;
    }

    Ok(run)
}
