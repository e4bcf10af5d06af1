use crate::{
    Result, ScraperError,
    client::HttpFetcher,
    config::Config,
    models::AthleteProfile,
    scrape::{AthleteSearch, SearchResults, athletes::DEFAULT_YEARS},
};

pub async fn handle_search(config: &Config, name: &str, max_pages: usize) -> Result<SearchResults> {
    let fetcher = HttpFetcher::from_config(config)?;
    let search = AthleteSearch::new(
        &fetcher,
        config.site.athletes_url(),
        config.timing.page_delay(),
    );

    Ok(SearchResults {
        query: name.to_string(),
        athletes: search.search(name, max_pages).await,
    })
}

pub async fn handle_profile(config: &Config, url: &str, years: Vec<i32>) -> Result<AthleteProfile> {
    // Search results carry site-relative links.
    let url = url::Url::parse(&config.site.base_url)
        .and_then(|base| base.join(url))
        .map_err(|e| ScraperError::InvalidUrl(format!("{}: {}", url, e)))?;
    let years = if years.is_empty() {
        DEFAULT_YEARS.collect()
    } else {
        years
    };

    let fetcher = HttpFetcher::from_config(config)?;
    let search = AthleteSearch::new(
        &fetcher,
        config.site.athletes_url(),
        config.timing.page_delay(),
    );

    Ok(search.profile(url.as_str(), &years).await)
}
