use super::PageSource;
use crate::{Result, ScraperError, config::Config};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(user_agent)
            .map_err(|e| ScraperError::ConfigError(format!("Invalid user agent: {}", e)))?;
        headers.insert(USER_AGENT, agent);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ScraperError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.site.user_agent, config.timing.request_timeout())
    }
}

#[async_trait::async_trait]
impl PageSource for HttpFetcher {
    async fn fetch_static(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScraperError::Network(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::Network(format!("{} returned {}", url, status)));
        }

        response
            .text()
            .await
            .map_err(|e| ScraperError::Network(format!("{}: failed to read body: {}", url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_user_agent() {
        let result = HttpFetcher::new("bad\nagent", Duration::from_secs(1));
        assert!(matches!(result, Err(ScraperError::ConfigError(_))));
    }

    #[test]
    fn test_from_default_config() {
        assert!(HttpFetcher::from_config(&Config::default()).is_ok());
    }
}
