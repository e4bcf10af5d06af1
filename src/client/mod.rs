pub mod http;

use crate::Result;

pub use http::HttpFetcher;

/// Stateless page retrieval: one GET, one HTML body.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_static(&self, url: &str) -> Result<String>;
}
