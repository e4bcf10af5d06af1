pub mod driver;
pub mod session;

use crate::Result;
use std::time::Duration;

pub use driver::Driver;
pub use session::ChromeSession;

/// A live browser context with one home tab and at most one detail tab.
///
/// Queries (`wait_for`, `page_source`, `current_url`) act on the detail tab
/// while one is open, otherwise on the home tab.
#[async_trait::async_trait]
pub trait Session: Send {
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Polls until `selector` matches or `timeout` elapses.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> bool;

    async fn page_source(&mut self) -> Result<String>;

    async fn current_url(&mut self) -> Result<String>;

    /// Clicks the home-tab link whose visible text is `link_text`, switches to
    /// the tab it opens and returns that tab's URL once loaded.
    ///
    /// Fails with `ScraperError::LinkNotFound` when no such link exists.
    async fn open_detail(&mut self, link_text: &str) -> Result<String>;

    /// Closes the detail tab, if any, and returns to the home tab.
    async fn close_detail(&mut self) -> Result<()>;

    async fn shutdown(&mut self) -> Result<()>;
}
