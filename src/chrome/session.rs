use super::Session;
use crate::{Result, ScraperError, config::Config, timeouts::ms, utils};
use chromiumoxide::cdp::browser_protocol::target::TargetId;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::collections::HashSet;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const DETAIL_MARKER: &str = ".innerDatas";

pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    home: Page,
    detail: Option<Page>,
    wait_timeout: Duration,
    navigation_timeout: Duration,
}

impl ChromeSession {
    pub async fn launch(config: &Config) -> Result<Self> {
        let chrome_path = config
            .browser
            .chrome_path
            .clone()
            .map(Ok)
            .unwrap_or_else(utils::find_chrome_executable)?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(&chrome_path)
            .window_size(config.browser.window_width, config.browser.window_height)
            .request_timeout(config.timing.navigation_timeout())
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--ignore-certificate-errors")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");

        if !config.browser.headless {
            builder = builder.with_head();
        }

        let browser_config = builder.build().map_err(ScraperError::LaunchFailed)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScraperError::LaunchFailed(e.to_string()))?;

        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

        tokio::time::sleep(Duration::from_millis(ms::BROWSER_STARTUP)).await;

        let home = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::LaunchFailed(format!("Failed to open home tab: {}", e)))?;

        tracing::info!("Chrome session started ({})", chrome_path.display());

        Ok(Self {
            browser,
            handler,
            home,
            detail: None,
            wait_timeout: config.timing.wait_timeout(),
            navigation_timeout: config.timing.navigation_timeout(),
        })
    }

    fn active(&self) -> &Page {
        self.detail.as_ref().unwrap_or(&self.home)
    }

    async fn open_targets(&self) -> Result<HashSet<TargetId>> {
        Ok(self
            .browser
            .pages()
            .await?
            .iter()
            .map(|p| p.target_id().clone())
            .collect())
    }

    async fn wait_for_new_tab(&self, known: &HashSet<TargetId>) -> Result<Page> {
        let start = tokio::time::Instant::now();
        loop {
            tokio::time::sleep(Duration::from_millis(ms::TAB_OPEN_SETTLE)).await;

            if let Some(page) = self
                .browser
                .pages()
                .await?
                .into_iter()
                .find(|p| !known.contains(p.target_id()))
            {
                return Ok(page);
            }

            if start.elapsed() >= self.wait_timeout {
                return Err(ScraperError::Browser(
                    "Link click did not open a new tab".into(),
                ));
            }
        }
    }
}

/// Builds an XPath string literal, falling back to `concat()` when the text
/// holds both quote kinds.
fn xpath_literal(text: &str) -> String {
    if !text.contains('"') {
        format!("\"{}\"", text)
    } else if !text.contains('\'') {
        format!("'{}'", text)
    } else {
        let parts = text
            .split('"')
            .map(|p| format!("\"{}\"", p))
            .collect::<Vec<_>>()
            .join(", '\"', ");
        format!("concat({})", parts)
    }
}

/// Matches a link by its text the way XPath's `normalize-space` sees it, so
/// inner runs of whitespace collapse to single spaces on both sides.
pub fn link_text_xpath(text: &str) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("//a[normalize-space(.)={}]", xpath_literal(&normalized))
}

#[async_trait::async_trait]
impl Session for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let timeout_secs = self.navigation_timeout.as_secs();
        tokio::time::timeout(self.navigation_timeout, self.home.goto(url))
            .await
            .map_err(|_| ScraperError::PageLoadTimeout(timeout_secs))?
            .map_err(|e| ScraperError::Browser(format!("Navigation to {} failed: {}", url, e)))?;
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> bool {
        let start = tokio::time::Instant::now();
        loop {
            if self.active().find_element(selector).await.is_ok() {
                return true;
            }
            if start.elapsed() >= timeout {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(ms::POLL_INTERVAL)).await;
        }
    }

    async fn page_source(&mut self) -> Result<String> {
        Ok(self.active().content().await?)
    }

    async fn current_url(&mut self) -> Result<String> {
        Ok(self.active().url().await?.unwrap_or_default())
    }

    async fn open_detail(&mut self, link_text: &str) -> Result<String> {
        if self.detail.is_some() {
            self.close_detail().await?;
        }

        let link = self
            .home
            .find_xpath(link_text_xpath(link_text))
            .await
            .map_err(|_| ScraperError::LinkNotFound {
                text: link_text.to_string(),
            })?;

        let known = self.open_targets().await?;
        link.click().await?;

        let page = self.wait_for_new_tab(&known).await?;
        page.bring_to_front().await?;
        self.detail = Some(page);

        let timeout = self.wait_timeout;
        if !self.wait_for(DETAIL_MARKER, timeout).await {
            return Err(ScraperError::PageLoadTimeout(timeout.as_secs()));
        }

        self.current_url().await
    }

    async fn close_detail(&mut self) -> Result<()> {
        if let Some(page) = self.detail.take() {
            page.close().await?;
        }
        self.home.bring_to_front().await?;
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<()> {
        if let Some(page) = self.detail.take() {
            page.close().await.ok();
        }

        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| ScraperError::Cleanup(e.to_string()));
        self.browser.wait().await.ok();
        self.handler.abort();

        tracing::info!("Chrome session closed");
        closed
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
