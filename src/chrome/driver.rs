use super::{ChromeSession, Session};
use crate::{Result, ScraperError, config::Config};

/// Owns the one browser session of a scraping run and closes it exactly once.
pub struct Driver<S: Session> {
    session: Option<S>,
}

impl Driver<ChromeSession> {
    pub async fn launch(config: &Config) -> Result<Self> {
        Ok(Self::new(ChromeSession::launch(config).await?))
    }
}

impl<S: Session> Driver<S> {
    pub fn new(session: S) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&mut self) -> Result<&mut S> {
        self.session
            .as_mut()
            .ok_or_else(|| ScraperError::General("Browser session already closed".into()))
    }

    /// Closing an already closed driver is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        match self.session.take() {
            Some(mut session) => session.shutdown().await.map_err(|e| match e {
                ScraperError::Cleanup(_) => e,
                other => ScraperError::Cleanup(other.to_string()),
            }),
            None => Ok(()),
        }
    }

    /// Closes the session and hands back `outcome` unchanged. A cleanup
    /// failure is logged and never replaces the outcome.
    pub async fn finish<T>(&mut self, outcome: Result<T>) -> Result<T> {
        if let Err(cleanup) = self.close().await {
            match &outcome {
                Ok(_) => tracing::warn!("{}", cleanup),
                Err(original) => {
                    tracing::warn!("{} (run had already failed: {})", cleanup, original)
                }
            }
        }
        outcome
    }
}
