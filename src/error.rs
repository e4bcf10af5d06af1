use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Page did not load within {0}s")]
    PageLoadTimeout(u64),

    #[error("Extraction failed at {url}: {message}")]
    Extraction { url: String, message: String },

    #[error("Link not found: {text}")]
    LinkNotFound { text: String },

    #[error("Missing merge input(s): {}", display_paths(.missing))]
    MergeInputMissing { missing: Vec<PathBuf> },

    #[error("Session cleanup failed: {0}")]
    Cleanup(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    #[error("General error: {0}")]
    General(String),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<chromiumoxide::error::CdpError> for ScraperError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Self::Browser(err.to_string())
    }
}

impl ScraperError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::LaunchFailed(_) => vec![
                "Ensure Chrome/Chromium is installed".into(),
                "Try specifying Chrome path with --chrome-path".into(),
            ],
            Self::Network(_) => vec![
                "Check network connectivity".into(),
                "Verify the site base URL in the configuration".into(),
                "The results base may be temporarily down; retry later".into(),
            ],
            Self::PageLoadTimeout(timeout) => vec![
                format!("Increase the wait with --timeout {}", timeout + 10),
                "Check that the event URL opens in a regular browser".into(),
            ],
            Self::MergeInputMissing { .. } => vec![
                "Run the scrape for every partial file before merging".into(),
                "Pass the partial files explicitly with --input".into(),
            ],
            Self::ConfigError(_) | Self::TomlDeError(_) | Self::TomlSerError(_) => vec![
                "Check configuration file syntax".into(),
                "Run `ffa-scraper config show` to see the effective configuration".into(),
                "Use --config to specify a different config file".into(),
            ],
            Self::InvalidUrl(_) => vec![
                "Ensure URL includes protocol (http:// or https://)".into(),
                "Check for typos in the URL".into(),
            ],
            Self::CsvError(_) => vec![
                "Check that the file has a header row".into(),
                "Check that every row has the same number of fields".into(),
            ],
            _ => vec![
                "Run with --verbose for more details".into(),
            ],
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LaunchFailed(_) | Self::Browser(_) | Self::Cleanup(_) => 3,
            Self::Network(_) | Self::PageLoadTimeout(_) => 4,
            Self::Extraction { .. } | Self::LinkNotFound { .. } => 5,
            Self::IoError(_) | Self::CsvError(_) | Self::JsonError(_) => 6,
            Self::MergeInputMissing { .. } => 8,
            Self::ConfigError(_) | Self::TomlDeError(_) | Self::TomlSerError(_) => 7,
            Self::InvalidUrl(_) => 2,
            Self::General(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_missing_message_lists_paths() {
        let err = ScraperError::MergeInputMissing {
            missing: vec![PathBuf::from("data/a.csv"), PathBuf::from("data/c.csv")],
        };
        assert_eq!(
            err.to_string(),
            "Missing merge input(s): data/a.csv, data/c.csv"
        );
    }

    #[test]
    fn test_exit_codes_are_nonzero() {
        let errors = [
            ScraperError::Network("500".into()),
            ScraperError::General("x".into()),
            ScraperError::MergeInputMissing { missing: vec![] },
            ScraperError::ConfigError("bad".into()),
        ];
        for err in errors {
            assert_ne!(err.exit_code(), 0);
        }
    }

    #[test]
    fn test_suggestions_not_empty() {
        assert!(!ScraperError::Network("timeout".into()).suggestions().is_empty());
        assert!(!ScraperError::General("x".into()).suggestions().is_empty());
    }
}
