use crate::{Result, ScraperError, timeouts::{ms, secs}};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_athletes_path")]
    pub athletes_path: String,
    /// Value of the `frmtype1` listing filter.
    #[serde(default = "default_listing_type")]
    pub listing_type: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowserConfig {
    pub chrome_path: Option<PathBuf>,
    #[serde(default = "default_headless")]
    pub headless: bool,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimingConfig {
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_secs: u64,
    #[serde(default = "default_page_delay")]
    pub page_delay_ms: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrapeConfig {
    #[serde(default = "default_year")]
    pub year: i32,
    #[serde(default)]
    pub skip_events: Vec<String>,
    #[serde(default)]
    pub skip_athletes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_registry_path")]
    pub registry_path: PathBuf,
    pub results_path: Option<PathBuf>,
    #[serde(default = "default_merge_inputs")]
    pub merge_inputs: Vec<PathBuf>,
    #[serde(default = "default_merged_output")]
    pub merged_output: PathBuf,
    #[serde(default = "default_merged_backup")]
    pub merged_backup: PathBuf,
}

fn default_base_url() -> String {
    "https://bases.athle.fr".to_string()
}
fn default_athletes_path() -> String {
    "/asp.net/athletes.aspx".to_string()
}
fn default_listing_type() -> String {
    "Hors Stade".to_string()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}
fn default_headless() -> bool {
    true
}
fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    800
}
fn default_wait_timeout() -> u64 {
    secs::ELEMENT_WAIT
}
fn default_page_delay() -> u64 {
    ms::PAGE_DELAY
}
fn default_request_timeout() -> u64 {
    secs::REQUEST
}
fn default_navigation_timeout() -> u64 {
    secs::NAVIGATION
}
fn default_year() -> i32 {
    2023
}
fn default_registry_path() -> PathBuf {
    PathBuf::from("data/athletes_pages.csv")
}
fn default_merge_inputs() -> Vec<PathBuf> {
    (1..=3)
        .map(|i| PathBuf::from(format!("data/raw_master_ffa_results_part{}.csv", i)))
        .collect()
}
fn default_merged_output() -> PathBuf {
    PathBuf::from("data/raw_master_ffa_results.csv")
}
fn default_merged_backup() -> PathBuf {
    PathBuf::from("data/raw_master_ffa_results_backup.csv")
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            athletes_path: default_athletes_path(),
            listing_type: default_listing_type(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: default_headless(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            wait_timeout_secs: default_wait_timeout(),
            page_delay_ms: default_page_delay(),
            request_timeout_secs: default_request_timeout(),
            navigation_timeout_secs: default_navigation_timeout(),
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            year: default_year(),
            skip_events: Vec::new(),
            skip_athletes: Vec::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            registry_path: default_registry_path(),
            results_path: None,
            merge_inputs: default_merge_inputs(),
            merged_output: default_merged_output(),
            merged_backup: default_merged_backup(),
        }
    }
}

impl TimingConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

impl SiteConfig {
    pub fn athletes_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.athletes_path)
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    default_config_dir().map(|p| p.join("config.toml"))
}

pub fn default_config_dir() -> Result<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .map(|p| p.join("ffa-scraper"))
        .ok_or_else(|| ScraperError::ConfigError("Could not determine config directory".into()))
}

pub const PROJECT_CONFIG_FILE: &str = ".ffa-scraper.toml";

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        let global_path = default_config_path()?;
        if global_path.exists() {
            let content = std::fs::read_to_string(&global_path)?;
            config = toml::from_str(&content)?;
        }

        let project_path = PathBuf::from(PROJECT_CONFIG_FILE);
        if project_path.exists() {
            let content = std::fs::read_to_string(&project_path)?;
            let project_config: Config = toml::from_str(&content)?;
            config = config.merge(project_config);
        }

        config.load_from_env();

        Ok(config)
    }

    pub fn load_with_overrides(&self, cli_overrides: ConfigOverrides) -> Self {
        let mut config = self.clone();

        if let Some(headless) = cli_overrides.headless {
            config.browser.headless = headless;
        }
        if let Some(chrome_path) = cli_overrides.chrome_path {
            config.browser.chrome_path = Some(chrome_path);
        }
        if let Some(timeout) = cli_overrides.timeout {
            config.timing.wait_timeout_secs = timeout;
        }
        if let Some(delay) = cli_overrides.delay_ms {
            config.timing.page_delay_ms = delay;
        }
        if let Some(base_url) = cli_overrides.base_url {
            config.site.base_url = base_url;
        }

        config
    }

    /// Project file values win over the global file, section by section.
    fn merge(mut self, other: Config) -> Self {
        let defaults = Config::default();

        if other.site.base_url != defaults.site.base_url {
            self.site.base_url = other.site.base_url;
        }
        if other.site.listing_type != defaults.site.listing_type {
            self.site.listing_type = other.site.listing_type;
        }
        if other.browser.chrome_path.is_some() {
            self.browser.chrome_path = other.browser.chrome_path;
        }
        if other.scrape.year != defaults.scrape.year {
            self.scrape.year = other.scrape.year;
        }
        self.scrape.skip_events.extend(other.scrape.skip_events);
        self.scrape.skip_athletes.extend(other.scrape.skip_athletes);
        if other.storage.registry_path != defaults.storage.registry_path {
            self.storage.registry_path = other.storage.registry_path;
        }
        if other.storage.results_path.is_some() {
            self.storage.results_path = other.storage.results_path;
        }
        if other.storage.merge_inputs != defaults.storage.merge_inputs {
            self.storage.merge_inputs = other.storage.merge_inputs;
        }
        self
    }

    fn load_from_env(&mut self) {
        if let Ok(base_url) = std::env::var("FFA_BASE_URL") {
            self.site.base_url = base_url;
        }
        if let Ok(headless) = std::env::var("FFA_HEADLESS") {
            self.browser.headless = headless == "true" || headless == "1";
        }
        if let Ok(path) = std::env::var("CHROME_PATH") {
            self.browser.chrome_path = Some(PathBuf::from(path));
        }
        if let Ok(timeout) = std::env::var("FFA_WAIT_TIMEOUT")
            && let Ok(timeout) = timeout.parse()
        {
            self.timing.wait_timeout_secs = timeout;
        }
        if let Ok(delay) = std::env::var("FFA_PAGE_DELAY_MS")
            && let Ok(delay) = delay.parse()
        {
            self.timing.page_delay_ms = delay;
        }
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.site.base_url)
            .map_err(|e| ScraperError::InvalidUrl(format!("{}: {}", self.site.base_url, e)))?;

        if self.timing.wait_timeout_secs == 0 {
            return Err(ScraperError::ConfigError(
                "wait_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.timing.request_timeout_secs == 0 {
            return Err(ScraperError::ConfigError(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        if let Some(ref path) = self.browser.chrome_path
            && !path.exists()
        {
            return Err(ScraperError::ConfigError(format!(
                "Chrome path does not exist: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn show_masked(&self) -> String {
        format!(
            r#"Site:
  Base URL: {}
  Listing Type: {}

Browser:
  Chrome Path: {}
  Headless: {}

Timing:
  Element Wait: {}s
  Page Delay: {}ms
  Request Timeout: {}s

Scrape:
  Year: {}
  Skipped Events: {}
  Skipped Athletes: {}

Storage:
  Registry: {}
  Merge Output: {}
"#,
            self.site.base_url,
            self.site.listing_type,
            self.browser
                .chrome_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "auto-detect".into()),
            self.browser.headless,
            self.timing.wait_timeout_secs,
            self.timing.page_delay_ms,
            self.timing.request_timeout_secs,
            self.scrape.year,
            self.scrape.skip_events.len(),
            self.scrape.skip_athletes.len(),
            self.storage.registry_path.display(),
            self.storage.merged_output.display(),
        )
    }
}

#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub headless: Option<bool>,
    pub chrome_path: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub delay_ms: Option<u64>,
    pub base_url: Option<String>,
}
