use crate::{Result, ScraperError, config::Config, output};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct ConfigInfo {
    pub path: PathBuf,
    pub exists: bool,
}

#[derive(Debug, Serialize)]
pub struct ConfigShowResult {
    pub config: Config,
}

impl output::OutputFormatter for ConfigInfo {
    fn format_text(&self) -> String {
        use crate::output::text;
        format!(
            "{}\n{}",
            text::key_value("Config Path", &self.path.display().to_string()),
            text::key_value("Exists", &self.exists.to_string())
        )
    }

    fn format_json(&self, pretty: bool) -> Result<String> {
        output::to_json(self, pretty)
    }
}

impl output::OutputFormatter for ConfigShowResult {
    fn format_text(&self) -> String {
        self.config.show_masked()
    }

    fn format_json(&self, pretty: bool) -> Result<String> {
        output::to_json(&self.config, pretty)
    }
}

/// Writes the default configuration to `path`, refusing to overwrite.
pub fn write_default_config(path: &Path) -> Result<ConfigInfo> {
    if path.exists() {
        return Err(ScraperError::ConfigError(format!(
            "Config file already exists at {}",
            path.display()
        )));
    }

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, toml::to_string_pretty(&Config::default())?)?;

    Ok(ConfigInfo {
        path: path.to_path_buf(),
        exists: true,
    })
}

pub fn handle_config_init() -> Result<ConfigInfo> {
    write_default_config(&crate::config::default_config_path()?)
}

pub fn handle_config_show(config: &Config) -> ConfigShowResult {
    ConfigShowResult {
        config: config.clone(),
    }
}

pub fn handle_config_path() -> Result<ConfigInfo> {
    let path = crate::config::default_config_path()?;
    let exists = path.exists();
    Ok(ConfigInfo { path, exists })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_default_config_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ffa-scraper/config.toml");

        let info = write_default_config(&path).unwrap();
        assert!(info.exists);

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Config = toml::from_str(&content).unwrap();
        assert_eq!(parsed.site.base_url, Config::default().site.base_url);
    }

    #[test]
    fn test_write_default_config_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        assert!(matches!(
            write_default_config(&path),
            Err(ScraperError::ConfigError(_))
        ));
    }
}
