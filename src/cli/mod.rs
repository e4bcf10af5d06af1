pub mod commands;
pub mod dispatch;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ffa-scraper")]
#[command(version, about = "French athletics results scraper")]
#[command(
    long_about = "Enumerates the competitions of a season on bases.athle.fr, collects athlete pages from each results table and merges partial result files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: commands::Command,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Run Chrome in headless mode")]
    pub headless: Option<bool>,

    #[arg(long, global = true, help = "Path to Chrome executable")]
    pub chrome_path: Option<PathBuf>,

    #[arg(long, global = true, help = "Element wait timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, global = true, help = "Delay between listing pages in milliseconds")]
    pub delay_ms: Option<u64>,

    #[arg(long, global = true, env = "FFA_BASE_URL", help = "Site base URL")]
    pub base_url: Option<String>,
}

pub async fn run() -> crate::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(config_path) = &cli.config {
        let content = std::fs::read_to_string(config_path)?;
        toml::from_str(&content)?
    } else {
        crate::config::Config::load()?
    };

    let overrides = crate::config::ConfigOverrides {
        headless: cli.headless,
        chrome_path: cli.chrome_path.clone(),
        timeout: cli.timeout,
        delay_ms: cli.delay_ms,
        base_url: cli.base_url.clone(),
    };

    let config = config.load_with_overrides(overrides);
    config.validate()?;

    dispatch::dispatch(cli, config).await
}
