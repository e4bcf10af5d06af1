use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(about = "List the competitions of a season")]
    Events {
        #[arg(long, help = "Season to list (defaults to scrape.year)")]
        year: Option<i32>,
        #[arg(long = "skip", help = "Competition name to leave out (repeatable)")]
        skip: Vec<String>,
        #[arg(short, long, help = "Write the event list as JSON")]
        output: Option<PathBuf>,
    },

    #[command(about = "Scrape athlete pages for every competition of a season")]
    Scrape {
        #[arg(long, help = "Season to scrape (defaults to scrape.year)")]
        year: Option<i32>,
        #[arg(long, help = "Athlete registry CSV")]
        registry: Option<PathBuf>,
        #[arg(long, help = "Write this run's results as CSV")]
        results: Option<PathBuf>,
        #[arg(long, help = "Write the visited event list as JSON")]
        events_output: Option<PathBuf>,
        #[arg(long, help = "Visit at most N events")]
        limit: Option<usize>,
    },

    #[command(about = "Merge partial result files into one deduplicated file")]
    Merge {
        #[arg(short, long = "input", help = "Partial CSV file (repeatable, in order)")]
        inputs: Vec<PathBuf>,
        #[arg(short, long, help = "Merged output file")]
        output: Option<PathBuf>,
        #[arg(long, help = "Backup copy of the merged file")]
        backup: Option<PathBuf>,
    },

    #[command(about = "Inspect or clean the athlete registry")]
    Registry {
        #[command(subcommand)]
        subcommand: RegistryCommand,
    },

    #[command(about = "Search athletes by name")]
    Search {
        #[arg(help = "Athlete name")]
        name: String,
        #[arg(long, default_value_t = 5, help = "Maximum result pages to fetch")]
        max_pages: usize,
    },

    #[command(about = "Fetch an athlete's personal info and season results")]
    Profile {
        #[arg(help = "Athlete page URL (absolute or site-relative)")]
        url: String,
        #[arg(long = "year", help = "Season to fetch (repeatable, default 2015-2023)")]
        years: Vec<i32>,
    },

    #[command(about = "Manage configuration")]
    Config {
        #[command(subcommand)]
        subcommand: ConfigCommand,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum RegistryCommand {
    #[command(about = "Show registry statistics")]
    Show {
        #[arg(long, help = "Athlete registry CSV")]
        registry: Option<PathBuf>,
    },

    #[command(about = "Remove duplicate entries and rewrite the file")]
    Dedup {
        #[arg(long, help = "Athlete registry CSV")]
        registry: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    #[command(about = "Initialize config file with defaults")]
    Init,

    #[command(about = "Show current configuration")]
    Show,

    #[command(about = "Show config file path")]
    Path,
}
