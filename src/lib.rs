pub mod chrome;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod output;
pub mod scrape;
pub mod store;
pub mod timeouts;
pub mod utils;

pub use config::Config;
pub use error::ScraperError;

pub type Result<T> = std::result::Result<T, ScraperError>;
