pub mod athletes;
pub mod config_handler;
pub mod scrape;
pub mod store;
