pub mod cli;
pub mod config;
pub mod crawler;
pub mod error;
pub mod extractor;
pub mod ledger;
pub mod logger;
pub mod utils;

pub use cli::Cli;
pub use config::{AppConfig, SiteConfig};
pub use crawler::{CrawlReport, Interrupt, XkcdCrawler};
pub use error::CrawlError;
pub use ledger::{Ledger, PageRecord};
