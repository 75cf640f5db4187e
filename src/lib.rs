//! Nisbets product scraper
//!
//! This crate implements a resumable product scraping pipeline for
//! nisbets.co.uk: a link-discovery crawler collects product URLs, and a
//! checkpointed batch runner fetches each product page, extracts a
//! structured record, and persists the catalog as JSON.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod runner;
pub mod status;
pub mod storage;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No product URLs available; run URL discovery first")]
    NoUrls,

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::ProductRecord;
pub use pipeline::Pipeline;
pub use status::{RunStatus, StatusHandle};
