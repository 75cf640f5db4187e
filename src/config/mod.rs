//! Configuration loading and validation
//!
//! Configuration is a TOML file read once at process start. Every key has
//! a default tuned to the nisbets.co.uk pipeline, so a missing section is
//! not an error.

mod parser;
mod types;

pub use parser::{load_config, validate};
pub use types::{Config, CrawlConfig, ScraperConfig, ServerConfig};
