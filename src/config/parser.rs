use crate::config::types::Config;
use crate::ConfigError;
use std::path::Path;
use url::Url;

/// Loads and parses a configuration file from the given path
///
/// Every key has a default, so an empty file yields the stock
/// nisbets.co.uk configuration.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Validates a configuration, rejecting values the pipeline cannot run with
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.scraper.batch_size == 0 {
        return Err(ConfigError::Validation(
            "batch-size must be greater than zero".to_string(),
        ));
    }

    if config.scraper.fetch_retries == 0 {
        return Err(ConfigError::Validation(
            "fetch-retries must be greater than zero".to_string(),
        ));
    }

    if config.crawl.max_pages == 0 {
        return Err(ConfigError::Validation(
            "max-pages must be greater than zero".to_string(),
        ));
    }

    if config.crawl.save_every == 0 {
        return Err(ConfigError::Validation(
            "save-every must be greater than zero".to_string(),
        ));
    }

    let base = Url::parse(&config.scraper.base_url)
        .map_err(|e| ConfigError::Validation(format!("base-url is not a valid URL: {}", e)))?;
    if base.host_str().is_none() {
        return Err(ConfigError::Validation(
            "base-url must include a host".to_string(),
        ));
    }

    for range in [
        &config.scraper.retry_delay_ms,
        &config.scraper.page_delay_ms,
    ] {
        if range[0] > range[1] {
            return Err(ConfigError::Validation(format!(
                "delay range [{}, {}] has min greater than max",
                range[0], range[1]
            )));
        }
    }

    Ok(())
}
