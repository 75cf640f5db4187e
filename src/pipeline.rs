//! Pipeline command surface
//!
//! [`Pipeline`] is the boundary handed to whatever presentation or
//! scheduling layer embeds this crate: trigger a batch or a discovery
//! crawl (a no-op while one is active), read a status snapshot, read the
//! persisted catalog, and answer a liveness probe. HTTP routing on top
//! of these operations is an external concern.

use crate::config::Config;
use crate::crawler::UrlDiscovery;
use crate::fetch::Fetcher;
use crate::runner::BatchRunner;
use crate::status::{RunLock, RunStatus, StatusHandle};
use crate::storage::{load_catalog, CatalogFile};
use crate::ScrapeError;
use std::sync::Arc;

/// Orchestrates crawl and batch runs over shared status and an
/// exclusive run lock
#[derive(Clone)]
pub struct Pipeline {
    config: Arc<Config>,
    status: StatusHandle,
    lock: RunLock,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Pipeline {
            config: Arc::new(config),
            status: StatusHandle::new(),
            lock: RunLock::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Copy-on-read status snapshot for the presentation layer
    pub fn status(&self) -> RunStatus {
        self.status.snapshot()
    }

    /// Whether a batch or crawl currently holds the run lock
    pub fn is_running(&self) -> bool {
        self.lock.is_held()
    }

    /// Runs one product batch; returns `Ok(false)` without doing any
    /// work if a run is already active
    ///
    /// Failures are recorded in the status snapshot and returned; the
    /// run lock and `running` flag are released on every path.
    pub async fn run_batch(&self, batch_size: Option<usize>) -> crate::Result<bool> {
        let _guard = match self.lock.acquire() {
            Some(guard) => guard,
            None => {
                tracing::info!("Batch requested while a run is active, skipping");
                return Ok(false);
            }
        };

        let size = batch_size.unwrap_or(self.config.scraper.batch_size);
        let fetcher = Fetcher::new(&self.config.scraper)?;
        let runner = BatchRunner::new(&self.config, fetcher, self.status.clone());

        match runner.run(size).await {
            Ok(()) => {
                self.status.finish_run(None);
                Ok(true)
            }
            Err(ScrapeError::NoUrls) => {
                // The runner already surfaced the configuration error
                self.status.finish_run(None);
                Err(ScrapeError::NoUrls)
            }
            Err(e) => {
                tracing::error!("Batch aborted: {}", e);
                self.status.finish_run(Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Runs a URL discovery crawl; returns `Ok(false)` if a run is
    /// already active
    ///
    /// `max_pages` overrides the configured page budget (the dashboard
    /// trigger historically used a larger budget than scheduled runs).
    pub async fn run_discovery(&self, max_pages: Option<usize>) -> crate::Result<bool> {
        let _guard = match self.lock.acquire() {
            Some(guard) => guard,
            None => {
                tracing::info!("Discovery requested while a run is active, skipping");
                return Ok(false);
            }
        };

        let budget = max_pages.unwrap_or(self.config.crawl.max_pages);
        let fetcher = Fetcher::new(&self.config.scraper)?;
        let discovery = UrlDiscovery::new(&self.config, fetcher, self.status.clone());

        self.status.begin_run();
        match discovery.run(budget).await {
            Ok(_) => {
                self.status.finish_run(None);
                Ok(true)
            }
            Err(e) => {
                tracing::error!("Discovery aborted: {}", e);
                self.status.finish_run(Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Reads the persisted product catalog
    pub fn load_catalog(&self) -> crate::Result<CatalogFile> {
        load_catalog(&self.config.output_file())
    }

    /// Fixed liveness signal
    pub fn health(&self) -> &'static str {
        "healthy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health() {
        let pipeline = Pipeline::new(Config::default());
        assert_eq!(pipeline.health(), "healthy");
        assert!(!pipeline.is_running());
    }

    #[tokio::test]
    async fn test_batch_without_urls_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::for_target(dir.path(), "https://www.nisbets.co.uk");
        config.ensure_data_dirs().unwrap();

        let pipeline = Pipeline::new(config);
        let result = pipeline.run_batch(None).await;
        assert!(matches!(result, Err(ScrapeError::NoUrls)));

        let status = pipeline.status();
        assert!(!status.running);
        assert!(status.error.unwrap().contains("No URLs"));
        assert!(!pipeline.is_running());
    }
}
