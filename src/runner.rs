//! Checkpointed batch runner
//!
//! Each run processes a contiguous window of the product URL list,
//! starting from the persisted checkpoint. Progress and catalog are
//! saved every [`CHECKPOINT_EVERY`] URLs and at the end of the window,
//! so a crash loses at most one checkpoint interval of work. Per-URL
//! failures are accounted, never propagated; only the missing-URL-list
//! configuration error and unexpected internal errors abort a run.

use crate::config::Config;
use crate::extract::ProductExtractor;
use crate::fetch::{random_delay, FetchOutcome, Fetcher};
use crate::status::StatusHandle;
use crate::storage::{
    load_products, load_progress, load_urls, save_catalog, save_progress,
};
use crate::ScrapeError;
use chrono::Utc;
use std::path::PathBuf;

/// Persist catalog and checkpoint every N URLs processed
pub const CHECKPOINT_EVERY: usize = 25;

/// Drives one batch pass over the persisted product URL list
pub struct BatchRunner {
    urls_file: PathBuf,
    bundled_urls_file: PathBuf,
    progress_file: PathBuf,
    output_file: PathBuf,
    page_delay_ms: [u64; 2],
    fetcher: Fetcher,
    extractor: ProductExtractor,
    status: StatusHandle,
}

impl BatchRunner {
    pub fn new(config: &Config, fetcher: Fetcher, status: StatusHandle) -> Self {
        let extractor = ProductExtractor::new(fetcher.clone(), config.images_dir());
        BatchRunner {
            urls_file: config.urls_file(),
            bundled_urls_file: config.bundled_urls_file(),
            progress_file: config.progress_file(),
            output_file: config.output_file(),
            page_delay_ms: config.scraper.page_delay_ms,
            fetcher,
            extractor,
            status,
        }
    }

    /// Runs one batch of up to `batch_size` URLs from the checkpoint
    pub async fn run(&self, batch_size: usize) -> crate::Result<()> {
        let urls = load_urls(&self.urls_file, &self.bundled_urls_file)?;
        if urls.is_empty() {
            self.status.update(|s| {
                s.error = Some("No URLs found. Run URL discovery first.".to_string());
            });
            return Err(ScrapeError::NoUrls);
        }

        self.status.begin_run();

        let mut products = load_products(&self.output_file);
        let mut progress = load_progress(&self.progress_file);

        // A re-crawl can shrink the URL list below an old checkpoint
        if progress.last_index > urls.len() {
            tracing::warn!(
                "Checkpoint index {} beyond URL list length {}, clamping",
                progress.last_index,
                urls.len()
            );
            progress.last_index = urls.len();
        }

        let resumed_products = products.len();
        let resumed_failed = progress.failed_urls.len();
        self.status.update(|s| {
            s.total_urls = urls.len();
            s.current_index = progress.last_index;
            s.products_scraped = resumed_products;
            s.failed_count = resumed_failed;
        });

        let start = progress.last_index;
        let end = (start + batch_size).min(urls.len());
        tracing::info!(
            "Batch window [{}, {}) of {} URLs ({} products already in catalog)",
            start,
            end,
            urls.len(),
            products.len()
        );

        for i in start..end {
            let url = &urls[i];
            self.status.update(|s| {
                s.current_index = i + 1;
                s.current_product = Some(url.clone());
            });

            match self.fetcher.fetch_page(url).await {
                FetchOutcome::Success(html) => {
                    let record = self.extractor.extract(&html, url).await;
                    if record.title.is_empty() {
                        // Not a fetch failure: the URL is consumed but no
                        // record is kept
                        tracing::debug!("Discarding untitled record for {}", url);
                    } else {
                        tracing::debug!("Scraped {} ({})", record.source_sku, record.title);
                        products.push(record);
                        let scraped = products.len();
                        self.status.update(|s| s.products_scraped = scraped);
                    }
                }
                FetchOutcome::NotFound | FetchOutcome::Failed => {
                    progress.failed_urls.push(url.clone());
                    let failed = progress.failed_urls.len();
                    self.status.update(|s| s.failed_count = failed);
                }
            }

            progress.last_index = i + 1;

            if (i + 1) % CHECKPOINT_EVERY == 0 {
                save_catalog(&self.output_file, &products, &progress.failed_urls)?;
                save_progress(&self.progress_file, &progress)?;
                tracing::info!("Checkpoint saved at index {}", i + 1);
            }

            random_delay(self.page_delay_ms).await;
        }

        save_catalog(&self.output_file, &products, &progress.failed_urls)?;
        save_progress(&self.progress_file, &progress)?;

        self.status
            .update(|s| s.last_run = Some(Utc::now().to_rfc3339()));
        tracing::info!(
            "Batch complete: index {} of {}, {} products, {} failed",
            progress.last_index,
            urls.len(),
            products.len(),
            progress.failed_urls.len()
        );

        Ok(())
    }
}
