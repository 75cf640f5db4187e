//! URL discovery crawl
//!
//! A work-list traversal from the site root: fetch a category page,
//! extract and classify its links, enqueue unseen categories, and
//! accumulate product URLs, bounded by a page-visit budget. The
//! accumulated product list is persisted every `save-every` pages and
//! unconditionally at the end, so an interrupted crawl still leaves a
//! usable (partial) URL list behind.

use crate::config::Config;
use crate::crawler::frontier::CrawlFrontier;
use crate::crawler::links::extract_links;
use crate::fetch::{random_delay, FetchOutcome, Fetcher};
use crate::status::StatusHandle;
use crate::storage::save_urls;
use std::path::PathBuf;
use url::Url;

/// Link crawler that builds the product URL list
pub struct UrlDiscovery {
    base_url: String,
    save_every: usize,
    page_delay_ms: [u64; 2],
    urls_file: PathBuf,
    fetcher: Fetcher,
    status: StatusHandle,
}

impl UrlDiscovery {
    pub fn new(config: &Config, fetcher: Fetcher, status: StatusHandle) -> Self {
        UrlDiscovery {
            base_url: config.scraper.base_url.trim_end_matches('/').to_string(),
            save_every: config.crawl.save_every,
            page_delay_ms: config.scraper.page_delay_ms,
            urls_file: config.urls_file(),
            fetcher,
            status,
        }
    }

    /// Runs the crawl up to `max_pages` category page visits
    ///
    /// Returns the number of product URLs discovered. Fetch failures on
    /// individual pages are skipped, not propagated.
    pub async fn run(&self, max_pages: usize) -> crate::Result<usize> {
        let mut frontier = CrawlFrontier::new(&self.base_url);

        tracing::info!("Starting URL discovery from {}", self.base_url);

        // Seed the frontier from the site root; the seed visit does not
        // count against the page budget.
        self.visit(&mut frontier, &self.base_url).await;

        let mut pages = 0;
        while pages < max_pages {
            let url = match frontier.next_category() {
                Some(url) => url,
                None => {
                    tracing::info!("Frontier exhausted after {} pages", pages);
                    break;
                }
            };

            self.visit(&mut frontier, &url).await;
            pages += 1;

            let found = frontier.product_count();
            self.status.update(|s| {
                s.current_product = Some(format!("URLs: {} | Pages: {}", found, pages));
            });

            if pages % self.save_every == 0 {
                save_urls(&self.urls_file, frontier.products())?;
                tracing::info!(
                    "Checkpoint: {} product URLs after {} pages ({} pending)",
                    found,
                    pages,
                    frontier.pending_count()
                );
            }

            random_delay(self.page_delay_ms).await;
        }

        save_urls(&self.urls_file, frontier.products())?;

        let total = frontier.product_count();
        self.status.update(|s| s.total_urls = total);
        tracing::info!(
            "Discovery finished: {} product URLs from {} category pages",
            total,
            pages
        );

        Ok(total)
    }

    /// Fetches one page and feeds its links into the frontier
    async fn visit(&self, frontier: &mut CrawlFrontier, url: &str) {
        let body = match self.fetcher.fetch_page(url).await {
            FetchOutcome::Success(body) => body,
            FetchOutcome::NotFound | FetchOutcome::Failed => {
                tracing::debug!("Skipping unfetchable page {}", url);
                return;
            }
        };

        let page_url = match Url::parse(url) {
            Ok(u) => u,
            Err(e) => {
                tracing::debug!("Unparseable page URL {}: {}", url, e);
                return;
            }
        };

        for link in extract_links(&body, &page_url) {
            frontier.observe(&link);
        }
    }
}
