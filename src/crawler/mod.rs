//! Link-discovery crawl
//!
//! This module contains the URL discovery side of the pipeline:
//! - Frontier state (product set, pending work-list, visited set)
//! - Hyperlink extraction
//! - The budgeted crawl loop

mod discovery;
mod frontier;
mod links;

pub use discovery::UrlDiscovery;
pub use frontier::CrawlFrontier;
pub use links::extract_links;
