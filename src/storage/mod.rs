//! Persisted pipeline state
//!
//! Three flat files under the data directory carry all durable state:
//! - `product_urls.txt`: discovered product URLs, sorted, one per line
//! - `progress.json`: the batch checkpoint
//! - `products.json`: the catalog plus failed-URL accounting
//!
//! Saves are full-file overwrites, never appends.

mod catalog;
mod progress;
mod urls;

pub use catalog::{load_catalog, load_products, save_catalog, CatalogFile, CatalogInfo, CATALOG_SOURCE};
pub use progress::{load_progress, save_progress, Progress};
pub use urls::{load_urls, save_urls};
