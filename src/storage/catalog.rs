//! Product catalog persistence
//!
//! `products.json` holds the full catalog: an info block, every record
//! scraped so far, and the failed-URL list. Each save rewrites the whole
//! file; each batch run loads the existing catalog first so new records
//! append across runs.

use crate::extract::ProductRecord;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Label recorded in the catalog's info block
pub const CATALOG_SOURCE: &str = "Nisbets UK";

/// Summary block at the head of `products.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogInfo {
    pub source: String,
    pub updated: String,
    pub total: usize,
    pub failed: usize,
}

/// On-disk catalog shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub info: CatalogInfo,
    #[serde(default)]
    pub products: Vec<ProductRecord>,
    #[serde(default)]
    pub failed_urls: Vec<String>,
}

/// Loads the product records from an existing catalog
///
/// A missing or unreadable file yields an empty list, so a fresh data
/// directory starts a fresh catalog.
pub fn load_products(path: &Path) -> Vec<ProductRecord> {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<CatalogFile>(&content) {
            Ok(catalog) => catalog.products,
            Err(e) => {
                tracing::warn!("Ignoring corrupt catalog {}: {}", path.display(), e);
                Vec::new()
            }
        },
        Err(_) => Vec::new(),
    }
}

/// Loads the full catalog file for the read-side command surface
pub fn load_catalog(path: &Path) -> crate::Result<CatalogFile> {
    if !path.exists() {
        return Ok(CatalogFile::default());
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| crate::ScrapeError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Rewrites the catalog with a fresh info block
pub fn save_catalog(
    path: &Path,
    products: &[ProductRecord],
    failed_urls: &[String],
) -> crate::Result<()> {
    let catalog = CatalogFile {
        info: CatalogInfo {
            source: CATALOG_SOURCE.to_string(),
            updated: Utc::now().to_rfc3339(),
            total: products.len(),
            failed: failed_urls.len(),
        },
        products: products.to_vec(),
        failed_urls: failed_urls.to_vec(),
    };

    let json =
        serde_json::to_string_pretty(&catalog).map_err(|source| crate::ScrapeError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    std::fs::write(path, json)?;
    Ok(())
}
