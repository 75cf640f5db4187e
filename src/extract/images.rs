//! Product image collection and download
//!
//! Image sources are taken from the product page's `<img>` tags, kept
//! only when they point at the vendor CDN, normalized to the largest
//! size variant, and deduplicated by base filename. Downloads land under
//! a deterministic `{sku}_{index}.{ext}` name, and an existing file
//! short-circuits the download entirely, so the directory doubles as a
//! cache keyed by filename.

use crate::extract::record::ProductImage;
use crate::fetch::Fetcher;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::path::Path;

/// Both markers must appear in an image source for it to count as a
/// product image
const CDN_PATH_MARKER: &str = "prodimage";
const CDN_HOST_MARKER: &str = "media.nisbets.com";

lazy_static! {
    /// Size-variant path segments rewritten to the largest available variant
    static ref SIZE_VARIANT: Regex =
        Regex::new(r"/(small_new|medium|medium2_new|large_new)/").unwrap();

    /// Base filename (without directories or trailing query noise) used
    /// as the dedup key
    static ref BASE_NAME: Regex = Regex::new(r".*/([^/]+)\.(jpg|png).*").unwrap();
}

/// Collects normalized, deduplicated product image sources from a page
///
/// Order follows document order; the caller applies the per-product cap.
pub fn collect_image_sources(document: &Html) -> Vec<String> {
    let selector = match Selector::parse("img") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut sources = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for element in document.select(&selector) {
        let src = element
            .value()
            .attr("src")
            .or_else(|| element.value().attr("data-src"))
            .unwrap_or("");

        if !src.contains(CDN_PATH_MARKER) || !src.contains(CDN_HOST_MARKER) {
            continue;
        }

        let normalized = SIZE_VARIANT.replace_all(src, "/largezoom/").into_owned();
        let key = base_name(&normalized);
        if seen.insert(key) {
            sources.push(normalized);
        }
    }

    sources
}

/// Case-insensitive dedup key for an image source
fn base_name(src: &str) -> String {
    let lower = src.to_lowercase();
    match BASE_NAME.captures(&lower) {
        Some(caps) => caps[1].to_string(),
        None => lower,
    }
}

/// Downloads a product image to its deterministic location
///
/// Returns `None` on any failure; an already-present file is returned
/// without re-downloading.
pub async fn download_image(
    fetcher: &Fetcher,
    src: &str,
    sku: &str,
    index: usize,
    images_dir: &Path,
) -> Option<ProductImage> {
    let ext = if src.to_lowercase().contains(".png") {
        "png"
    } else {
        "jpg"
    };
    let filename = format!("{}_{}.{}", sku, index, ext);
    let filepath = images_dir.join(&filename);

    if !filepath.exists() {
        let bytes = fetcher.fetch_bytes(src).await?;
        if let Err(e) = tokio::fs::write(&filepath, &bytes).await {
            tracing::debug!("Failed to write image {}: {}", filepath.display(), e);
            return None;
        }
    }

    Some(ProductImage {
        src: src.to_string(),
        local_path: filepath.to_string_lossy().into_owned(),
        filename,
    })
}
