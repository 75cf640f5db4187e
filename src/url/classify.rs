//! Product / category URL classification
//!
//! These predicates encode one specific site's URL conventions. Product
//! detail pages end in a SKU-shaped segment (1-4 letters then 2-6
//! digits); category listings carry one of a handful of path markers.
//! They are heuristics, tuned for recall on nisbets.co.uk, and are not
//! meant to generalize.

use lazy_static::lazy_static;
use regex::Regex;

/// Path substrings that rule a URL out as a product page
const PRODUCT_SKIP: &[&str] = &[
    "/c/",
    "/cat/",
    "/login",
    "/basket",
    "/checkout",
    "/help",
    "/blog",
];

/// Path substrings that rule a URL out as a category listing
const CATEGORY_SKIP: &[&str] = &[
    "/login",
    "/basket",
    "/checkout",
    "/account",
    "/help",
    ".pdf",
    ".jpg",
];

/// Path markers that identify a category listing
const CATEGORY_MARKERS: &[&str] = &["/c/", "-equipment", "-supplies", "catering", "refrigeration"];

lazy_static! {
    /// Trailing SKU-shaped path segment: 1-4 letters followed by 2-6 digits
    static ref SKU_SEGMENT: Regex = Regex::new(r"/([a-zA-Z]{1,4}\d{2,6})$").unwrap();
}

/// Returns true if `url` looks like a product detail page under `base_url`
pub fn is_product_url(url: &str, base_url: &str) -> bool {
    if !url.starts_with(base_url) {
        return false;
    }

    let path = url.split('?').next().unwrap_or(url);
    let lower = path.to_lowercase();
    if PRODUCT_SKIP.iter().any(|s| lower.contains(s)) {
        return false;
    }

    SKU_SEGMENT.is_match(path)
}

/// Returns true if `url` looks like a category listing page under `base_url`
pub fn is_category_url(url: &str, base_url: &str) -> bool {
    if !url.starts_with(base_url) {
        return false;
    }

    let path = url.split('?').next().unwrap_or(url).to_lowercase();
    if CATEGORY_SKIP.iter().any(|s| path.contains(s)) {
        return false;
    }

    CATEGORY_MARKERS.iter().any(|m| path.contains(m))
}

/// Extracts the SKU from a product URL's trailing path segment, upper-cased
pub fn sku_from_url(url: &str) -> Option<String> {
    let path = url.split('?').next().unwrap_or(url);
    SKU_SEGMENT
        .captures(path)
        .map(|caps| caps[1].to_uppercase())
}
