//! URL resolution and classification
//!
//! Discovered hyperlinks are resolved to an absolute, normalized form
//! (query string and trailing slash stripped) before classification, so
//! the product and category predicates and every dedup set all operate
//! on the same canonical spelling.

mod classify;

pub use classify::{is_category_url, is_product_url, sku_from_url};

use url::Url;

/// Resolves an href against a base URL and normalizes it
///
/// Returns `None` for links the crawler never follows:
/// - non-http(s) schemes (`javascript:`, `mailto:`, `tel:`, data URIs)
/// - hrefs that fail to resolve to a valid URL
///
/// The returned string has the query, fragment, and any trailing slash
/// removed.
pub fn resolve_link(href: &str, base: &Url) -> Option<String> {
    let trimmed = href.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let mut resolved = base.join(trimmed).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    resolved.set_query(None);
    resolved.set_fragment(None);

    Some(resolved.as_str().trim_end_matches('/').to_string())
}
