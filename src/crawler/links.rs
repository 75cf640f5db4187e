//! Hyperlink extraction for the discovery crawl

use crate::url::resolve_link;
use scraper::{Html, Selector};
use url::Url;

/// Extracts every followable hyperlink from a page, resolved to the
/// crawler's normalized absolute form
pub fn extract_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base))
        .collect()
}
