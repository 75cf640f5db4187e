//! Product extraction
//!
//! Field extraction is best-effort: each probe returns `Some(value)` or
//! `None` for a selector miss, and [`ProductExtractor::extract`] composes
//! whatever was found into a [`ProductRecord`]. Extraction never fails
//! outward; the caller decides whether to keep a record based on title
//! presence.

mod images;
mod record;

pub use images::{collect_image_sources, download_image};
pub use record::{Metafield, ProductImage, ProductRecord, Variant, DEFAULT_VENDOR};

use crate::fetch::Fetcher;
use crate::url::sku_from_url;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::path::PathBuf;

/// Maximum images kept per product
pub const MAX_IMAGES: usize = 10;

/// Price element probes, most specific first
const PRICE_SELECTORS: &[&str] = &[".product-price", ".price", "[data-price]"];

/// Description element probes
const DESCRIPTION_SELECTORS: &[&str] = &[
    ".product-description",
    ".description",
    "#product-description",
];

/// Brand element probes
const BRAND_SELECTORS: &[&str] = &[".product-brand", ".brand-name", "[data-brand]"];

lazy_static! {
    /// Pound-prefixed amount, thousands separators allowed
    static ref PRICE_PATTERN: Regex = Regex::new(r"£([\d,]+\.?\d*)").unwrap();
}

/// Raw field values probed out of a product page
#[derive(Debug, Default)]
pub struct PageFields {
    pub sku: Option<String>,
    pub title: Option<String>,
    pub price: Option<String>,
    pub body_html: Option<String>,
    pub vendor: Option<String>,
    pub image_sources: Vec<String>,
}

/// Probes all product fields out of a page (pure; no network)
pub fn parse_product(html: &str, source_url: &str) -> PageFields {
    let document = Html::parse_document(html);

    PageFields {
        sku: sku_from_url(source_url),
        title: extract_title(&document),
        price: extract_price(&document),
        body_html: extract_description(&document),
        vendor: extract_brand(&document),
        image_sources: collect_image_sources(&document),
    }
}

/// First matching element across an ordered selector list
fn probe_first<'a>(document: &'a Html, selectors: &[&str]) -> Option<ElementRef<'a>> {
    for selector in selectors {
        if let Ok(parsed) = Selector::parse(selector) {
            if let Some(element) = document.select(&parsed).next() {
                return Some(element);
            }
        }
    }
    None
}

/// Text content of the first level-one heading
pub fn extract_title(document: &Html) -> Option<String> {
    let element = probe_first(document, &["h1"])?;
    let text = element.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// First pound-prefixed amount under the price probes, commas stripped
pub fn extract_price(document: &Html) -> Option<String> {
    let element = probe_first(document, PRICE_SELECTORS)?;
    let text = element.text().collect::<String>();
    PRICE_PATTERN
        .captures(&text)
        .map(|caps| caps[1].replace(',', ""))
}

/// Raw markup of the first matching description element
pub fn extract_description(document: &Html) -> Option<String> {
    probe_first(document, DESCRIPTION_SELECTORS).map(|element| element.html())
}

/// Text of the first matching brand element
pub fn extract_brand(document: &Html) -> Option<String> {
    let element = probe_first(document, BRAND_SELECTORS)?;
    let text = element.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Builds product records from fetched pages, downloading images as a
/// side effect
pub struct ProductExtractor {
    fetcher: Fetcher,
    images_dir: PathBuf,
}

impl ProductExtractor {
    pub fn new(fetcher: Fetcher, images_dir: PathBuf) -> Self {
        ProductExtractor {
            fetcher,
            images_dir,
        }
    }

    /// Extracts a product record from a fetched page
    ///
    /// Missing fields degrade to defaults (empty title/description,
    /// vendor "Nisbets", price "0.00" on the variant). The record always
    /// carries the single UK variant, the GBP/country metafields, and
    /// the four fixed tags.
    pub async fn extract(&self, html: &str, source_url: &str) -> ProductRecord {
        let fields = parse_product(html, source_url);
        let mut record = ProductRecord::draft(source_url);

        record.source_sku = fields.sku.unwrap_or_default();
        if let Some(title) = fields.title {
            record.title = title;
        }
        if let Some(price) = &fields.price {
            record.source_price = price.clone();
        }
        if let Some(body) = fields.body_html {
            record.body_html = body;
        }
        if let Some(vendor) = fields.vendor {
            record.vendor = vendor;
        }

        for src in fields.image_sources.iter().take(MAX_IMAGES) {
            // Only successful downloads advance the filename ordinal, so
            // a failed download leaves no gap in the sequence
            match download_image(
                &self.fetcher,
                src,
                &record.source_sku,
                record.images.len() + 1,
                &self.images_dir,
            )
            .await
            {
                Some(image) => record.images.push(image),
                None => tracing::debug!("Image download failed for {}", src),
            }
        }

        record
            .variants
            .push(Variant::uk_default(fields.price.as_deref(), &record.source_sku));

        record
            .metafields
            .push(Metafield::product_text("currency", "GBP"));
        record
            .metafields
            .push(Metafield::product_text("country_of_origin", "United Kingdom"));

        record.tags.push(format!("SKU:{}", record.source_sku));
        record.tags.push("UK".to_string());
        record.tags.push("Nisbets UK".to_string());
        record.tags.push("GBP".to_string());

        record
    }
}
