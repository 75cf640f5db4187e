//! Product record data model
//!
//! The schema mirrors a commerce-platform import payload: one record per
//! product with a single variant, up to ten images, and fixed UK/GBP
//! metafields and tags. Records are immutable once built and serialize
//! losslessly through `products.json`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Default vendor applied when no brand element is found on the page
pub const DEFAULT_VENDOR: &str = "Nisbets";

/// A structured product extraction result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub title: String,
    pub body_html: String,
    pub vendor: String,
    pub product_type: String,
    pub tags: Vec<String>,
    pub status: String,
    pub variants: Vec<Variant>,
    pub images: Vec<ProductImage>,
    pub metafields: Vec<Metafield>,
    pub source_url: String,
    pub source_sku: String,
    pub source_price: String,
    pub scraped_at: String,
}

/// The single purchasable unit attached to every record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub title: String,
    pub price: String,
    pub sku: String,
    pub inventory_management: String,
    pub inventory_policy: String,
    pub requires_shipping: bool,
    pub taxable: bool,
    pub weight_unit: String,
    pub currency: String,
}

/// A downloaded product image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    /// Remote CDN source, normalized to the largest size variant
    pub src: String,
    /// Path of the downloaded file under the images directory
    pub local_path: String,
    /// Deterministic `{sku}_{index}.{ext}` filename
    pub filename: String,
}

/// A namespaced key/value annotation for downstream import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metafield {
    pub namespace: String,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ProductRecord {
    /// Creates an empty draft record for a source URL; field probes fill
    /// it in afterwards
    pub fn draft(source_url: &str) -> Self {
        ProductRecord {
            title: String::new(),
            body_html: String::new(),
            vendor: DEFAULT_VENDOR.to_string(),
            product_type: String::new(),
            tags: Vec::new(),
            status: "draft".to_string(),
            variants: Vec::new(),
            images: Vec::new(),
            metafields: Vec::new(),
            source_url: source_url.to_string(),
            source_sku: String::new(),
            source_price: String::new(),
            scraped_at: Utc::now().to_rfc3339(),
        }
    }
}

impl Variant {
    /// The fixed UK commerce variant: GBP, inventory-managed, shippable,
    /// taxable
    pub fn uk_default(price: Option<&str>, sku: &str) -> Self {
        Variant {
            title: "Default".to_string(),
            price: price.unwrap_or("0.00").to_string(),
            sku: sku.to_string(),
            inventory_management: "shopify".to_string(),
            inventory_policy: "deny".to_string(),
            requires_shipping: true,
            taxable: true,
            weight_unit: "kg".to_string(),
            currency: "GBP".to_string(),
        }
    }
}

impl Metafield {
    /// A single-line text metafield under the `product` namespace
    pub fn product_text(key: &str, value: &str) -> Self {
        Metafield {
            namespace: "product".to_string(),
            key: key.to_string(),
            value: value.to_string(),
            kind: "single_line_text_field".to_string(),
        }
    }
}
