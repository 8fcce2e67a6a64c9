//! Product Model

use serde::{Deserialize, Serialize};

/// Encoded image payload (base64 data plus mime type)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    /// Base64 (standard alphabet) image bytes
    pub data: String,
    pub mime_type: String,
}

/// Product entity with all four image slots
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub supply_price: f64,
    pub retail_price: f64,
    /// Sellable stock, never negative
    pub available_quantity: i64,
    pub supplier: String,
    pub image1: Option<ImagePayload>,
    pub image2: Option<ImagePayload>,
    pub image3: Option<ImagePayload>,
    pub image4: Option<ImagePayload>,
    pub created_at: i64,
}

/// Listing view of a product (first image only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub retail_price: f64,
    pub image1: Option<ImagePayload>,
}

/// Products of one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: String,
    pub products: Vec<ProductSummary>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub title: String,
    pub category: String,
    pub supply_price: f64,
    pub retail_price: f64,
    pub available_quantity: i64,
    pub supplier: String,
    pub image1: Option<ImagePayload>,
    pub image2: Option<ImagePayload>,
    pub image3: Option<ImagePayload>,
    pub image4: Option<ImagePayload>,
}

/// Update product payload
///
/// Omitted fields keep their stored value. Images are never cleared by an
/// update, only replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub category: Option<String>,
    pub supply_price: Option<f64>,
    pub retail_price: Option<f64>,
    pub available_quantity: Option<i64>,
    pub supplier: Option<String>,
    pub image1: Option<ImagePayload>,
    pub image2: Option<ImagePayload>,
    pub image3: Option<ImagePayload>,
    pub image4: Option<ImagePayload>,
}
