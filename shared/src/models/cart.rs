//! Cart Model

use serde::{Deserialize, Serialize};

use super::ImagePayload;

/// Cart line joined with its product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: i64,
    pub product_id: i64,
    pub title: String,
    pub price: f64,
    pub image: Option<ImagePayload>,
    pub quantity: i64,
    pub total_price: f64,
}

/// Add-to-cart payload (increments on an existing line)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAdd {
    pub product_id: i64,
    pub quantity: i64,
}

/// Set the quantity of one cart line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUpdate {
    pub cart_id: i64,
    pub quantity: i64,
}

/// Remove one cart line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRemove {
    pub cart_id: i64,
}
