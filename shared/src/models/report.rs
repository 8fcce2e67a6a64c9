//! Reporting Models

use serde::{Deserialize, Serialize};

use super::ImagePayload;

/// Top-selling product row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSellingProduct {
    pub product_id: i64,
    pub product_name: String,
    pub product_image: Option<ImagePayload>,
    pub product_price: f64,
    pub total_sold: i64,
}

/// Monthly sales report row (priced at the current retail price)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportRow {
    pub product_title: String,
    pub price: f64,
    pub quantity: i64,
    pub total: f64,
}

/// `GET /api/orders/sales-report` query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesReportQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}
