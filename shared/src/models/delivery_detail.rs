//! Delivery Detail Model

use serde::{Deserialize, Serialize};

/// Saved shipping address, used to pre-fill checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetail {
    pub id: i64,
    #[serde(rename = "user_id")]
    pub user_id: i64,
    pub full_name: String,
    pub street_address: String,
    pub apartment: Option<String>,
    pub city: String,
    pub phone_number: String,
    pub email: String,
}

/// Create/replace payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetailInput {
    pub full_name: Option<String>,
    pub street_address: Option<String>,
    pub apartment: Option<String>,
    pub city: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}
