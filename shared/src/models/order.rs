//! Order Model
//!
//! Line items are stored denormalized: `product_title` and `quantity` hold
//! comma-joined lists in positional correspondence (`"A, B"` / `"2, 3"`).

use serde::{Deserialize, Serialize};

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    /// 6-character uppercase alphanumeric code
    pub id: String,
    pub user_id: i64,
    /// Comma-joined product titles
    pub product_title: String,
    /// Comma-joined quantities, same order as `product_title`
    pub quantity: String,
    pub total: f64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub payment_method: String,
    #[serde(rename = "receivedToSupplier")]
    pub received_to_supplier: bool,
    pub created_at: i64,
}

/// A single value or a list of values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Quantity as sent by clients: a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityValue {
    Number(i64),
    Text(String),
}

/// Checkout payload
///
/// Every field is optional at the serde level so that missing fields are
/// reported as a validation error instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCreate {
    /// Filled from the authenticated user when absent
    pub user_id: Option<i64>,
    pub product_title: Option<OneOrMany<String>>,
    pub quantity: Option<OneOrMany<QuantityValue>>,
    pub total: Option<f64>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub payment_method: Option<String>,
}

/// Successful checkout response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub message: String,
    pub order_id: String,
}

/// One line item whose requested quantity exceeds available stock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortfall {
    pub title: String,
    pub requested_quantity: i64,
    /// 0 when the title does not exist
    pub available_quantity: i64,
}

/// Flag value accepted by the status endpoint (`true` or `1`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
}

impl FlagValue {
    pub fn is_set(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Int(i) => *i != 0,
        }
    }
}

/// `PUT /api/orders/update-status` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub order_id: Option<String>,
    pub received_to_supplier: Option<FlagValue>,
}

/// Result kind of a receive transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiveStatus {
    /// Flag flipped, every decrement applied
    Received,
    /// Flag was already set, nothing changed
    AlreadyReceived,
    /// Flag flipped, one or more decrements failed
    PartiallyReceived,
}

/// Outcome of a receive transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveOutcome {
    pub order_id: String,
    pub status: ReceiveStatus,
    /// Rows changed on the order itself (0 when already received)
    pub affected_rows: u64,
    /// Titles whose stock was decremented
    pub decremented: Vec<String>,
    /// Titles whose decrement failed
    pub failed_titles: Vec<String>,
}
