//! Line item encoding
//!
//! Orders keep their items as two comma-joined columns in positional
//! correspondence: `product_title = "A, B"`, `quantity = "2, 3"`.

use shared::models::{OneOrMany, QuantityValue};

use super::error::OrderError;

const SEPARATOR: &str = ", ";

/// One (product title, quantity) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub title: String,
    pub quantity: i64,
}

impl LineItem {
    pub fn new(title: impl Into<String>, quantity: i64) -> Self {
        Self {
            title: title.into(),
            quantity,
        }
    }
}

/// Parse stored columns back into line items.
///
/// Lenient: elements are trimmed and paired by index, a missing or
/// unparseable quantity becomes 0. A blank title column yields no items.
pub fn parse_line_items(titles: &str, quantities: &str) -> Vec<LineItem> {
    if titles.trim().is_empty() {
        return Vec::new();
    }
    let quantities: Vec<i64> = quantities
        .split(',')
        .map(|q| q.trim().parse().unwrap_or(0))
        .collect();

    titles
        .split(',')
        .enumerate()
        .map(|(i, title)| LineItem::new(title.trim(), quantities.get(i).copied().unwrap_or(0)))
        .collect()
}

/// Encode line items into the stored `(product_title, quantity)` columns
pub fn join_line_items(items: &[LineItem]) -> (String, String) {
    let titles = items
        .iter()
        .map(|i| i.title.as_str())
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    let quantities = items
        .iter()
        .map(|i| i.quantity.to_string())
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    (titles, quantities)
}

/// Build line items from a checkout payload.
///
/// Strict: every title must be non-empty, every quantity a positive integer,
/// and both lists the same length.
pub fn line_items_from_request(
    titles: OneOrMany<String>,
    quantities: Option<OneOrMany<QuantityValue>>,
) -> Result<Vec<LineItem>, OrderError> {
    let titles = titles.into_vec();
    let quantities = quantities.map(OneOrMany::into_vec).unwrap_or_default();

    if titles.is_empty() {
        return Err(OrderError::Validation("At least one product is required".into()));
    }
    if titles.len() != quantities.len() {
        return Err(OrderError::LineItemMismatch {
            titles: titles.len(),
            quantities: quantities.len(),
        });
    }

    titles
        .into_iter()
        .zip(quantities)
        .map(|(title, qty)| {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(OrderError::Validation("Product title must not be empty".into()));
            }
            if title.contains(',') {
                return Err(OrderError::Validation(format!(
                    "Product title must not contain ',': {title}"
                )));
            }
            let quantity = parse_quantity(&qty).ok_or_else(|| {
                OrderError::Validation(format!("Invalid quantity for {title}"))
            })?;
            Ok(LineItem { title, quantity })
        })
        .collect()
}

fn parse_quantity(value: &QuantityValue) -> Option<i64> {
    let n = match value {
        QuantityValue::Number(n) => *n,
        QuantityValue::Text(s) => s.trim().parse().ok()?,
    };
    (n > 0).then_some(n)
}
