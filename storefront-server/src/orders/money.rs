//! Money helpers using rust_decimal
//!
//! Amounts are stored and serialized as `f64`; sums go through `Decimal`.

use rust_decimal::prelude::*;

use super::error::OrderError;

/// Rounding for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Maximum accepted order total
const MAX_ORDER_TOTAL: f64 = 1_000_000.0;

#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert back to f64, rounded to cents
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Order totals must be finite, positive and below the cap
pub fn validate_total(total: f64) -> Result<f64, OrderError> {
    if !total.is_finite() || total <= 0.0 {
        return Err(OrderError::Validation(format!(
            "total must be a positive amount, got {total}"
        )));
    }
    if total > MAX_ORDER_TOTAL {
        return Err(OrderError::Validation(format!(
            "total exceeds maximum allowed ({MAX_ORDER_TOTAL}), got {total}"
        )));
    }
    Ok(to_f64(to_decimal(total)))
}
