use shared::error::{AppError, ErrorCode};
use shared::models::Shortfall;
use thiserror::Error;

use crate::db::repository::RepoError;

/// Order engine errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Line item mismatch: {titles} titles, {quantities} quantities")]
    LineItemMismatch { titles: usize, quantities: usize },

    #[error("Insufficient stock for {} item(s)", .0.len())]
    InsufficientStock(Vec<Shortfall>),

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid report period: {0}")]
    InvalidPeriod(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation(msg) => AppError::validation(msg),
            OrderError::LineItemMismatch { titles, quantities } => AppError::with_message(
                ErrorCode::LineItemMismatch,
                format!("Got {titles} product titles but {quantities} quantities"),
            ),
            OrderError::InsufficientStock(shortfalls) => {
                let issues = serde_json::to_value(&shortfalls).unwrap_or_default();
                AppError::new(ErrorCode::InsufficientStock).with_detail("stock_issues", issues)
            }
            OrderError::NotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order not found: {id}"))
                    .with_detail("order_id", id)
            }
            OrderError::InvalidTransition(msg) => {
                AppError::with_message(ErrorCode::InvalidStatusTransition, msg)
            }
            OrderError::InvalidPeriod(msg) => {
                AppError::with_message(ErrorCode::InvalidReportPeriod, msg)
            }
            OrderError::Repo(e) => {
                tracing::error!(error = %e, "Order repository error");
                e.into()
            }
        }
    }
}
