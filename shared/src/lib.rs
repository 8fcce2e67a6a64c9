//! Shared types for the storefront
//!
//! Wire types used by the server and by API clients: the unified error
//! system, response envelopes and the domain models.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
