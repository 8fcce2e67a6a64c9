//! Data models
//!
//! Shared between the server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY) except order ids, which
//! are 6-character codes.

pub mod cart;
pub mod delivery_detail;
pub mod order;
pub mod product;
pub mod report;
pub mod slide;
pub mod user;

// Re-exports
pub use cart::*;
pub use delivery_detail::*;
pub use order::*;
pub use product::*;
pub use report::*;
pub use slide::*;
pub use user::*;
