//! Order Engine
//!
//! - **line_items**: comma-joined line item encoding
//! - **store**: `CatalogStore` / `OrderStore` seams and the SQLite implementation
//! - **engine**: stock validation, creation, receive transition, queries
//! - **reports**: top sellers and monthly sales
//!
//! # Receive transition
//!
//! ```text
//! find order ──▶ already received? ──yes──▶ AlreadyReceived (no changes)
//!                      │ no
//!                      ▼
//!        decrement every line item (concurrently, independently)
//!                      ▼
//!           set received_to_supplier = 1
//!                      ▼
//!       Received | PartiallyReceived { failed_titles }
//! ```

pub mod engine;
pub mod error;
pub mod line_items;
pub mod money;
pub mod reports;
pub mod store;

pub use engine::OrderEngine;
pub use error::{OrderError, OrderResult};
pub use line_items::LineItem;
pub use reports::ReportPeriod;
pub use store::{CatalogStore, OrderStore, SqliteStore};
