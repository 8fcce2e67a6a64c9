//! Slide API Module
//!
//! Home page carousel. Listing is public, writes require an admin.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Slide router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/slides", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/add", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
}
