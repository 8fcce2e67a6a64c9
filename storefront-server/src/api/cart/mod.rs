//! Cart API Module
//!
//! Every route acts on the authenticated caller's cart.

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

/// Cart router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/add", post(handler::add))
        .route("/update", put(handler::update))
        .route("/remove", delete(handler::remove))
        .route("/empty", post(handler::empty))
        .route("/empty1", delete(handler::empty))
}
