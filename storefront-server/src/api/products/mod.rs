//! Product API Module
//!
//! Reads are public; writes require an admin.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Product router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/display", get(handler::list_summaries))
        .route("/grouped-by-category", get(handler::grouped_by_category))
        .route("/other", get(handler::other))
        .route("/add", post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
