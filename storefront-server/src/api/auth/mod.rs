//! Authentication Routes
//!
//! - /api/auth/signup, /api/auth/signin: public, rate limited per client IP
//! - /api/auth/me: authenticated
//! - /api/auth/users/*: admin only

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::rate_limit::{login_rate_limit, register_rate_limit};
use crate::core::ServerState;

/// Build authentication router
pub fn router(state: &ServerState) -> Router<ServerState> {
    let signup = Router::new()
        .route("/api/auth/signup", post(handler::signup))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            register_rate_limit,
        ));

    let signin = Router::new()
        .route("/api/auth/signin", post(handler::signin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    Router::new()
        .merge(signup)
        .merge(signin)
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/users", get(handler::list_users))
        .route("/api/auth/users/blocked", get(handler::list_blocked))
        .route("/api/auth/users/block/{user_id}", put(handler::block))
        .route("/api/auth/users/unblock/{user_id}", put(handler::unblock))
}
