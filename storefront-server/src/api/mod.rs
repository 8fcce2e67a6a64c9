//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册、登录、用户管理
//! - [`products`] - 商品目录
//! - [`cart`] - 购物车
//! - [`orders`] - 订单 (下单、收货、报表) 与收货地址
//! - [`slides`] - 首页轮播图

pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod products;
pub mod slides;

#[cfg(test)]
mod tests;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::core::ServerState;
use crate::db::repository::RepoError;
use crate::utils::{AppError, ErrorCode};

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        // Auth API - signup/signin rate limited
        .merge(auth::router(state))
        .merge(products::router())
        .merge(cart::router())
        .merge(orders::router())
        .merge(slides::router())
}

/// Build the fully configured application with middleware and state
pub fn build_app(state: ServerState) -> Router {
    let middleware = ServiceBuilder::new()
        // Request ID - outermost, visible to the trace span
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CorsLayer::permissive())
        // Product and slide images arrive base64-encoded in JSON bodies
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes));

    build_router(&state).layer(middleware).with_state(state)
}

/// Base64 decode failures surface as repository validation errors
pub(crate) fn image_error(err: RepoError) -> AppError {
    match err {
        RepoError::Validation(msg) => AppError::with_message(ErrorCode::InvalidImage, msg),
        other => other.into(),
    }
}
