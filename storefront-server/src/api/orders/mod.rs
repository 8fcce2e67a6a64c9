//! Order API Module
//!
//! Thin HTTP layer over [`crate::orders::OrderEngine`].
//!
//! | 路径 | 方法 | 说明 | 角色 |
//! |------|------|------|------|
//! | /api/orders | GET | 未收货订单 | admin, delivery_partner |
//! | /api/orders/add | POST | 下单 | 登录用户 |
//! | /api/orders/received | GET | 已收货订单 | admin, delivery_partner |
//! | /api/orders/update-status | PUT | 标记收货并扣减库存 | admin, delivery_partner |
//! | /api/orders/user | GET | 我的订单 | 登录用户 |
//! | /api/orders/history | GET | 我的已收货订单 | 登录用户 |
//! | /api/orders/top-selling | GET | 畅销商品 | admin |
//! | /api/orders/sales-report | GET | 月度销售报表 | admin |
//! | /api/orders/{order_id}/received | PUT | 确认收货 | 下单人, admin, delivery_partner |
//! | /api/orders/{order_id} | DELETE | 取消订单 | 下单人, admin |
//! | /api/orders/delivery-details[/{id}] | * | 收货地址 | 登录用户 |

mod delivery_details;
mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_undelivered))
        .route("/add", post(handler::create))
        .route("/received", get(handler::list_received))
        .route("/update-status", put(handler::update_status))
        .route("/user", get(handler::list_for_user))
        .route("/history", get(handler::history))
        .route("/top-selling", get(handler::top_selling))
        .route("/sales-report", get(handler::sales_report))
        .route(
            "/delivery-details",
            get(delivery_details::list).post(delivery_details::create),
        )
        .route(
            "/delivery-details/{id}",
            get(delivery_details::get_by_id)
                .put(delivery_details::update)
                .delete(delivery_details::delete),
        )
        .route("/{order_id}/received", put(handler::mark_received))
        .route("/{order_id}", axum::routing::delete(handler::cancel))
}
