//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::models::{
    Order, OrderCreate, OrderCreated, OrderStatusUpdate, ReceiveOutcome, ReceiveStatus, Role,
    SalesReportQuery, SalesReportRow, TopSellingProduct,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::cart;
use crate::orders::{OrderError, ReportPeriod};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// Undelivered orders
pub async fn list_undelivered(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    current_user.require_staff()?;
    Ok(Json(state.orders.undelivered().await?))
}

/// Orders already received to supplier
pub async fn list_received(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    current_user.require_staff()?;
    Ok(Json(state.orders.received().await?))
}

/// Place an order
///
/// `user_id` defaults to the caller; ordering on behalf of someone else is
/// admin only. The caller's cart is emptied afterwards.
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(mut payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<OrderCreated>)> {
    match payload.user_id {
        Some(user_id) if user_id != current_user.id => current_user.require_admin()?,
        Some(_) => {}
        None => payload.user_id = Some(current_user.id),
    }

    let order = state.orders.create_order(payload).await?;

    if let Err(e) = cart::clear(&state.db.pool, order.user_id).await {
        tracing::warn!(order_id = %order.id, user_id = order.user_id, error = %e, "Failed to empty cart after checkout");
    }

    Ok((
        StatusCode::CREATED,
        Json(OrderCreated {
            message: "Order created successfully".to_string(),
            order_id: order.id,
        }),
    ))
}

/// Operator-side receive transition
///
/// Only `receivedToSupplier = true` is accepted. Failed decrements come back
/// as `InventoryPartiallyUpdated` (207) alongside the outcome.
pub async fn update_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<ApiResponse<ReceiveOutcome>> {
    current_user.require_staff()?;

    let (Some(order_id), Some(flag)) = (payload.order_id, payload.received_to_supplier) else {
        return Err(AppError::validation(
            "Missing required fields: orderId, receivedToSupplier",
        ));
    };
    if !flag.is_set() {
        return Err(OrderError::InvalidTransition(
            "Orders cannot be moved back out of received".into(),
        )
        .into());
    }

    let outcome = state.orders.receive(&order_id).await?;
    Ok(receive_response(outcome, "Order status updated successfully"))
}

/// Customer-side receive transition
pub async fn mark_received(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(order_id): Path<String>,
) -> AppResult<ApiResponse<ReceiveOutcome>> {
    let order = state.orders.find(&order_id).await?;
    current_user.require_owner_or(order.user_id, &[Role::Admin, Role::DeliveryPartner])?;

    let outcome = state.orders.receive(&order_id).await?;
    Ok(receive_response(outcome, "Order marked as received successfully"))
}

fn receive_response(outcome: ReceiveOutcome, message: &str) -> ApiResponse<ReceiveOutcome> {
    match outcome.status {
        ReceiveStatus::Received => ApiResponse::success_with_message(message, outcome),
        ReceiveStatus::AlreadyReceived => {
            ApiResponse::success_with_message("Order already marked as received", outcome)
        }
        ReceiveStatus::PartiallyReceived => {
            let err = AppError::with_message(
                ErrorCode::InventoryPartiallyUpdated,
                format!(
                    "Order status updated, but failed to update quantities for: {}",
                    outcome.failed_titles.join(", ")
                ),
            )
            .with_detail("failed_titles", outcome.failed_titles.clone());
            ApiResponse::partial(err, outcome)
        }
    }
}

/// The caller's orders
pub async fn list_for_user(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.orders.for_user(current_user.id).await?))
}

/// The caller's received orders
pub async fn history(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.orders.history(current_user.id).await?))
}

/// Cancel (delete) an order; stock is not restored
pub async fn cancel(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(order_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let order = state.orders.find(&order_id).await?;
    current_user.require_owner_or(order.user_id, &[Role::Admin])?;

    state.orders.cancel(&order_id).await?;
    Ok(ApiResponse::success_with_message("Order cancelled successfully", ()))
}

pub async fn top_selling(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<TopSellingProduct>>> {
    current_user.require_admin()?;
    Ok(Json(state.orders.top_selling().await?))
}

/// Monthly sales: `?month=1..12&year=YYYY`
pub async fn sales_report(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<SalesReportQuery>,
) -> AppResult<Json<Vec<SalesReportRow>>> {
    current_user.require_admin()?;
    let period = ReportPeriod::parse(query.month.as_deref(), query.year.as_deref())?;
    Ok(Json(state.orders.monthly_sales(period).await?))
}
