//! Cart API Handlers

use axum::{Json, extract::State};
use shared::models::{CartAdd, CartLine, CartRemove, CartUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, cart};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

fn require_positive(quantity: i64) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidQuantity,
            format!("Quantity must be positive, got {quantity}"),
        ));
    }
    Ok(())
}

fn line_not_found(cart_id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::CartItemNotFound,
        format!("Cart item {cart_id} not found"),
    )
}

pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<CartLine>>> {
    Ok(Json(cart::find_for_user(&state.db.pool, current_user.id).await?))
}

/// Add a product, incrementing the quantity when it is already in the cart
pub async fn add(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CartAdd>,
) -> AppResult<ApiResponse<()>> {
    require_positive(payload.quantity)?;
    cart::add(
        &state.db.pool,
        current_user.id,
        payload.product_id,
        payload.quantity,
    )
    .await
    .map_err(|e| match e {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::ProductNotFound, msg),
        other => other.into(),
    })?;
    Ok(ApiResponse::success_with_message("Item added to cart", ()))
}

pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CartUpdate>,
) -> AppResult<ApiResponse<()>> {
    require_positive(payload.quantity)?;
    let rows = cart::update_quantity(
        &state.db.pool,
        current_user.id,
        payload.cart_id,
        payload.quantity,
    )
    .await?;
    if rows == 0 {
        return Err(line_not_found(payload.cart_id));
    }
    Ok(ApiResponse::success_with_message("Cart updated", ()))
}

pub async fn remove(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CartRemove>,
) -> AppResult<ApiResponse<()>> {
    if cart::remove(&state.db.pool, current_user.id, payload.cart_id).await? == 0 {
        return Err(line_not_found(payload.cart_id));
    }
    Ok(ApiResponse::success_with_message("Item removed from cart", ()))
}

/// Empty the cart; succeeds on an already empty cart
pub async fn empty(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<ApiResponse<()>> {
    let removed = cart::clear(&state.db.pool, current_user.id).await?;
    tracing::debug!(user_id = current_user.id, removed, "Cart emptied");
    Ok(ApiResponse::success_with_message("Cart emptied", ()))
}
