//! Delivery Detail Handlers
//!
//! Saved shipping addresses, always scoped to the caller.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{DeliveryDetail, DeliveryDetailInput};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, delivery_detail};
use crate::db::repository::delivery_detail::DeliveryDetailFields;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, require_text, validate_email,
    validate_optional_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

fn not_found(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::DeliveryDetailNotFound,
        format!("Delivery detail {id} not found"),
    )
}

fn validate(input: DeliveryDetailInput) -> AppResult<DeliveryDetailFields> {
    let email = require_text(input.email, "email", MAX_EMAIL_LEN)?;
    validate_email(&email)?;
    validate_optional_text(&input.apartment, "apartment", MAX_SHORT_TEXT_LEN)?;

    Ok(DeliveryDetailFields {
        full_name: require_text(input.full_name, "fullName", MAX_NAME_LEN)?,
        street_address: require_text(input.street_address, "streetAddress", MAX_ADDRESS_LEN)?,
        apartment: input
            .apartment
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty()),
        city: require_text(input.city, "city", MAX_NAME_LEN)?,
        phone_number: require_text(input.phone_number, "phoneNumber", MAX_SHORT_TEXT_LEN)?,
        email,
    })
}

pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<DeliveryDetail>>> {
    let details = delivery_detail::find_for_user(&state.db.pool, current_user.id).await?;
    Ok(Json(details))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<DeliveryDetail>> {
    let detail = delivery_detail::find_by_id(&state.db.pool, current_user.id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(detail))
}

pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<DeliveryDetailInput>,
) -> AppResult<(StatusCode, Json<DeliveryDetail>)> {
    let fields = validate(payload)?;
    let detail = delivery_detail::create(&state.db.pool, current_user.id, fields).await?;
    tracing::info!(user_id = current_user.id, detail_id = detail.id, "Delivery detail created");
    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<DeliveryDetailInput>,
) -> AppResult<Json<DeliveryDetail>> {
    let fields = validate(payload)?;
    let detail = delivery_detail::update(&state.db.pool, current_user.id, id, fields)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.into(),
        })?;
    Ok(Json(detail))
}

pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    if !delivery_detail::delete(&state.db.pool, current_user.id, id).await? {
        return Err(not_found(id));
    }
    Ok(ApiResponse::success_with_message("Delivery detail deleted successfully", ()))
}
