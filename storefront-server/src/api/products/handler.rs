//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{CategoryGroup, Product, ProductCreate, ProductSummary, ProductUpdate};

use crate::api::image_error;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, product};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

const DEFAULT_OTHER_LIMIT: i64 = 5;
const MAX_OTHER_LIMIT: i64 = 50;

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
        .with_detail("product_id", id)
}

/// Orders reference products by title in a comma-joined column
fn validate_title(title: &str) -> AppResult<()> {
    validate_required_text(title, "title", MAX_NAME_LEN)?;
    if title.contains(',') {
        return Err(AppError::validation("title must not contain ','"));
    }
    Ok(())
}

fn validate_amounts(
    supply_price: Option<f64>,
    retail_price: Option<f64>,
    available_quantity: Option<i64>,
) -> AppResult<()> {
    for (field, price) in [("supplyPrice", supply_price), ("retailPrice", retail_price)] {
        if let Some(p) = price
            && (!p.is_finite() || p < 0.0)
        {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("{field} must be a non-negative number"),
            ));
        }
    }
    if let Some(q) = available_quantity
        && q < 0
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "availableQuantity must not be negative",
        ));
    }
    Ok(())
}

/// All products, newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(product::find_all(&state.db.pool).await?))
}

pub async fn list_summaries(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<ProductSummary>>> {
    Ok(Json(product::find_summaries(&state.db.pool).await?))
}

pub async fn grouped_by_category(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<CategoryGroup>>> {
    Ok(Json(product::find_grouped_by_category(&state.db.pool).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherQuery {
    pub exclude_id: Option<i64>,
    pub limit: Option<i64>,
}

/// Random products, optionally excluding the one being viewed
pub async fn other(
    State(state): State<ServerState>,
    Query(query): Query<OtherQuery>,
) -> AppResult<Json<Vec<ProductSummary>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_OTHER_LIMIT)
        .clamp(1, MAX_OTHER_LIMIT);
    Ok(Json(
        product::find_random(&state.db.pool, query.exclude_id, limit).await?,
    ))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let product = product::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(product))
}

pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<Product>)> {
    current_user.require_admin()?;
    validate_title(&payload.title)?;
    validate_required_text(&payload.category, "category", MAX_NAME_LEN)?;
    validate_required_text(&payload.supplier, "supplier", MAX_NAME_LEN)?;
    validate_amounts(
        Some(payload.supply_price),
        Some(payload.retail_price),
        Some(payload.available_quantity),
    )?;

    let product = product::create(&state.db.pool, payload)
        .await
        .map_err(image_error)?;
    tracing::info!(product_id = product.id, title = %product.title, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Partial update; omitted fields and images keep their stored values
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    current_user.require_admin()?;
    if let Some(title) = &payload.title {
        validate_title(title)?;
    }
    if let Some(category) = &payload.category {
        validate_required_text(category, "category", MAX_NAME_LEN)?;
    }
    if let Some(supplier) = &payload.supplier {
        validate_required_text(supplier, "supplier", MAX_NAME_LEN)?;
    }
    validate_amounts(
        payload.supply_price,
        payload.retail_price,
        payload.available_quantity,
    )?;

    let product = product::update(&state.db.pool, id, payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => image_error(other),
        })?;
    tracing::info!(product_id = id, "Product updated");
    Ok(Json(product))
}

/// Delete a product and the cart lines referencing it
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    current_user.require_admin()?;
    if !product::delete(&state.db.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(product_id = id, "Product deleted");
    Ok(ApiResponse::success_with_message("Product deleted successfully", ()))
}
