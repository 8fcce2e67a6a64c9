//! Slide API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Slide, SlideCreate, SlideUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, slide};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::api::image_error;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::SlideNotFound, format!("Slide {id} not found"))
}

fn validate_text(
    title: &str,
    description: &str,
    icon: &Option<String>,
    alt: &Option<String>,
) -> AppResult<()> {
    validate_required_text(title, "title", MAX_NAME_LEN)?;
    validate_required_text(description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(icon, "icon", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(alt, "alt", MAX_NAME_LEN)?;
    Ok(())
}

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Slide>>> {
    Ok(Json(slide::find_all(&state.db.pool).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<SlideCreate>,
) -> AppResult<(StatusCode, Json<Slide>)> {
    current_user.require_admin()?;
    validate_text(&payload.title, &payload.description, &payload.icon, &payload.alt)?;

    let slide = slide::create(&state.db.pool, payload)
        .await
        .map_err(image_error)?;
    tracing::info!(slide_id = slide.id, "Slide created");
    Ok((StatusCode::CREATED, Json(slide)))
}

/// Replace a slide; the stored image is kept when none is sent
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<SlideUpdate>,
) -> AppResult<Json<Slide>> {
    current_user.require_admin()?;
    validate_text(&payload.title, &payload.description, &payload.icon, &payload.alt)?;

    let slide = slide::update(&state.db.pool, id, payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => image_error(other),
        })?;
    Ok(Json(slide))
}

pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    current_user.require_admin()?;
    if !slide::delete(&state.db.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(slide_id = id, "Slide deleted");
    Ok(ApiResponse::success_with_message("Slide deleted successfully", ()))
}
