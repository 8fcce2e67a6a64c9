//! Authentication Handlers
//!
//! Handles signup, signin and account administration

use std::time::Duration;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{CurrentUserInfo, Role, SigninRequest, SigninResponse, SignupRequest, User};

use crate::auth::{CurrentUser, MaybeUser, password};
use crate::core::ServerState;
use crate::db::repository::{RepoError, user};
use crate::security_log;
use crate::utils::validation::{validate_email, validate_password};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// Fixed delay for failed sign-ins to slow down credential guessing
const AUTH_FAILURE_DELAY_MS: u64 = 300;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Register an account
///
/// Anyone may create a `user`; other roles need an authenticated admin.
pub async fn signup(
    State(state): State<ServerState>,
    MaybeUser(caller): MaybeUser,
    Json(req): Json<SignupRequest>,
) -> AppResult<(StatusCode, ApiResponse<User>)> {
    let role = req.role.unwrap_or(Role::User);
    if role != Role::User {
        match &caller {
            Some(admin) => admin.require_admin()?,
            None => {
                return Err(AppError::with_message(
                    ErrorCode::AdminRequired,
                    format!("Only an admin can create {role} accounts"),
                ));
            }
        }
    }

    let email = normalize_email(&req.email);
    validate_email(&email)?;
    validate_password(&req.password)?;

    let hash = password::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let created = user::create(&state.db.pool, &email, &hash, role)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::EmailAlreadyUsed),
            other => other.into(),
        })?;

    security_log!("INFO", "signup", user_id = created.id, role = role.as_str());
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("User registered successfully", created),
    ))
}

/// Sign in and receive a bearer token
///
/// Unknown email and wrong password give the same error.
pub async fn signin(
    State(state): State<ServerState>,
    Json(req): Json<SigninRequest>,
) -> AppResult<Json<SigninResponse>> {
    let email = normalize_email(&req.email);
    let credential = user::find_credential_by_email(&state.db.pool, &email).await?;

    let account = match credential {
        Some(c) if password::verify_password(&req.password, &c.password_hash) => c,
        found => {
            security_log!("WARN", "signin_failed", email = email.as_str(), known = found.is_some());
            tokio::time::sleep(Duration::from_millis(AUTH_FAILURE_DELAY_MS)).await;
            return Err(AppError::invalid_credentials());
        }
    };

    if account.is_blocked {
        security_log!("WARN", "signin_blocked", user_id = account.id);
        return Err(AppError::new(ErrorCode::AccountBlocked));
    }

    let token = state
        .get_jwt_service()
        .generate_token(account.id, &account.email, account.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = account.id, role = %account.role, "User signed in");
    Ok(Json(SigninResponse {
        message: "Login successful".to_string(),
        token,
        role: account.role,
    }))
}

pub async fn me(current_user: CurrentUser) -> Json<CurrentUserInfo> {
    Json(CurrentUserInfo {
        id: current_user.id,
        email: current_user.email,
        role: current_user.role,
    })
}

pub async fn list_users(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<User>>> {
    current_user.require_admin()?;
    Ok(Json(user::find_all(&state.db.pool).await?))
}

pub async fn list_blocked(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<User>>> {
    current_user.require_admin()?;
    Ok(Json(user::find_blocked(&state.db.pool).await?))
}

pub async fn block(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(user_id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    current_user.require_admin()?;
    if user_id == current_user.id {
        return Err(AppError::new(ErrorCode::CannotBlockSelf));
    }
    set_blocked(&state, &current_user, user_id, true).await?;
    Ok(ApiResponse::success_with_message("User blocked successfully", ()))
}

pub async fn unblock(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(user_id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    current_user.require_admin()?;
    set_blocked(&state, &current_user, user_id, false).await?;
    Ok(ApiResponse::success_with_message("User unblocked successfully", ()))
}

async fn set_blocked(
    state: &ServerState,
    admin: &CurrentUser,
    user_id: i64,
    blocked: bool,
) -> AppResult<()> {
    user::set_blocked(&state.db.pool, user_id, blocked)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::UserNotFound, msg),
            other => other.into(),
        })?;
    security_log!(
        "INFO",
        "user_block_changed",
        admin_id = admin.id,
        user_id = user_id,
        blocked = blocked
    );
    Ok(())
}
