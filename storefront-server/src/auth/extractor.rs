//! Current user extractor
//!
//! Validates the bearer JWT, then loads the account so that blocked or
//! deleted users lose access before their token expires.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::models::{Role, User};

use crate::auth::{JwtError, JwtService};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// 当前用户上下文
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
        }
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// admin or delivery partner
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            return Ok(());
        }
        security_log!("WARN", "admin_required", user_id = self.id, role = self.role.as_str());
        Err(AppError::new(ErrorCode::AdminRequired))
    }

    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff() {
            return Ok(());
        }
        security_log!("WARN", "staff_required", user_id = self.id, role = self.role.as_str());
        Err(AppError::with_message(
            ErrorCode::RoleRequired,
            "Admin or delivery partner role required",
        ))
    }

    /// Owner of a resource, or one of `roles`
    pub fn require_owner_or(&self, owner_id: i64, roles: &[Role]) -> Result<(), AppError> {
        if self.id == owner_id || roles.contains(&self.role) {
            return Ok(());
        }
        security_log!("WARN", "owner_required", user_id = self.id, owner_id = owner_id);
        Err(AppError::permission_denied("You do not have access to this resource"))
    }
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                return Err(AppError::not_authenticated());
            }
        };

        let claims = state.get_jwt_service().validate_token(token).map_err(|e| {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", parts.uri)
            );
            match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })?;

        let user_id = claims
            .user_id()
            .map_err(|e| AppError::invalid_token(e.to_string()))?;

        let account = user::find_by_id(&state.db.pool, user_id)
            .await?
            .ok_or_else(|| {
                security_log!("WARN", "auth_unknown_user", user_id = user_id);
                AppError::with_message(ErrorCode::NotAuthenticated, "User no longer exists")
            })?;

        if account.is_blocked {
            security_log!("WARN", "auth_blocked", user_id = user_id);
            return Err(AppError::new(ErrorCode::AccountBlocked));
        }

        let user = CurrentUser::from(account);
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Authentication when present: `None` without an Authorization header,
/// otherwise the same checks as [`CurrentUser`]
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<ServerState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(http::header::AUTHORIZATION) {
            return Ok(Self(None));
        }
        CurrentUser::from_request_parts(parts, state)
            .await
            .map(|user| Self(Some(user)))
    }
}
