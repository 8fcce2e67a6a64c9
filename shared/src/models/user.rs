//! User Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
    DeliveryPartner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::DeliveryPartner => "delivery_partner",
        }
    }

    /// Admins and delivery partners handle the fulfilment side of orders
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::DeliveryPartner)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "delivery_partner" => Ok(Role::DeliveryPartner),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// User entity (password hash never leaves the server)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub is_blocked: bool,
    pub created_at: i64,
}

/// Signup payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

/// Signin payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Signin response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninResponse {
    pub message: String,
    pub token: String,
    pub role: Role,
}

/// `GET /api/auth/me` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserInfo {
    pub id: i64,
    pub email: String,
    pub role: Role,
}
