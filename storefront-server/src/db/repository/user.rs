//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{Role, User};
use shared::util::now_millis;
use sqlx::SqlitePool;

const USER_SELECT: &str = "SELECT id, email, role, is_blocked, created_at FROM users";

/// User row including the credential, for sign-in only
#[derive(Debug, sqlx::FromRow)]
pub struct UserCredential {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_blocked: bool,
}

pub async fn create(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    role: Role,
) -> RepoResult<User> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (email, password_hash, role, created_at) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .bind(now_millis())
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!("Email {email} already exists")),
        other => other,
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_credential_by_email(
    pool: &SqlitePool,
    email: &str,
) -> RepoResult<Option<UserCredential>> {
    let row = sqlx::query_as::<_, UserCredential>(
        "SELECT id, email, password_hash, role, is_blocked FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!("{USER_SELECT} ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn find_blocked(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE is_blocked = 1 ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn set_blocked(pool: &SqlitePool, id: i64, blocked: bool) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE users SET is_blocked = ? WHERE id = ?")
        .bind(blocked)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}
