//! Delivery Detail Repository
//!
//! Every query is scoped by `user_id`: a user only ever sees and edits
//! their own addresses.

use super::{RepoError, RepoResult};
use shared::models::DeliveryDetail;
use sqlx::SqlitePool;

const DETAIL_SELECT: &str = "SELECT id, user_id, full_name, street_address, apartment, city, phone_number, email FROM delivery_details";

/// Validated address fields
#[derive(Debug, Clone)]
pub struct DeliveryDetailFields {
    pub full_name: String,
    pub street_address: String,
    pub apartment: Option<String>,
    pub city: String,
    pub phone_number: String,
    pub email: String,
}

pub async fn find_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<DeliveryDetail>> {
    let details = sqlx::query_as::<_, DeliveryDetail>(&format!(
        "{DETAIL_SELECT} WHERE user_id = ? ORDER BY id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(details)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    user_id: i64,
    id: i64,
) -> RepoResult<Option<DeliveryDetail>> {
    let detail = sqlx::query_as::<_, DeliveryDetail>(&format!(
        "{DETAIL_SELECT} WHERE id = ? AND user_id = ?"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(detail)
}

pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    fields: DeliveryDetailFields,
) -> RepoResult<DeliveryDetail> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO delivery_details (user_id, full_name, street_address, apartment, city, phone_number, email) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(&fields.full_name)
    .bind(&fields.street_address)
    .bind(&fields.apartment)
    .bind(&fields.city)
    .bind(&fields.phone_number)
    .bind(&fields.email)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, user_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create delivery detail".into()))
}

pub async fn update(
    pool: &SqlitePool,
    user_id: i64,
    id: i64,
    fields: DeliveryDetailFields,
) -> RepoResult<DeliveryDetail> {
    let rows = sqlx::query(
        "UPDATE delivery_details SET full_name = ?, street_address = ?, apartment = ?, city = ?, phone_number = ?, email = ? WHERE id = ? AND user_id = ?",
    )
    .bind(&fields.full_name)
    .bind(&fields.street_address)
    .bind(&fields.apartment)
    .bind(&fields.city)
    .bind(&fields.phone_number)
    .bind(&fields.email)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Delivery detail {id} not found")));
    }
    find_by_id(pool, user_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Delivery detail {id} not found")))
}

pub async fn delete(pool: &SqlitePool, user_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM delivery_details WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::user;
    use shared::models::Role;

    fn home() -> DeliveryDetailFields {
        DeliveryDetailFields {
            full_name: "Ada Lovelace".into(),
            street_address: "12 Analytical Way".into(),
            apartment: None,
            city: "London".into(),
            phone_number: "5550100".into(),
            email: "ada@example.com".into(),
        }
    }

    #[tokio::test]
    async fn test_details_are_scoped_to_owner() {
        let db = DbService::in_memory().await.unwrap();
        let owner = user::create(&db.pool, "ada@example.com", "h", Role::User)
            .await
            .unwrap();
        let other = user::create(&db.pool, "bob@example.com", "h", Role::User)
            .await
            .unwrap();

        let detail = create(&db.pool, owner.id, home()).await.unwrap();
        assert_eq!(detail.user_id, owner.id);

        assert!(find_by_id(&db.pool, other.id, detail.id).await.unwrap().is_none());
        assert!(matches!(
            update(&db.pool, other.id, detail.id, home()).await,
            Err(RepoError::NotFound(_))
        ));
        assert!(!delete(&db.pool, other.id, detail.id).await.unwrap());

        let mut moved = home();
        moved.city = "Paris".into();
        let updated = update(&db.pool, owner.id, detail.id, moved).await.unwrap();
        assert_eq!(updated.city, "Paris");

        assert_eq!(find_for_user(&db.pool, owner.id).await.unwrap().len(), 1);
        assert!(delete(&db.pool, owner.id, detail.id).await.unwrap());
    }
}
