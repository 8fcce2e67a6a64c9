//! Cart Repository

use super::image;
use super::{RepoError, RepoResult};
use shared::models::CartLine;
use sqlx::SqlitePool;

#[derive(sqlx::FromRow)]
struct CartLineRow {
    id: i64,
    product_id: i64,
    title: String,
    price: f64,
    image1: Option<Vec<u8>>,
    image1_type: Option<String>,
    quantity: i64,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            title: row.title,
            price: row.price,
            image: image::encode(row.image1, row.image1_type),
            quantity: row.quantity,
            total_price: row.price * row.quantity as f64,
        }
    }
}

pub async fn find_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<CartLine>> {
    let rows = sqlx::query_as::<_, CartLineRow>(
        "SELECT c.id, c.product_id, p.title, p.retail_price AS price, p.image1, p.image1_type, c.quantity FROM carts c JOIN products p ON c.product_id = p.id WHERE c.user_id = ? ORDER BY c.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(CartLine::from).collect())
}

/// Insert a line or increment the existing one for this product
pub async fn add(pool: &SqlitePool, user_id: i64, product_id: i64, quantity: i64) -> RepoResult<()> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(RepoError::NotFound(format!("Product {product_id} not found")));
    }

    sqlx::query(
        "INSERT INTO carts (user_id, product_id, quantity) VALUES (?, ?, ?) ON CONFLICT (user_id, product_id) DO UPDATE SET quantity = quantity + excluded.quantity",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .execute(pool)
    .await?;
    Ok(())
}

/// Set quantity of one of the user's lines; returns affected rows
pub async fn update_quantity(
    pool: &SqlitePool,
    user_id: i64,
    cart_id: i64,
    quantity: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE carts SET quantity = ? WHERE id = ? AND user_id = ?")
        .bind(quantity)
        .bind(cart_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn remove(pool: &SqlitePool, user_id: i64, cart_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM carts WHERE id = ? AND user_id = ?")
        .bind(cart_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn clear(pool: &SqlitePool, user_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM carts WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
