//! Order Repository

use super::RepoResult;
use shared::models::Order;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const ORDER_SELECT: &str = "SELECT id, user_id, product_title, quantity, total, name, address, phone, email, payment_method, received_to_supplier, created_at FROM orders";

/// Filter for order listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub user_id: Option<i64>,
    pub received: Option<bool>,
}

impl OrderFilter {
    pub fn received(received: bool) -> Self {
        Self {
            user_id: None,
            received: Some(received),
        }
    }

    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            received: None,
        }
    }
}

pub async fn insert(pool: &SqlitePool, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, user_id, product_title, quantity, total, name, address, phone, email, payment_method, received_to_supplier, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&order.id)
    .bind(order.user_id)
    .bind(&order.product_title)
    .bind(&order.quantity)
    .bind(order.total)
    .bind(&order.name)
    .bind(&order.address)
    .bind(&order.phone)
    .bind(&order.email)
    .bind(&order.payment_method)
    .bind(order.received_to_supplier)
    .bind(order.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("{ORDER_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

/// Flip the received flag; 0 affected rows when it was already set
pub async fn mark_received(pool: &SqlitePool, id: &str) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE orders SET received_to_supplier = 1 WHERE id = ? AND received_to_supplier = 0",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

/// Orders matching `filter`, newest first
pub async fn find_all(pool: &SqlitePool, filter: OrderFilter) -> RepoResult<Vec<Order>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(ORDER_SELECT);
    qb.push(" WHERE 1 = 1");
    if let Some(user_id) = filter.user_id {
        qb.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(received) = filter.received {
        qb.push(" AND received_to_supplier = ").push_bind(received);
    }
    qb.push(" ORDER BY created_at DESC, id");

    let orders = qb.build_query_as::<Order>().fetch_all(pool).await?;
    Ok(orders)
}

/// Orders created in `[from_ms, to_ms)`
pub async fn find_created_between(
    pool: &SqlitePool,
    from_ms: i64,
    to_ms: i64,
) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "{ORDER_SELECT} WHERE created_at >= ? AND created_at < ? ORDER BY created_at"
    ))
    .bind(from_ms)
    .bind(to_ms)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}
