//! Store seams for the order engine
//!
//! The engine only sees these traits; [`SqliteStore`] backs them with the
//! repository functions. Tests wrap it to inject failures.

use async_trait::async_trait;
use shared::models::{Order, Product, ProductSummary};
use sqlx::SqlitePool;

use crate::db::repository::order::OrderFilter;
use crate::db::repository::{RepoResult, order, product};

/// Catalog side: stock lookups and decrements keyed by product title
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// `None` when no product has this title
    async fn available_quantity(&self, title: &str) -> RepoResult<Option<i64>>;

    /// Relative decrement; returns the number of products changed
    async fn decrement_quantity(&self, title: &str, amount: i64) -> RepoResult<u64>;

    async fn product_by_id(&self, id: i64) -> RepoResult<Option<Product>>;

    async fn product_summaries(&self) -> RepoResult<Vec<ProductSummary>>;
}

/// Order records
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert_order(&self, order: &Order) -> RepoResult<()>;

    async fn find_order(&self, id: &str) -> RepoResult<Option<Order>>;

    /// Flip `received_to_supplier`; 0 when already set
    async fn set_received(&self, id: &str) -> RepoResult<u64>;

    async fn delete_order(&self, id: &str) -> RepoResult<u64>;

    async fn list_orders(&self, filter: OrderFilter) -> RepoResult<Vec<Order>>;

    async fn list_orders_between(&self, from_ms: i64, to_ms: i64) -> RepoResult<Vec<Order>>;
}

/// SQLite-backed implementation of both stores
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn available_quantity(&self, title: &str) -> RepoResult<Option<i64>> {
        product::available_quantity_by_title(&self.pool, title).await
    }

    async fn decrement_quantity(&self, title: &str, amount: i64) -> RepoResult<u64> {
        product::decrement_by_title(&self.pool, title, amount).await
    }

    async fn product_by_id(&self, id: i64) -> RepoResult<Option<Product>> {
        product::find_by_id(&self.pool, id).await
    }

    async fn product_summaries(&self) -> RepoResult<Vec<ProductSummary>> {
        product::find_summaries(&self.pool).await
    }
}

#[async_trait]
impl OrderStore for SqliteStore {
    async fn insert_order(&self, o: &Order) -> RepoResult<()> {
        order::insert(&self.pool, o).await
    }

    async fn find_order(&self, id: &str) -> RepoResult<Option<Order>> {
        order::find_by_id(&self.pool, id).await
    }

    async fn set_received(&self, id: &str) -> RepoResult<u64> {
        order::mark_received(&self.pool, id).await
    }

    async fn delete_order(&self, id: &str) -> RepoResult<u64> {
        order::delete(&self.pool, id).await
    }

    async fn list_orders(&self, filter: OrderFilter) -> RepoResult<Vec<Order>> {
        order::find_all(&self.pool, filter).await
    }

    async fn list_orders_between(&self, from_ms: i64, to_ms: i64) -> RepoResult<Vec<Order>> {
        order::find_created_between(&self.pool, from_ms, to_ms).await
    }
}
