use super::*;
use crate::db::DbService;
use crate::db::repository::{RepoResult, product, user};
use crate::orders::store::SqliteStore;
use async_trait::async_trait;
use shared::models::{OneOrMany, ProductCreate, ProductSummary, Product, QuantityValue, Role};

mod test_queries;

struct TestEnv {
    db: DbService,
    engine: OrderEngine,
    user_id: i64,
}

async fn setup() -> TestEnv {
    let db = DbService::in_memory().await.unwrap();
    let store = Arc::new(SqliteStore::new(db.pool.clone()));
    let engine = OrderEngine::new(store.clone(), store);
    let user = user::create(&db.pool, "shopper@example.com", "hash", Role::User)
        .await
        .unwrap();
    TestEnv {
        db,
        engine,
        user_id: user.id,
    }
}

impl TestEnv {
    async fn add_product(&self, title: &str, qty: i64, price: f64) -> i64 {
        product::create(
            &self.db.pool,
            ProductCreate {
                title: title.to_string(),
                category: "General".to_string(),
                supply_price: price / 2.0,
                retail_price: price,
                available_quantity: qty,
                supplier: "Acme".to_string(),
                image1: None,
                image2: None,
                image3: None,
                image4: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn stock(&self, title: &str) -> Option<i64> {
        product::available_quantity_by_title(&self.db.pool, title)
            .await
            .unwrap()
    }

    async fn order_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.db.pool)
            .await
            .unwrap()
    }

    fn request(&self, items: &[(&str, i64)]) -> OrderCreate {
        checkout(self.user_id, items)
    }

    async fn place(&self, items: &[(&str, i64)]) -> Order {
        self.engine.create_order(self.request(items)).await.unwrap()
    }

    /// Store an order row as-is, bypassing creation checks
    async fn insert_raw(&self, id: &str, titles: &str, quantities: &str) {
        let order = Order {
            id: id.to_string(),
            user_id: self.user_id,
            product_title: titles.to_string(),
            quantity: quantities.to_string(),
            total: 1.0,
            name: "Ada".into(),
            address: "12 Analytical Way".into(),
            phone: "5550100".into(),
            email: "ada@example.com".into(),
            payment_method: "card".into(),
            received_to_supplier: false,
            created_at: now_millis(),
        };
        crate::db::repository::order::insert(&self.db.pool, &order)
            .await
            .unwrap();
    }
}

fn checkout(user_id: i64, items: &[(&str, i64)]) -> OrderCreate {
    OrderCreate {
        user_id: Some(user_id),
        product_title: Some(OneOrMany::Many(
            items.iter().map(|(t, _)| t.to_string()).collect(),
        )),
        quantity: Some(OneOrMany::Many(
            items.iter().map(|(_, q)| QuantityValue::Number(*q)).collect(),
        )),
        total: Some(42.0),
        name: Some("Ada".into()),
        address: Some("12 Analytical Way".into()),
        phone: Some("5550100".into()),
        email: Some("ada@example.com".into()),
        payment_method: Some("card".into()),
    }
}

/// Catalog wrapper failing lookups/decrements for selected titles
struct FaultyCatalog {
    inner: SqliteStore,
    fail_lookup: Vec<String>,
    fail_decrement: Vec<String>,
}

#[async_trait]
impl CatalogStore for FaultyCatalog {
    async fn available_quantity(&self, title: &str) -> RepoResult<Option<i64>> {
        if self.fail_lookup.iter().any(|t| t == title) {
            return Err(RepoError::Database("connection reset".into()));
        }
        self.inner.available_quantity(title).await
    }

    async fn decrement_quantity(&self, title: &str, amount: i64) -> RepoResult<u64> {
        if self.fail_decrement.iter().any(|t| t == title) {
            return Err(RepoError::Database("disk I/O error".into()));
        }
        self.inner.decrement_quantity(title, amount).await
    }

    async fn product_by_id(&self, id: i64) -> RepoResult<Option<Product>> {
        self.inner.product_by_id(id).await
    }

    async fn product_summaries(&self) -> RepoResult<Vec<ProductSummary>> {
        self.inner.product_summaries().await
    }
}

fn faulty_engine(env: &TestEnv, fail_lookup: &[&str], fail_decrement: &[&str]) -> OrderEngine {
    let store = SqliteStore::new(env.db.pool.clone());
    let catalog = FaultyCatalog {
        inner: store.clone(),
        fail_lookup: fail_lookup.iter().map(|s| s.to_string()).collect(),
        fail_decrement: fail_decrement.iter().map(|s| s.to_string()).collect(),
    };
    OrderEngine::new(Arc::new(catalog), Arc::new(store))
}

#[test]
fn test_generated_order_id_shape() {
    for _ in 0..100 {
        let id = generate_order_id();
        assert_eq!(id.len(), 6);
        assert!(id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
