//! OrderEngine - 订单核心
//!
//! - 下单前库存校验 (并发查询, 汇总所有不足项)
//! - 创建订单 (不预留库存)
//! - 接收到供应商: 按行扣减库存, 无论扣减是否全部成功都翻转标记
//! - 订单查询

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use rand::Rng;
use shared::models::{Order, OrderCreate, ReceiveOutcome, ReceiveStatus, Shortfall};
use shared::util::now_millis;
use tokio::sync::Mutex;

use super::error::{OrderError, OrderResult};
use super::line_items::{LineItem, join_line_items, line_items_from_request, parse_line_items};
use super::money::validate_total;
use super::store::{CatalogStore, OrderStore};
use crate::db::repository::RepoError;
use crate::db::repository::order::OrderFilter;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN,
};

const ORDER_ID_LEN: usize = 6;
const ORDER_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ORDER_ID_ATTEMPTS: usize = 5;

/// Generate a 6-character uppercase alphanumeric order id
pub fn generate_order_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ORDER_ID_LEN)
        .map(|_| ORDER_ID_CHARSET[rng.gen_range(0..ORDER_ID_CHARSET.len())] as char)
        .collect()
}

pub struct OrderEngine {
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
    /// Per-order receive locks, removed once uncontended
    receive_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for OrderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderEngine")
            .field("receive_locks", &self.receive_locks.len())
            .finish()
    }
}

impl OrderEngine {
    pub fn new(catalog: Arc<dyn CatalogStore>, orders: Arc<dyn OrderStore>) -> Self {
        Self {
            catalog,
            orders,
            receive_locks: DashMap::new(),
        }
    }

    pub(crate) fn catalog(&self) -> &dyn CatalogStore {
        self.catalog.as_ref()
    }

    pub(crate) fn orders(&self) -> &dyn OrderStore {
        self.orders.as_ref()
    }

    // ========== Stock validation ==========

    /// Look up every item concurrently and collect all shortfalls.
    ///
    /// Read-only. Any lookup failure fails the whole check.
    pub async fn check_stock(&self, items: &[LineItem]) -> OrderResult<Vec<Shortfall>> {
        let lookups = items.iter().map(|item| async move {
            let available = self.catalog.available_quantity(&item.title).await?;
            Ok::<_, RepoError>((item, available))
        });

        let mut shortfalls = Vec::new();
        for result in join_all(lookups).await {
            let (item, available) = result?;
            match available {
                Some(qty) if qty >= item.quantity => {}
                other => shortfalls.push(Shortfall {
                    title: item.title.clone(),
                    requested_quantity: item.quantity,
                    available_quantity: other.unwrap_or(0),
                }),
            }
        }
        Ok(shortfalls)
    }

    // ========== Creation ==========

    /// Validate, check stock, persist. Stock is not reserved.
    pub async fn create_order(&self, req: OrderCreate) -> OrderResult<Order> {
        let NewOrder {
            user_id,
            items,
            total,
            name,
            address,
            phone,
            email,
            payment_method,
        } = NewOrder::validate(req)?;

        let shortfalls = self.check_stock(&items).await?;
        if !shortfalls.is_empty() {
            tracing::info!(
                user_id,
                shortfalls = shortfalls.len(),
                "Order rejected: insufficient stock"
            );
            return Err(OrderError::InsufficientStock(shortfalls));
        }

        let (product_title, quantity) = join_line_items(&items);
        let mut order = Order {
            id: String::new(),
            user_id,
            product_title,
            quantity,
            total,
            name,
            address,
            phone,
            email,
            payment_method,
            received_to_supplier: false,
            created_at: now_millis(),
        };

        for attempt in 1..=ORDER_ID_ATTEMPTS {
            order.id = generate_order_id();
            match self.orders.insert_order(&order).await {
                Ok(()) => {
                    tracing::info!(order_id = %order.id, user_id, items = items.len(), "Order created");
                    return Ok(order);
                }
                Err(RepoError::Duplicate(_)) if attempt < ORDER_ID_ATTEMPTS => {
                    tracing::warn!(order_id = %order.id, attempt, "Order id collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(OrderError::Repo(RepoError::Duplicate(
            "Could not allocate a unique order id".into(),
        )))
    }

    // ========== Receive transition ==========

    /// PLACED → RECEIVED, decrementing stock once per line item.
    ///
    /// - unknown order: `NotFound`, nothing changes
    /// - already received: `AlreadyReceived`, nothing changes
    /// - otherwise every decrement is attempted and the flag is set even
    ///   when some of them fail; those titles come back in `failed_titles`
    pub async fn receive(&self, order_id: &str) -> OrderResult<ReceiveOutcome> {
        let lock = self
            .receive_locks
            .entry(order_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock().await;
            self.receive_locked(order_id).await
        };

        drop(lock);
        self.receive_locks
            .remove_if(order_id, |_, l| Arc::strong_count(l) == 1);
        result
    }

    async fn receive_locked(&self, order_id: &str) -> OrderResult<ReceiveOutcome> {
        let order = self
            .orders
            .find_order(order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;

        if order.received_to_supplier {
            tracing::info!(order_id, "Order already received, skipping");
            return Ok(ReceiveOutcome {
                order_id: order.id,
                status: ReceiveStatus::AlreadyReceived,
                affected_rows: 0,
                decremented: Vec::new(),
                failed_titles: Vec::new(),
            });
        }

        let items = parse_line_items(&order.product_title, &order.quantity);
        let decrements = items.iter().map(|item| async move {
            let result = self
                .catalog
                .decrement_quantity(&item.title, item.quantity)
                .await;
            (item, result)
        });

        let mut decremented = Vec::new();
        let mut failed_titles = Vec::new();
        for (item, result) in join_all(decrements).await {
            match result {
                Ok(rows) if rows > 0 => decremented.push(item.title.clone()),
                Ok(_) => {
                    tracing::error!(order_id, title = %item.title, "No product matches line item");
                    failed_titles.push(item.title.clone());
                }
                Err(e) => {
                    tracing::error!(order_id, title = %item.title, quantity = item.quantity, error = %e, "Failed to decrement stock");
                    failed_titles.push(item.title.clone());
                }
            }
        }

        let affected_rows = self.orders.set_received(order_id).await?;

        let status = if failed_titles.is_empty() {
            tracing::info!(order_id, items = items.len(), "Order received to supplier");
            ReceiveStatus::Received
        } else {
            tracing::warn!(
                order_id,
                failed = ?failed_titles,
                "Order received but inventory partially updated"
            );
            ReceiveStatus::PartiallyReceived
        };

        Ok(ReceiveOutcome {
            order_id: order.id,
            status,
            affected_rows,
            decremented,
            failed_titles,
        })
    }

    // ========== Queries ==========

    pub async fn find(&self, order_id: &str) -> OrderResult<Order> {
        self.orders
            .find_order(order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
    }

    /// Orders not yet received to supplier
    pub async fn undelivered(&self) -> OrderResult<Vec<Order>> {
        Ok(self.orders.list_orders(OrderFilter::received(false)).await?)
    }

    pub async fn received(&self) -> OrderResult<Vec<Order>> {
        Ok(self.orders.list_orders(OrderFilter::received(true)).await?)
    }

    /// All of a user's orders regardless of status
    pub async fn for_user(&self, user_id: i64) -> OrderResult<Vec<Order>> {
        Ok(self.orders.list_orders(OrderFilter::for_user(user_id)).await?)
    }

    /// A user's received orders (shopper history)
    pub async fn history(&self, user_id: i64) -> OrderResult<Vec<Order>> {
        let filter = OrderFilter {
            user_id: Some(user_id),
            received: Some(true),
        };
        Ok(self.orders.list_orders(filter).await?)
    }

    /// Delete an order. Stock is left untouched.
    pub async fn cancel(&self, order_id: &str) -> OrderResult<()> {
        let rows = self.orders.delete_order(order_id).await?;
        if rows == 0 {
            return Err(OrderError::NotFound(order_id.to_string()));
        }
        tracing::info!(order_id, "Order cancelled");
        Ok(())
    }
}

/// Checkout payload after required-field validation
struct NewOrder {
    user_id: i64,
    items: Vec<LineItem>,
    total: f64,
    name: String,
    address: String,
    phone: String,
    email: String,
    payment_method: String,
}

impl NewOrder {
    fn validate(req: OrderCreate) -> OrderResult<Self> {
        let mut missing = Vec::new();
        if req.user_id.is_none() {
            missing.push("user_id");
        }
        if req.product_title.is_none() {
            missing.push("product_title");
        }
        if req.total.is_none() {
            missing.push("total");
        }
        let name = present(req.name, "name", &mut missing);
        let address = present(req.address, "address", &mut missing);
        let phone = present(req.phone, "phone", &mut missing);
        let email = present(req.email, "email", &mut missing);
        let payment_method = present(req.payment_method, "payment_method", &mut missing);

        let (Some(user_id), Some(titles), Some(total)) = (req.user_id, req.product_title, req.total)
        else {
            return Err(missing_fields(&missing));
        };
        if !missing.is_empty() {
            return Err(missing_fields(&missing));
        }

        check_len(&name, "name", MAX_NAME_LEN)?;
        check_len(&address, "address", MAX_ADDRESS_LEN)?;
        check_len(&phone, "phone", MAX_SHORT_TEXT_LEN)?;
        check_len(&email, "email", MAX_EMAIL_LEN)?;
        check_len(&payment_method, "payment_method", MAX_SHORT_TEXT_LEN)?;

        let total = validate_total(total)?;
        let items = line_items_from_request(titles, req.quantity)?;

        Ok(Self {
            user_id,
            items,
            total,
            name,
            address,
            phone,
            email,
            payment_method,
        })
    }
}

fn present(value: Option<String>, field: &'static str, missing: &mut Vec<&'static str>) -> String {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        missing.push(field);
    }
    value
}

fn missing_fields(fields: &[&str]) -> OrderError {
    OrderError::Validation(format!("Missing required fields: {}", fields.join(", ")))
}

fn check_len(value: &str, field: &str, max_len: usize) -> OrderResult<()> {
    if value.len() > max_len {
        return Err(OrderError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
