//! Product Repository

use std::collections::BTreeMap;

use super::image::{self, ImageBlob};
use super::{RepoError, RepoResult};
use shared::models::{CategoryGroup, Product, ProductCreate, ProductSummary, ProductUpdate};
use shared::util::now_millis;
use sqlx::SqlitePool;

const PRODUCT_SELECT: &str = "SELECT id, title, category, supply_price, retail_price, available_quantity, supplier, image1, image1_type, image2, image2_type, image3, image3_type, image4, image4_type, created_at FROM products";

const SUMMARY_SELECT: &str =
    "SELECT id, title, category, retail_price, image1, image1_type FROM products";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    title: String,
    category: String,
    supply_price: f64,
    retail_price: f64,
    available_quantity: i64,
    supplier: String,
    image1: Option<Vec<u8>>,
    image1_type: Option<String>,
    image2: Option<Vec<u8>>,
    image2_type: Option<String>,
    image3: Option<Vec<u8>>,
    image3_type: Option<String>,
    image4: Option<Vec<u8>>,
    image4_type: Option<String>,
    created_at: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            category: row.category,
            supply_price: row.supply_price,
            retail_price: row.retail_price,
            available_quantity: row.available_quantity,
            supplier: row.supplier,
            image1: image::encode(row.image1, row.image1_type),
            image2: image::encode(row.image2, row.image2_type),
            image3: image::encode(row.image3, row.image3_type),
            image4: image::encode(row.image4, row.image4_type),
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: i64,
    title: String,
    category: String,
    retail_price: f64,
    image1: Option<Vec<u8>>,
    image1_type: Option<String>,
}

impl From<SummaryRow> for ProductSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            category: row.category,
            retail_price: row.retail_price,
            image1: image::encode(row.image1, row.image1_type),
        }
    }
}

fn blob_parts(blob: Option<ImageBlob>) -> (Option<Vec<u8>>, Option<String>) {
    match blob {
        Some(b) => (Some(b.bytes), Some(b.mime_type)),
        None => (None, None),
    }
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_SELECT} ORDER BY id DESC"))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Product::from).collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Product::from))
}

/// Listing view, newest first
pub async fn find_summaries(pool: &SqlitePool) -> RepoResult<Vec<ProductSummary>> {
    let rows = sqlx::query_as::<_, SummaryRow>(&format!("{SUMMARY_SELECT} ORDER BY id DESC"))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(ProductSummary::from).collect())
}

/// Listing view grouped by category (categories sorted by name)
pub async fn find_grouped_by_category(pool: &SqlitePool) -> RepoResult<Vec<CategoryGroup>> {
    let mut groups: BTreeMap<String, Vec<ProductSummary>> = BTreeMap::new();
    for summary in find_summaries(pool).await? {
        groups
            .entry(summary.category.clone())
            .or_default()
            .push(summary);
    }
    Ok(groups
        .into_iter()
        .map(|(category, products)| CategoryGroup { category, products })
        .collect())
}

/// Random selection for "you may also like", optionally excluding one product
pub async fn find_random(
    pool: &SqlitePool,
    exclude_id: Option<i64>,
    limit: i64,
) -> RepoResult<Vec<ProductSummary>> {
    let rows = sqlx::query_as::<_, SummaryRow>(&format!(
        "{SUMMARY_SELECT} WHERE (?1 IS NULL OR id != ?1) ORDER BY RANDOM() LIMIT ?2"
    ))
    .bind(exclude_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(ProductSummary::from).collect())
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    let (image1, image1_type) = blob_parts(image::decode_opt(data.image1.as_ref())?);
    let (image2, image2_type) = blob_parts(image::decode_opt(data.image2.as_ref())?);
    let (image3, image3_type) = blob_parts(image::decode_opt(data.image3.as_ref())?);
    let (image4, image4_type) = blob_parts(image::decode_opt(data.image4.as_ref())?);

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO products (title, category, supply_price, retail_price, available_quantity, supplier, image1, image1_type, image2, image2_type, image3, image3_type, image4, image4_type, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.title)
    .bind(&data.category)
    .bind(data.supply_price)
    .bind(data.retail_price)
    .bind(data.available_quantity)
    .bind(&data.supplier)
    .bind(image1)
    .bind(image1_type)
    .bind(image2)
    .bind(image2_type)
    .bind(image3)
    .bind(image3_type)
    .bind(image4)
    .bind(image4_type)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    let (image1, image1_type) = blob_parts(image::decode_opt(data.image1.as_ref())?);
    let (image2, image2_type) = blob_parts(image::decode_opt(data.image2.as_ref())?);
    let (image3, image3_type) = blob_parts(image::decode_opt(data.image3.as_ref())?);
    let (image4, image4_type) = blob_parts(image::decode_opt(data.image4.as_ref())?);

    let rows = sqlx::query(
        "UPDATE products SET title = COALESCE(?1, title), category = COALESCE(?2, category), supply_price = COALESCE(?3, supply_price), retail_price = COALESCE(?4, retail_price), available_quantity = COALESCE(?5, available_quantity), supplier = COALESCE(?6, supplier), image1 = COALESCE(?7, image1), image1_type = COALESCE(?8, image1_type), image2 = COALESCE(?9, image2), image2_type = COALESCE(?10, image2_type), image3 = COALESCE(?11, image3), image3_type = COALESCE(?12, image3_type), image4 = COALESCE(?13, image4), image4_type = COALESCE(?14, image4_type) WHERE id = ?15",
    )
    .bind(data.title)
    .bind(data.category)
    .bind(data.supply_price)
    .bind(data.retail_price)
    .bind(data.available_quantity)
    .bind(data.supplier)
    .bind(image1)
    .bind(image1_type)
    .bind(image2)
    .bind(image2_type)
    .bind(image3)
    .bind(image3_type)
    .bind(image4)
    .bind(image4_type)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Delete a product together with the cart lines pointing at it
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM carts WHERE product_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}

// =============================================================================
// Stock (title keyed, used by the order engine)
// =============================================================================

/// Current stock of the product with this title (lowest id on duplicates)
pub async fn available_quantity_by_title(
    pool: &SqlitePool,
    title: &str,
) -> RepoResult<Option<i64>> {
    let qty = sqlx::query_scalar::<_, i64>(
        "SELECT available_quantity FROM products WHERE title = ? ORDER BY id LIMIT 1",
    )
    .bind(title)
    .fetch_optional(pool)
    .await?;
    Ok(qty)
}

/// Relative decrement of the same row [`available_quantity_by_title`] reads;
/// returns affected rows.
///
/// Fails with [`RepoError::Validation`] when the result would be negative.
pub async fn decrement_by_title(pool: &SqlitePool, title: &str, amount: i64) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE products SET available_quantity = available_quantity - ? WHERE id = (SELECT id FROM products WHERE title = ? ORDER BY id LIMIT 1)",
    )
    .bind(amount)
    .bind(title)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}
