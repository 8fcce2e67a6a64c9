//! Slide Repository

use super::image;
use super::{RepoError, RepoResult};
use shared::models::{Slide, SlideCreate, SlideUpdate};
use sqlx::SqlitePool;

#[derive(sqlx::FromRow)]
struct SlideRow {
    id: i64,
    icon: Option<String>,
    title: String,
    description: String,
    image: Option<Vec<u8>>,
    image_type: Option<String>,
    alt: Option<String>,
}

impl From<SlideRow> for Slide {
    fn from(row: SlideRow) -> Self {
        Self {
            id: row.id,
            icon: row.icon,
            title: row.title,
            description: row.description,
            image: image::data_url(row.image, row.image_type),
            alt: row.alt,
        }
    }
}

const SLIDE_SELECT: &str = "SELECT id, icon, title, description, image, image_type, alt FROM slides";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Slide>> {
    let rows = sqlx::query_as::<_, SlideRow>(&format!("{SLIDE_SELECT} ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Slide::from).collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Slide>> {
    let row = sqlx::query_as::<_, SlideRow>(&format!("{SLIDE_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Slide::from))
}

pub async fn create(pool: &SqlitePool, data: SlideCreate) -> RepoResult<Slide> {
    let blob = image::decode(&data.image)?;
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO slides (icon, title, description, image, image_type, alt) VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.icon)
    .bind(&data.title)
    .bind(&data.description)
    .bind(blob.bytes)
    .bind(blob.mime_type)
    .bind(&data.alt)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create slide".into()))
}

/// Replace text fields; the stored image is kept when none is supplied
pub async fn update(pool: &SqlitePool, id: i64, data: SlideUpdate) -> RepoResult<Slide> {
    let (bytes, mime_type) = match image::decode_opt(data.image.as_ref())? {
        Some(blob) => (Some(blob.bytes), Some(blob.mime_type)),
        None => (None, None),
    };

    let rows = sqlx::query(
        "UPDATE slides SET icon = ?1, title = ?2, description = ?3, image = COALESCE(?4, image), image_type = COALESCE(?5, image_type), alt = ?6 WHERE id = ?7",
    )
    .bind(&data.icon)
    .bind(&data.title)
    .bind(&data.description)
    .bind(bytes)
    .bind(mime_type)
    .bind(&data.alt)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Slide {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Slide {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM slides WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
