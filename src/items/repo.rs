use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub status: String, // 'active' | 'sold'
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const ITEM_COLUMNS: &str =
    "id, seller_id, title, description, price, status, created_at, updated_at";

pub async fn insert(
    db: &PgPool,
    seller_id: Uuid,
    title: &str,
    description: Option<&str>,
    price: f64,
) -> Result<Item, sqlx::Error> {
    sqlx::query_as::<_, Item>(&format!(
        r#"
        INSERT INTO items (seller_id, title, description, price)
        VALUES ($1, $2, $3, $4)
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(seller_id)
    .bind(title)
    .bind(description)
    .bind(price)
    .fetch_one(db)
    .await
}

/// Active listings, newest first.
pub async fn list_active(db: &PgPool, limit: i64, offset: i64) -> Result<Vec<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>(&format!(
        r#"
        SELECT {ITEM_COLUMNS}
          FROM items
         WHERE status = 'active'
         ORDER BY created_at DESC
         LIMIT $1 OFFSET $2
        "#
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}

pub async fn get(db: &PgPool, id: Uuid) -> Result<Option<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn count_active_for_seller(db: &PgPool, seller_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM items WHERE seller_id = $1 AND status = 'active'",
    )
    .bind(seller_id)
    .fetch_one(db)
    .await
}

/// Photo rows go with the item via ON DELETE CASCADE.
pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
