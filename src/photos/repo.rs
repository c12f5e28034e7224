use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Insert a photo row within the listing's transaction.
pub async fn insert_photo_tx(
    tx: &mut Transaction<'_, Postgres>,
    photo_id: Uuid,
    item_id: Uuid,
    s3_key: &str,
    content_type: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO photos (id, item_id, s3_key, content_type)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(photo_id)
    .bind(item_id)
    .bind(s3_key)
    .bind(content_type)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// All storage keys for an item's photos, oldest first.
pub async fn list_keys_by_item(db: &PgPool, item_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT s3_key
          FROM photos
         WHERE item_id = $1
         ORDER BY created_at ASC
        "#,
    )
    .bind(item_id)
    .fetch_all(db)
    .await
}
