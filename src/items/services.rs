use anyhow::Context;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{dto::NewItem, repo};
use crate::{
    error::{ApiError, ApiResult},
    photos::services::{upload_and_link_photos, UploadItem},
    state::AppState,
};

/// Create a listing and attach its photos.
pub async fn create_item_with_photos(
    st: &AppState,
    seller_id: Uuid,
    new_item: NewItem,
    photos: Vec<UploadItem>,
) -> ApiResult<(Uuid, OffsetDateTime, Vec<Uuid>)> {
    if new_item.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".into()));
    }
    if !new_item.price.is_finite() || new_item.price < 0.0 {
        return Err(ApiError::Validation("Price must be non-negative".into()));
    }

    let item = repo::insert(
        &st.db,
        seller_id,
        new_item.title.trim(),
        new_item.description.as_deref(),
        new_item.price,
    )
    .await?;

    let photo_ids = upload_and_link_photos(st, seller_id, item.id, photos).await?;

    info!(item_id = %item.id, seller_id = %seller_id, photos = photo_ids.len(), "item listed");
    Ok((item.id, item.created_at, photo_ids))
}

/// Remove a listing: stored objects first, then the rows.
pub async fn delete_item(st: &AppState, seller_id: Uuid, item_id: Uuid) -> ApiResult<()> {
    let item = repo::get(&st.db, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".into()))?;

    if item.seller_id != seller_id {
        warn!(item_id = %item_id, seller_id = %seller_id, "delete of foreign item");
        return Err(ApiError::Forbidden);
    }

    for key in crate::photos::repo::list_keys_by_item(&st.db, item_id).await? {
        st.storage
            .delete_object(&key)
            .await
            .with_context(|| format!("delete_object {}", key))?;
    }
    repo::delete(&st.db, item_id).await?;

    info!(item_id = %item_id, seller_id = %seller_id, "item deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_rejects_blank_title() {
        let state = AppState::fake();
        let err = create_item_with_photos(
            &state,
            Uuid::new_v4(),
            NewItem {
                title: "  ".into(),
                description: None,
                price: 10.0,
            },
            vec![],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_negative_price() {
        let state = AppState::fake();
        let err = create_item_with_photos(
            &state,
            Uuid::new_v4(),
            NewItem {
                title: "Lamp".into(),
                description: None,
                price: -1.0,
            },
            vec![],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
