use anyhow::Context;
use bytes::Bytes;
use uuid::Uuid;

use super::repo;
use crate::error::ApiResult;
use crate::state::AppState;

pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
}

/// Upload photo bytes to object storage, then link the rows to the item
/// in one transaction. Storage writes happen first so a failed link
/// never leaves an item pointing at missing objects.
pub async fn upload_and_link_photos(
    st: &AppState,
    seller_id: Uuid,
    item_id: Uuid,
    photos: Vec<UploadItem>,
) -> ApiResult<Vec<Uuid>> {
    struct Obj {
        id: Uuid,
        key: String,
        content_type: String,
    }
    let mut objs = Vec::with_capacity(photos.len());
    for photo in photos {
        let id = Uuid::new_v4();
        let ext = ext_from_mime(&photo.content_type).unwrap_or("bin");
        let key = format!("items/{}/{}-{}.{}", seller_id, item_id, id, ext);
        st.storage
            .put_object(&key, photo.body, &photo.content_type)
            .await
            .with_context(|| format!("put_object {}", key))?;
        objs.push(Obj {
            id,
            key,
            content_type: photo.content_type,
        });
    }

    let mut tx = st.db.begin().await?;
    for o in &objs {
        repo::insert_photo_tx(&mut tx, o.id, item_id, &o.key, &o.content_type).await?;
    }
    tx.commit().await?;

    Ok(objs.into_iter().map(|o| o.id).collect())
}

pub async fn presign_many(
    st: &AppState,
    keys: Vec<String>,
    expires_seconds: u64,
) -> anyhow::Result<Vec<String>> {
    let mut out = Vec::with_capacity(keys.len());
    for k in keys {
        out.push(st.storage.presign_get(&k, expires_seconds).await?);
    }
    Ok(out)
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}
