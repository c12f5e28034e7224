use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    photos,
    photos::services::UploadItem,
    state::AppState,
};

use super::dto::{CreatedItemResponse, ItemDetails, ItemSummary, NewItem, Pagination};
use super::{repo, services};

const PHOTO_URL_TTL_SECS: u64 = 30 * 60;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items))
        .route("/items/:id", get(get_item))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/items", post(create_item))
        .route("/items/:id", delete(delete_item))
        .layer(DefaultBodyLimit::max(5 * 1024 * 1024))
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> ApiResult<Json<Vec<ItemSummary>>> {
    let items = repo::list_active(&state.db, p.limit, p.offset).await?;
    let summaries = items
        .into_iter()
        .map(|i| ItemSummary {
            id: i.id,
            seller_id: i.seller_id,
            title: i.title,
            price: i.price,
            created_at: i.created_at,
        })
        .collect();
    Ok(Json(summaries))
}

#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ItemDetails>> {
    let item = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".into()))?;

    let keys = photos::repo::list_keys_by_item(&state.db, id).await?;
    let urls = photos::services::presign_many(&state, keys, PHOTO_URL_TTL_SECS).await?;

    Ok(Json(ItemDetails {
        id: item.id,
        seller_id: item.seller_id,
        title: item.title,
        description: item.description,
        price: item.price,
        status: item.status,
        created_at: item.created_at,
        photos: urls,
    }))
}

/// POST /items: multipart form with title, price, optional description,
/// and photo files under `files`.
#[instrument(skip(state, mp))]
pub async fn create_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut mp: Multipart,
) -> ApiResult<(StatusCode, HeaderMap, Json<CreatedItemResponse>)> {
    let mut new_item = NewItem::default();
    let mut price_seen = false;
    let mut files: Vec<UploadItem> = Vec::new();

    while let Ok(Some(field)) = mp.next_field().await {
        match field.name().map(|s| s.to_string()).as_deref() {
            Some("title") => {
                new_item.title = field
                    .text()
                    .await
                    .map_err(|_| ApiError::Validation("Invalid title field".into()))?;
            }
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::Validation("Invalid description field".into()))?;
                if !text.is_empty() {
                    new_item.description = Some(text);
                }
            }
            Some("price") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::Validation("Invalid price field".into()))?;
                new_item.price = text
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ApiError::Validation("Price must be a number".into()))?;
                price_seen = true;
            }
            Some("files") | Some("files[]") => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::Validation("Unreadable file field".into()))?;
                files.push(UploadItem {
                    body: data,
                    content_type,
                });
            }
            _ => {}
        }
    }

    if !price_seen {
        return Err(ApiError::Validation("Price is required".into()));
    }
    if files.is_empty() {
        return Err(ApiError::Validation("files is required".into()));
    }

    let (item_id, created_at, photo_ids) =
        services::create_item_with_photos(&state, user_id, new_item, files).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/items/{}", item_id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }

    Ok((
        StatusCode::CREATED,
        headers,
        Json(CreatedItemResponse {
            id: item_id,
            created_at,
            photo_ids,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    services::delete_item(&state, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
