use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Listing fields parsed from the multipart form.
#[derive(Debug, Default)]
pub struct NewItem {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub price: f64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub status: String,
    pub created_at: OffsetDateTime,
    pub photos: Vec<String>, // presigned GET URLs
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedItemResponse {
    pub id: Uuid,
    pub created_at: OffsetDateTime,
    pub photo_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}
