use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
///
/// `average_rating` and `items_sold` are owned by the review and
/// transaction subsystems; this service only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String, // stored lowercase, unique
    #[serde(skip_serializing)]
    pub password_hash: String, // argon2 hash, never exposed in JSON
    pub photo_url: Option<String>,
    pub average_rating: f64,
    pub items_sold: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
