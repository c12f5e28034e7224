use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, MeResponse, ProfileResponse, RegisterRequest},
        extractors::AuthUser,
        services,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(get_me))
        .route("/auth/profile/:user_id", get(get_profile))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let resp = services::register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let resp = services::login(&state, payload).await?;
    Ok(Json(resp))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let user = services::current_user(&state, user_id).await?;
    Ok(Json(MeResponse { user }))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let resp = services::profile(&state, user_id).await?;
    Ok(Json(resp))
}

#[cfg(test)]
mod tests {
    use crate::auth::dto::{AuthResponse, ProfileResponse, PublicUser};

    fn public_user() -> PublicUser {
        PublicUser {
            id: uuid::Uuid::new_v4(),
            name: "Alice".into(),
            email: "a@x.com".into(),
            photo_url: None,
            average_rating: 4.5,
            items_sold: 3,
        }
    }

    #[test]
    fn auth_response_wire_shape() {
        let resp = AuthResponse {
            token: "jwt".into(),
            user: public_user(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["token"], "jwt");
        assert_eq!(json["user"]["email"], "a@x.com");
        // frontend contract: camelCase with literal photoURL
        assert!(json["user"].get("photoURL").is_some());
        assert_eq!(json["user"]["averageRating"], 4.5);
        assert_eq!(json["user"]["itemsSold"], 3);
        assert!(json["user"].get("password_hash").is_none());
    }

    #[test]
    fn profile_response_wire_shape() {
        let resp = ProfileResponse {
            user: public_user(),
            items_count: 2,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["itemsCount"], 2);
        assert_eq!(json["user"]["name"], "Alice");
    }
}
