use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, ProfileResponse, PublicUser, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::User,
    },
    error::{ApiError, ApiResult},
    items,
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Emails compare case-insensitively: one normalized form is used for
/// lookups, inserts and responses alike.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn keys(state: &AppState) -> JwtKeys {
    JwtKeys::new(&state.config.jwt)
}

/// Register a new account: validate, check the email is free, hash the
/// password, persist, and issue a session token.
pub async fn register(state: &AppState, payload: RegisterRequest) -> ApiResult<AuthResponse> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(ApiError::Validation(
            "Name, email, and password are required".into(),
        ));
    }
    if payload.password.len() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }

    let email = normalize_email(&payload.email);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    // Advisory check for a friendly error; the unique constraint on
    // users.email decides races between concurrent registrations.
    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, payload.name.trim(), &email, &hash).await?;
    let token = keys(state).sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(AuthResponse {
        token,
        user: PublicUser::from(user),
    })
}

/// Log in with email and password. Unknown email and wrong password are
/// indistinguishable from the outside.
pub async fn login(state: &AppState, payload: LoginRequest) -> ApiResult<AuthResponse> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".into(),
        ));
    }

    let email = normalize_email(&payload.email);
    let user = match User::find_by_email(&state.db, &email).await? {
        Some(u) => u,
        None => {
            warn!(email = %email, "login unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = keys(state).sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(AuthResponse {
        token,
        user: PublicUser::from(user),
    })
}

/// Resolve the user behind a verified token.
pub async fn current_user(state: &AppState, user_id: Uuid) -> ApiResult<PublicUser> {
    match User::find_by_id(&state.db, user_id).await? {
        Some(user) => Ok(PublicUser::from(user)),
        None => Err(ApiError::NotFound("User not found".into())),
    }
}

/// Seller profile: public view plus the count of active listings.
pub async fn profile(state: &AppState, user_id: Uuid) -> ApiResult<ProfileResponse> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    let items_count = items::repo::count_active_for_seller(&state.db, user_id).await?;
    Ok(ProfileResponse {
        user: PublicUser::from(user),
        items_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_req(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("spaces in@x.com"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[test]
    fn email_normalization_lowercases_and_trims() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
        assert_eq!(normalize_email("a@x.com"), "a@x.com");
    }

    // Validation failures return before any database access, so the
    // fake state's lazy pool is never touched.

    #[tokio::test]
    async fn register_rejects_missing_fields() {
        let state = AppState::fake();
        for req in [
            register_req("", "a@x.com", "secret1"),
            register_req("Alice", "", "secret1"),
            register_req("Alice", "a@x.com", ""),
        ] {
            let err = register(&state, req).await.unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let state = AppState::fake();
        let err = register(&state, register_req("Alice", "a@x.com", "12345"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn register_rejects_invalid_email() {
        let state = AppState::fake();
        let err = register(&state, register_req("Alice", "not-an-email", "secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn login_rejects_missing_fields() {
        let state = AppState::fake();
        for (email, password) in [("", "secret1"), ("a@x.com", ""), ("", "")] {
            let err = login(
                &state,
                LoginRequest {
                    email: email.into(),
                    password: password.into(),
                },
            )
            .await
            .unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
        }
    }

    #[test]
    fn both_login_failure_modes_share_one_message() {
        // Unknown email and wrong password surface the same error, so
        // neither response leaks which field was wrong.
        assert_eq!(
            ApiError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }
}
