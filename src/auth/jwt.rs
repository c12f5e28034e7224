use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{
    auth::claims::Claims,
    config::JwtConfig,
    error::ApiError,
    state::AppState,
};

/// Signing and verification keys derived once from the process-wide
/// secret. Rotating the secret invalidates every outstanding token.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: TimeDuration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: TimeDuration::days(cfg.ttl_days),
        }
    }

    /// Mint a session token for `user_id`, expiring `ttl` from now.
    pub fn sign(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.sign_with_ttl(user_id, self.ttl)
    }

    pub(crate) fn sign_with_ttl(&self, user_id: Uuid, ttl: TimeDuration) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: (now + ttl).unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    /// Check signature and expiry, returning the embedded claims.
    ///
    /// Expired and invalid-signature tokens are distinguished from
    /// unparseable ones; all three reach the client as a generic 401.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        // No leeway: a token is expired the second its exp passes.
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => ApiError::ExpiredToken,
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidIssuer
                | ErrorKind::InvalidAudience
                | ErrorKind::ImmatureSignature => ApiError::InvalidToken,
                _ => ApiError::MalformedToken,
            }
        })?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::new(&state.config.jwt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_days: 7,
        })
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = make_keys("dev-secret");
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let keys = make_keys("secret-a");
        let other = make_keys("secret-b");
        let token = keys.sign(Uuid::new_v4()).expect("sign");
        let err = other.verify(&token).unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys("dev-secret");
        let token = keys
            .sign_with_ttl(Uuid::new_v4(), TimeDuration::seconds(-60))
            .expect("sign");
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, ApiError::ExpiredToken));
    }

    #[test]
    fn verify_accepts_token_just_before_expiry() {
        let keys = make_keys("dev-secret");
        let token = keys
            .sign_with_ttl(Uuid::new_v4(), TimeDuration::seconds(2))
            .expect("sign");
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = make_keys("dev-secret");
        let err = keys.verify("not-a-jwt").unwrap_err();
        assert!(matches!(err, ApiError::MalformedToken));
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let keys = make_keys("dev-secret");
        let token = keys.sign(Uuid::new_v4()).expect("sign");
        let mut parts: Vec<&str> = token.split('.').collect();
        let other = keys.sign(Uuid::new_v4()).expect("sign");
        let other_payload = other.split('.').nth(1).unwrap().to_string();
        parts[1] = &other_payload;
        let forged = parts.join(".");
        let err = keys.verify(&forged).unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }
}
