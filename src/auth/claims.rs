use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload proving a prior successful authentication. Tokens are not
/// stored server-side; signature plus expiry is the whole proof, so a
/// compromised token stays valid until it expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // user ID
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}
