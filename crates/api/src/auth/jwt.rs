//! Stateless HS256 access tokens.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pathways_core::types::DbId;

const DEFAULT_EXPIRY_MINS: i64 = 60;

/// Payload carried by every access token. `sub` is the user's database
/// id and `role` is snapshotted at login, so a role change takes effect
/// on the next token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: DbId,
    pub role: String,
    /// Expiry, Unix seconds.
    pub exp: i64,
    /// Issued at, Unix seconds.
    pub iat: i64,
    /// Token id for audit trails.
    pub jti: String,
}

/// Signing key plus token lifetime. Built once at startup and shared
/// through [`crate::state::AppState`].
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty) and
    /// `JWT_ACCESS_EXPIRY_MINS` (optional, default 60) from the
    /// environment. Panics on a missing or empty secret so a
    /// misconfigured deployment dies at startup rather than issuing
    /// unverifiable tokens.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .ok()
            .map(|raw| {
                raw.parse::<i64>()
                    .expect("JWT_ACCESS_EXPIRY_MINS must be an integer")
            })
            .unwrap_or(DEFAULT_EXPIRY_MINS);

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Sign a fresh access token for `user_id`.
    pub fn issue(&self, user_id: DbId, role: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            role: role.to_string(),
            exp: iat + self.access_token_expiry_mins * 60,
            iat,
            jti: Uuid::new_v4().to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}
