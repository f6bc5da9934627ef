//! Bearer-token extractor. Handlers take an [`AuthUser`] parameter to
//! require authentication; extraction failure short-circuits to 401
//! before the handler body runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use pathways_core::error::CoreError;
use pathways_core::roles::ROLE_ADMIN;
use pathways_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// The verified caller: database id plus the role snapshotted into the
/// token at login.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let claims = state
            .config
            .jwt
            .verify(token)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
