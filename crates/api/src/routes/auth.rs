//! Route definitions for authentication.
//!
//! Registered under `/auth`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Auth routes, registered as `/auth`.
///
/// ```text
/// POST /register  register
/// POST /login     login
/// GET  /me        me
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
}
