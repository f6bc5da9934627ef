//! User models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pathways_core::types::{DbId, Timestamp};

/// A user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
    pub created_at: Timestamp,
}

/// Input for creating a new user record.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
}
