//! Shared primitive aliases used across the workspace.

/// Primary-key type for every table (PostgreSQL BIGSERIAL).
pub type DbId = i64;

/// UTC timestamp, as stored in TIMESTAMPTZ columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
