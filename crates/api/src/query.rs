//! Shared pagination helpers for list endpoints.

/// Default page size when the client does not specify one.
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Hard ceiling on page size.
pub const MAX_PAGE_LIMIT: i64 = 200;

/// Clamp a client-supplied limit into `1..=MAX_PAGE_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
}

/// Clamp a client-supplied offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
