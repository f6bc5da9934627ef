//! HTTP handlers, grouped by resource.

pub mod admin;
pub mod auth;
pub mod campaigns;
pub mod phases;
pub mod templates;
pub mod versions;
