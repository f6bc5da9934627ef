use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared handler state: the connection pool (already an `Arc`
/// internally) and the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    pub pool: pathways_db::DbPool,
    pub config: Arc<ServerConfig>,
}
