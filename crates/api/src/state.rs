use std::sync::Arc;

use botforge_provision::Provisioner;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: botforge_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Provisioning orchestrator (gate, lifecycle manager, catalog).
    pub provisioner: Arc<Provisioner>,
}
