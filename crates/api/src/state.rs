use std::sync::Arc;

use rbac_events::PubSub;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and everything else sits
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: rbac_db::DbPool,
    /// Server configuration (JWT settings, Pub/Sub switches).
    pub config: Arc<ServerConfig>,
    /// In-process Pub/Sub hub.
    pub pubsub: Arc<PubSub>,
}
