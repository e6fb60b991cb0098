use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cache::IntervalCache;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: razzie_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Memoized aggregation result, invalidated on every ingest.
    pub cache: Arc<IntervalCache>,
    /// Serializes ingest runs: the store replacement must be mutually
    /// exclusive with itself.
    pub ingest_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(pool: razzie_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            cache: Arc::new(IntervalCache::new()),
            ingest_lock: Arc::new(Mutex::new(())),
        }
    }
}
