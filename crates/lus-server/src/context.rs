//! Application context shared by all request handlers via Axum state.

use std::sync::Arc;

use lus_core::config::Config;
use lus_db::pool::DbPool;
use lus_drive::{Catalog, DriveClient};

/// Everything a handler needs, cheaply cloneable (Arcs and a pool handle).
///
/// The Drive client and catalog are constructed once at startup and shared by
/// every request; credentials are never re-read per request.
#[derive(Clone)]
pub struct AppContext {
    /// Database connection pool.
    pub db: DbPool,
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Shared Drive API client (token cache lives inside).
    pub drive: Arc<DriveClient>,
    /// Catalog resolver over the configured root folder.
    pub catalog: Arc<Catalog>,
}
