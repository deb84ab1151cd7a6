//! lus-server: the HTTP API server.
//!
//! Ties the other lus-* crates into a running application: Axum router over
//! the Drive-backed catalog, the correction history, and the user directory,
//! with graceful shutdown on SIGINT/SIGTERM.

pub mod context;
pub mod error;
pub mod password;
pub mod router;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use lus_core::config::Config;
use lus_drive::{Catalog, DriveClient};

use crate::context::AppContext;

/// Start the server.
///
/// Initializes the database, constructs the process-lifetime Drive client
/// and catalog, and serves the router until a shutdown signal arrives.
pub async fn start(config: Config) -> lus_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    // Initialize database.
    let db_path = &config.server.db_path;
    let existed = db_path.exists();
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            tracing::info!("Created database directory {}", parent.display());
        }
    }
    let db_str = db_path.to_string_lossy();
    let db = lus_db::pool::init_pool(&db_str)?;
    if existed {
        tracing::info!("Database opened (existing) at {db_str}");
    } else {
        tracing::info!("Database created (new) at {db_str}");
    }

    // One Drive client for the whole process; every request reuses it.
    let drive = Arc::new(DriveClient::from_config(&config.drive)?);
    let catalog = Arc::new(Catalog::new(
        drive.clone(),
        config.drive.root_folder_id.clone(),
    ));

    let ctx = AppContext {
        db,
        config: Arc::new(config.clone()),
        drive,
        catalog,
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| lus_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let app = router::build_router(ctx);

    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| lus_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| lus_core::Error::Internal(format!("Server error: {e}")))?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
