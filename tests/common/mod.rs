//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, default config,
//! and a full [`AppContext`]. The [`TestHarness::with_server`] constructor
//! starts Axum on a random port for HTTP-level testing; Drive-backed tests
//! point the context at a wiremock server standing in for the Drive API.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use lus_core::config::Config;
use lus_db::pool::{init_memory_pool, DbPool};
use lus_drive::{Catalog, DriveClient};
use lus_server::context::AppContext;
use lus_server::router::build_router;

/// Drive folder id the harness configures as catalog root.
pub const TEST_ROOT: &str = "root";

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
}

impl TestHarness {
    /// Harness whose Drive base URL points at a closed port, so every
    /// catalog call degrades to empty.
    pub fn new() -> Self {
        Self::with_drive_base("http://127.0.0.1:9")
    }

    /// Harness whose Drive client talks to the given base URL (a wiremock
    /// server in tests).
    pub fn with_drive_base(base: &str) -> Self {
        let mut config = Config::default();
        config.drive.root_folder_id = TEST_ROOT.into();
        config.drive.api_base = base.to_string();
        // Small chunks keep the streaming tests cheap.
        config.drive.stream_chunk_bytes = 4;

        let db = init_memory_pool().expect("failed to create in-memory pool");
        let drive = Arc::new(DriveClient::with_static_token(base, "test-token"));
        let catalog = Arc::new(Catalog::new(drive.clone(), TEST_ROOT));

        let ctx = AppContext {
            db: db.clone(),
            config: Arc::new(config),
            drive,
            catalog,
        };

        Self { ctx, db }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::new().serve().await
    }

    /// Start an Axum server whose Drive client talks to `base`.
    pub async fn with_server_and_drive(base: &str) -> (Self, SocketAddr) {
        Self::with_drive_base(base).serve().await
    }

    async fn serve(self) -> (Self, SocketAddr) {
        let app = build_router(self.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (self, addr)
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> lus_db::pool::PooledConnection {
        lus_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }

    /// Seed a user directly in the database with a properly hashed password.
    pub fn create_user(&self, username: &str, password: &str) -> i64 {
        let conn = self.conn();
        let hash = lus_server::password::hash_password(password);
        lus_db::queries::users::create_user(&conn, username, &hash)
            .expect("failed to create user")
            .id
    }
}
