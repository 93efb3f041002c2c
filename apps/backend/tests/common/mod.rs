//! Common test utilities and fixtures for integration tests.
//!
//! Every context runs against its own in-memory SQLite database with seeded
//! random sources, so the tests need no external services.

#![allow(dead_code)]

pub mod fixtures;

use axum::Router;
use axum_test::TestServer;
use flashdrill_core::{Settings, Trainer};
use rand::rngs::StdRng;
use rand::SeedableRng;

use flashdrill_backend::db::SqliteStorage;
use flashdrill_backend::{router, AppState};

/// Test context holding the database and the router built on it.
pub struct TestContext {
    pub storage: SqliteStorage,
    app: Router,
}

impl TestContext {
    /// Create a new test context on a fresh database.
    pub fn new() -> Self {
        let storage = SqliteStorage::open_in_memory().expect("Failed to open test database");
        Self::with_storage(storage)
    }

    /// Create a test context on an existing database, as a restarted
    /// server would.
    pub fn with_storage(storage: SqliteStorage) -> Self {
        let settings = Settings::default();
        let times = Trainer::times(Box::new(storage.clone()), settings.clone())
            .with_rng(StdRng::seed_from_u64(7));
        let vocab = Trainer::vocabulary(Box::new(storage.clone()), settings, fixtures::words())
            .with_rng(StdRng::seed_from_u64(8));
        let app = router(AppState::from_trainers(times, vocab));

        Self { storage, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }
}
