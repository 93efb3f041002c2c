pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod vocabulary;

use std::sync::{Arc, Mutex};

use axum::{
    routing::{get, post, put},
    Router,
};
use flashdrill_core::{GameKind, Settings, Trainer, WordEntry};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::SqliteStorage;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub times: Arc<Mutex<Trainer>>,
    pub vocab: Arc<Mutex<Trainer>>,
}

impl AppState {
    /// Open both games on one SQLite database.
    pub fn new(storage: SqliteStorage, settings: Settings, words: Vec<WordEntry>) -> Self {
        let times = Trainer::times(Box::new(storage.clone()), settings.clone());
        let vocab = Trainer::vocabulary(Box::new(storage), settings, words);
        Self::from_trainers(times, vocab)
    }

    pub fn from_trainers(times: Trainer, vocab: Trainer) -> Self {
        Self {
            times: Arc::new(Mutex::new(times)),
            vocab: Arc::new(Mutex::new(vocab)),
        }
    }

    pub fn trainer(&self, game: GameKind) -> &Arc<Mutex<Trainer>> {
        match game {
            GameKind::Times => &self.times,
            GameKind::Vocab => &self.vocab,
        }
    }
}

/// Build the router with all routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Card routes
        .route("/api/{game}/cards", get(routes::cards::list))
        .route("/api/{game}/cards/reset", post(routes::cards::reset))
        .route("/api/{game}/cards/{id}", get(routes::cards::get))
        .route("/api/{game}/history", get(routes::cards::history))
        .route("/api/{game}/stats", get(routes::cards::stats))
        .route("/api/{game}/config", get(routes::cards::last_config))
        // Feature routes
        .route("/api/{game}/features", get(routes::features::list))
        .route("/api/{game}/features/{id}", put(routes::features::toggle))
        // Round routes
        .route("/api/{game}/rounds", post(routes::rounds::start))
        .route(
            "/api/{game}/rounds/current",
            get(routes::rounds::current).delete(routes::rounds::abandon),
        )
        .route("/api/{game}/rounds/current/answers", post(routes::rounds::answer))
        .route("/api/{game}/rounds/current/tick", post(routes::rounds::tick))
        .route("/api/{game}/rounds/current/finish", post(routes::rounds::finish))
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Opening database at {}...", config.database_path.display());
    let storage = SqliteStorage::open(&config.database_path)?;

    let words = vocabulary::load(config.vocabulary_path.as_deref())?;
    tracing::info!("Loaded {} vocabulary entries", words.len());

    let state = AppState::new(storage, config.settings(), words);

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
