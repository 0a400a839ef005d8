//! Axum router setup.

use crate::config::ServerConfig;
use crate::handlers::{login, sync};
use crate::storage::SyncStorage;
use accredit_core::{LoginPolicy, TransportCipher};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Dependencies every handler receives.
#[derive(Clone)]
pub struct AppState {
    pub storage: SyncStorage,
    pub cipher: Arc<TransportCipher>,
    pub login_policy: Arc<LoginPolicy>,
}

impl AppState {
    pub fn new(storage: SyncStorage, cipher: TransportCipher, login_policy: LoginPolicy) -> Self {
        Self {
            storage,
            cipher: Arc::new(cipher),
            login_policy: Arc::new(login_policy),
        }
    }
}

pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/api/MobileSync/login", post(login::login))
        .route("/api/MobileSync", post(sync::sync))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.max_payload_size))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
