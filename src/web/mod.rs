//! Web layer
//!
//! Serves the generated playlists and lets an operator trigger a new
//! aggregation run. Handlers are thin; runs are executed by
//! [`AggregationService`] under the shared [`RunCoordinator`].

use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::{Config, defaults::DEFAULT_ADMIN_TOKEN};
use crate::errors::{AppError, AppResult};
use crate::services::{AggregationService, RunCoordinator};

pub mod handlers;
pub mod responses;

pub use responses::{ApiResponse, handle_error};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub aggregation: Arc<AggregationService>,
    pub coordinator: RunCoordinator,
}

pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(state: AppState) -> AppResult<Self> {
        let addr: SocketAddr = format!("{}:{}", state.config.web.host, state.config.web.port)
            .parse()
            .map_err(|e| AppError::configuration(format!("invalid listen address: {e}")))?;

        if state.config.web.admin_token == DEFAULT_ADMIN_TOKEN {
            warn!("Using the default admin token, set ADMIN_TOKEN before exposing this server");
        }

        Ok(Self {
            app: create_router(state),
            addr,
        })
    }

    pub async fn serve(self) -> AppResult<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("Listening on http://{}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Create the router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::status))
        .route("/playlist.m3u", get(handlers::playlist_m3u))
        .route("/playlist.txt", get(handlers::playlist_txt))
        .route("/update", post(handlers::trigger_update))
        .route("/validate", get(handlers::validate))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down web server");
}
