//! HTTP UI server for voxchat

pub mod chat;
pub mod health;

use std::sync::Arc;

use axum::{Router, response::Html, routing::get};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::conversation::{Orchestrator, SessionState};

/// The single-page chat UI
const INDEX_HTML: &str = include_str!("index.html");

/// Shared state for API handlers
pub struct ApiState {
    pub orchestrator: Arc<Orchestrator>,
    /// The one chat session served by this process
    pub session: Arc<Mutex<SessionState>>,
}

impl ApiState {
    /// Wrap an orchestrator with a fresh session
    #[must_use]
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            session: Arc::new(Mutex::new(SessionState::new())),
        }
    }
}

/// Build the router with all routes
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(index))
        .nest("/api", chat::router(state))
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// HTTP UI server
pub struct ApiServer {
    state: Arc<ApiState>,
    host: String,
    port: u16,
}

impl ApiServer {
    #[must_use]
    pub fn new(orchestrator: Orchestrator, host: impl Into<String>, port: u16) -> Self {
        Self {
            state: Arc::new(ApiState::new(orchestrator)),
            host: host.into(),
            port,
        }
    }

    /// Run the server until Ctrl-C
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind {addr}: {e}")))?;

        tracing::info!("chat UI listening on http://{addr}/");

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
