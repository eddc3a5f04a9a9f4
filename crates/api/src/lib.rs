//! `api` crate: HTTP surface of the control panel.
//!
//! Exposes:
//!   GET    /api/v1/cluster
//!   POST   /api/v1/cluster/refresh
//!   POST   /api/v1/commands
//!   GET    /api/v1/tutorial
//!   GET    /api/v1/tutorial/steps
//!   POST   /api/v1/tutorial/advance
//!
//! All handlers share one `TutorialSession` behind an async mutex, so
//! commands, advances, and background polls are processed one at a time.

pub mod config;
pub mod error;
pub mod handlers;
pub mod poller;
pub mod views;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use engine::TutorialSession;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::ServeConfig;
pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<TutorialSession>>,
}

impl AppState {
    pub fn new(session: TutorialSession) -> Self {
        Self { session: Arc::new(Mutex::new(session)) }
    }
}

/// Build the panel's router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/cluster", get(handlers::cluster::show))
        .route("/api/v1/cluster/refresh", post(handlers::cluster::refresh))
        .route("/api/v1/commands", post(handlers::commands::execute))
        .route("/api/v1/tutorial", get(handlers::tutorial::show))
        .route("/api/v1/tutorial/steps", get(handlers::tutorial::steps))
        .route("/api/v1/tutorial/advance", post(handlers::tutorial::advance))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the panel until the process is stopped.
///
/// Loads the cluster once before accepting requests; a failure there is
/// logged and the panel starts with an empty cluster.
pub async fn serve(config: ServeConfig, session: TutorialSession) -> std::io::Result<()> {
    let state = AppState::new(session);

    if let Err(e) = state.session.lock().await.refresh().await {
        tracing::warn!("initial refresh failed: {}", e);
    }

    if let Some(every) = config.poll_every() {
        poller::spawn(state.clone(), every);
    }

    let listener = TcpListener::bind(&config.bind).await?;
    info!("panel listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}
