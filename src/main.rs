//! EduTwin · Learning Platform Backend
//!
//! - Axum HTTP + WebSocket API over the learner state model
//!   (progress, quiz, leaderboard, notifications, understanding, preferences)
//! - Feeds persisted through a key-value store (file-backed by default)
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   EDUTWIN_CONFIG_PATH : path to TOML config (storage, quiz, leaderboard)
//!   EDUTWIN_DATA_DIR    : overrides the storage directory from the config
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod error;
mod config;
mod seeds;
mod storage;
mod leaderboard;
mod progress;
mod notifications;
mod understanding;
mod preferences;
mod auth;
mod quiz;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Shared state: config, catalog, sessions, leaderboard, persisted feeds.
  let state = Arc::new(AppState::new());

  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "edutwin_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "edutwin_backend", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "edutwin_backend", error = %e, "Cannot listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "edutwin_backend", "Shutdown signal received");
}
