//! MZ Quiz · single-session quiz backend
//!
//! - Loads a fixed question set from a CSV file at startup
//! - Axum HTTP + WebSocket API driving a per-session quiz state machine
//! - Serves question/result images and a static SPA (./static/index.html)
//!
//! Important env variables:
//!   PORT              : u16 (default 3000)
//!   QUIZ_CONFIG_PATH  : path to TOML config (title, paths)
//!   QUIZ_CSV_PATH     : overrides the question source path
//!   QUIZ_ASSET_DIR    : overrides the image directory
//!   QUIZ_SESSION_TTL_SECS : idle seconds before an HTTP session is dropped
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod domain;
mod config;
mod loader;
mod grader;
mod tier;
mod session;
mod assets;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::load_quiz_config_from_env;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let config = load_quiz_config_from_env();

  // No questions, no quiz: stop before serving anything.
  let state = match AppState::new(config) {
    Ok(s) => Arc::new(s),
    Err(e) => {
      error!(target: "mzquiz_backend", error = %e, "Failed to load questions");
      return Err(e.into());
    }
  };

  spawn_session_sweeper(state.clone());
  let app = build_router(state);

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "mzquiz_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "mzquiz_backend", "Server stopped");
  Ok(())
}

/// Periodically drop idle HTTP sessions that nobody comes back for.
fn spawn_session_sweeper(state: Arc<AppState>) {
  let period = state.session_ttl().min(Duration::from_secs(60)).max(Duration::from_secs(1));
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(period);
    loop {
      ticker.tick().await;
      state.sweep_expired().await;
    }
  });
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    error!(target: "mzquiz_backend", error = %e, "Failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
}
