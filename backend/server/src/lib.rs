//! RSVP confirmation service for a private party.
//!
//! A guest types their name into a single form. The name is matched
//! case-insensitively as a prefix against a fixed guest list stored in SQLite.
//! One match confirms the guest and emails the organizer. No match or several
//! matches are reported back on the same page.
//!
//!
//!
//! # Flow
//!
//! - `GET /` renders the empty form
//! - `POST /` with `nome` looks up every guest whose name starts with it
//! - 0 matches: not on the list
//! - 1 match: confirmed, organizer notified (best-effort)
//! - 2+ matches: ask for first and last name
//!
//!
//!
//! # Setup
//!
//! Run locally, notifications disabled.
//! ```sh
//! cargo run -p rsvp
//! ```
//!
//! With notifications.
//! ```sh
//! EMAIL_USER=me@gmail.com EMAIL_PASS=app-password cargo run -p rsvp
//! ```
//!
//! Confirm from the command line.
//! ```sh
//! cargo run -p tester -- "artur"
//! ```
use std::sync::Arc;

use anyhow::Result;
use axum::{Router, routing::get};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod email;
pub mod error;
pub mod page;
pub mod routes;
pub mod state;
pub mod utils;

use config::Config;
use routes::{confirm_handler, index_handler};
use state::State;

pub fn build_router(state: Arc<State>) -> Router {
    Router::new()
        .route("/", get(index_handler).post(confirm_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config).await?;

    info!("Starting server...");
    let app = build_router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
