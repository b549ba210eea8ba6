//! Documentation of the event feedback service.
//!
//! Attendees leave a short comment about an event plus an emoji rating. Each comment is scored with VADER,
//! bucketed into positive/neutral/negative and stored. Admins pull the rollup from a single stats endpoint.
//!
//!
//!
//! # Endpoints
//!
//! | Method | Path | Body | Success | Failure |
//! |---|---|---|---|---|
//! | GET | `/` | | banner | |
//! | POST | `/api/submit-feedback` | `{feedback, event, emoji}` | 200 `{message, id}` | 400, 500 |
//! | POST | `/api/admin/login` | `{email, password}` | 200 `{success, message}` | 401 |
//! | GET | `/api/admin/stats` | | 200 `{total_feedbacks, sentiment_stats, emoji_stats, feedbacks}` | 500 |
//!
//! Only `/api/*` carries the CORS layer, limited to one origin.
//!
//!
//!
//! # Submission Flow
//!
//! - Body parsed into an explicit schema, every field optional
//! - Presence check over `feedback`, `event`, `emoji`, missing keys listed back to the caller
//! - Emoji domain check, only once all keys are present
//! - VADER scores the text, the compound score picks the category
//! - Record stamped with the current UTC time and written once
//!
//! Records are never updated or deleted through the API.
//!
//!
//!
//! # Errors
//!
//! - 400 for malformed bodies and validation failures
//! - 401 for any failed login, same body whichever field was wrong
//! - 500 with a generic message for store failures, the detail only goes to the logs
//!
//! Nothing is retried. A failed request is final and the caller resubmits.
//!
//!
//!
//! # Setup
//!
//! | Variable | Default |
//! |---|---|
//! | `RUST_PORT` | `5000` |
//! | `REDIS_URL` | `redis://localhost:6379/` |
//! | `CORS_ORIGIN` | `http://localhost:3000` |
//! | `ADMIN_EMAIL` | `admin@localhost` |
//! | `ADMIN_PASSWORD_HASH` | none, read from `/run/secrets` or the environment |
//! | `ADMIN_PASSWORD` | none, hashed at startup when no hash is given |
//!
//! Generate a hash for the admin password.
//! ```sh
//! cargo run --bin hash_password -- 'my password'
//! ```
//!
//! Run with logs.
//! ```sh
//! RUST_LOG=info cargo run --bin feedback_server
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod feedback;
pub mod routes;
pub mod sentiment;
pub mod state;
pub mod stats;
pub mod utils;

use config::Config;
use routes::{admin_login_handler, home_handler, stats_handler, submit_feedback_handler};
use state::State;

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    let api = Router::new()
        .route("/submit-feedback", post(submit_feedback_handler))
        .route("/admin/login", post(admin_login_handler))
        .route("/admin/stats", get(stats_handler))
        .layer(cors);

    Router::new()
        .route("/", get(home_handler))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config).await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    let app = app(state);
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
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
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
