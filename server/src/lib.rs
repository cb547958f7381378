//! Sachiva site backend.
//!
//! Serves the static marketing site and relays contact-form submissions as
//! transactional email.
//!
//!
//!
//! # Request Paths
//!
//! - `POST /contact`: validate the submission, compose the collaboration
//!   request email, send it through SMTP, answer with the JSON envelope.
//! - `GET /api/health`: liveness probe with an RFC 3339 timestamp.
//! - `GET /`, `GET /contact`: the page documents.
//! - Everything else: GET requests fall through to the asset cache, which
//!   serves cache-first with the site directory as origin.
//!
//!
//!
//! # Environment
//!
//! - `PORT`: listening port, default 4000.
//! - `GMAIL_USER`: mail account identity; sender and recipient of every
//!   contact email.
//! - `GMAIL_APP_PASSWORD`: app-level secret for SMTP authentication.
//! - `SITE_DIR`: root of the static documents, default `./site`.
//!
//!
//!
//! # Setup
//!
//! Run locally.
//! ```sh
//! GMAIL_USER=you@gmail.com GMAIL_APP_PASSWORD=secret cargo run -p sachiva
//! ```
//!
//! Exercise a running server.
//! ```sh
//! cargo run -p tester -- --name "John Doe" --email john@example.com --message "Hello"
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod cache;
pub mod config;
pub mod error;
pub mod mail;
pub mod routes;
pub mod state;
pub mod validate;

use routes::{asset_handler, contact_handler, contact_page_handler, health_handler, root_handler};
use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(root_handler))
        .route("/contact", get(contact_page_handler).post(contact_handler))
        .route("/api/health", get(health_handler))
        .fallback(asset_handler)
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");
    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("App is listening to PORT: {}", state.config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
