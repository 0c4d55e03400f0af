//! Liveness endpoint for uptime monitors.
//!
//! Spawned as a background task in the gateway, same pattern as the
//! scheduler loops.

use axum::{routing::get, Router};
use daykeeper_core::config::ApiConfig;
use tracing::{error, info};

async fn alive() -> &'static str {
    "OK"
}

fn build_router() -> Router {
    Router::new().route("/", get(alive))
}

/// Start the HTTP server. Called from `Gateway::run()`.
pub async fn serve(config: ApiConfig) {
    let addr = format!("{}:{}", config.host, config.port);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("API server failed to bind to {addr}: {e}");
            return;
        }
    };

    info!("API server listening on {addr}");

    if let Err(e) = axum::serve(listener, build_router()).await {
        error!("API server error: {e}");
    }
}
