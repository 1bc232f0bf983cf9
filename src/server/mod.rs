//! Solarcast Server Module
//!
//! Web server exposing the prediction endpoint, the index page and its
//! static assets.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::{ServerError, MODEL_UNAVAILABLE_MESSAGE, PREDICTION_FAILED_MESSAGE};
pub use state::AppState;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub static_dir: Option<String>,
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            model_path: std::env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("model.json")),
            static_dir: Some(Self::resolve_static_dir()),
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|o| !o.is_empty()),
        }
    }
}

impl ServerConfig {
    /// Resolve the static directory by checking multiple candidate paths.
    fn resolve_static_dir() -> String {
        if let Ok(dir) = std::env::var("STATIC_DIR") {
            if std::path::Path::new(&dir).exists() {
                return dir;
            }
        }

        let candidates = [
            "web/static".to_string(),
            format!("{}/web/static", env!("CARGO_MANIFEST_DIR")),
        ];

        for candidate in &candidates {
            if std::path::Path::new(candidate).exists() {
                return candidate.clone();
            }
        }

        "web/static".to_string()
    }
}

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();
    info!(
        model_path = %config.model_path.display(),
        started_at = %start_time.to_rfc3339(),
        "Loading model artifact"
    );

    // Load happens before bind so no request ever sees a half-initialized state
    let state = Arc::new(AppState::new(config.clone()));
    if !state.model.is_ready() {
        warn!("Serving without a model; every /predict call will fail with 500");
    }

    if let Some(ref static_dir) = config.static_dir {
        if !std::path::Path::new(static_dir).exists() {
            warn!(static_dir = %static_dir, "Static directory not found, frontend assets will be unavailable");
        }
    }

    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening and ready to accept connections");
    info!(url = %format!("http://{}", addr), "Web UI available");
    info!(url = %format!("http://{}/predict", addr), "Prediction endpoint available");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl+c; shutdown only on process kill");
            std::future::pending::<()>().await;
        }
        let stop_time = chrono::Utc::now();
        let uptime = stop_time.signed_duration_since(start_time);
        info!(
            stopped_at = %stop_time.to_rfc3339(),
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
