//! API route definitions

use std::sync::Arc;
use axum::{
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::{error::ServerError, handlers, state::AppState, ServerConfig};

async fn handle_405() -> impl IntoResponse {
    ServerError::MethodNotAllowed
}

/// Create the main application router
pub fn create_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::serve_index))
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health_check))
        .fallback(handlers::fallback)
        .method_not_allowed_fallback(handle_405)
        .with_state(state);

    // Serve static files if directory exists
    if let Some(ref static_dir) = config.static_dir {
        let static_path = std::path::Path::new(static_dir);
        if static_path.exists() {
            app = app.nest_service("/static", ServeDir::new(static_path));
        }
    }

    // CORS configured via CORS_ORIGIN (default: allow all)
    let cors = match config.cors_origin.as_deref() {
        Some(origin) if origin != "*" => match origin.parse::<axum::http::HeaderValue>() {
            Ok(value) => CorsLayer::new()
                .allow_origin(value)
                .allow_methods(Any)
                .allow_headers(Any),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            }
        },
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    app.layer(CatchPanicLayer::custom(handlers::handle_panic))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
