//! HTTP request handlers

use std::any::Any;
use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use crate::features::FeatureVector;

use super::error::{Result, ServerError, PREDICTION_FAILED_MESSAGE};
use super::state::AppState;

// ============================================================================
// Prediction Handlers
// ============================================================================

/// Predict solar output for one set of weather readings.
///
/// The body is read as raw bytes so that an unavailable model is reported
/// before any parsing, and so that JSON is accepted whatever the declared
/// content type.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<serde_json::Value>> {
    info!(body_bytes = body.len(), "Received a request on the /predict endpoint");
    let engine = state.engine()?;

    let features = FeatureVector::from_json_bytes(&body)?;
    info!(features = ?features.as_slice(), "Features prepared for model");

    let prediction = engine.predict_one(&features)?;
    info!(prediction, "Prediction successful");

    Ok(Json(serde_json::json!({ "prediction": prediction })))
}

/// Panic hook for the catch-panic layer: a crashing predictor becomes a 500.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(detail = %detail, "Handler panicked during prediction");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": PREDICTION_FAILED_MESSAGE })),
    )
        .into_response()
}

// ============================================================================
// System Handlers
// ============================================================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model_loaded": state.model.is_ready(),
        "model": state.model.engine().map(|engine| engine.summary()),
    }))
}

// ============================================================================
// UI Handlers
// ============================================================================

pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Any unrouted GET renders the frontend; everything else is a JSON 404.
pub async fn fallback(method: Method) -> Response {
    if method == Method::GET || method == Method::HEAD {
        return serve_index().await.into_response();
    }
    ServerError::NotFound(
        "Not found. Visit / for the web UI or POST /predict for predictions.".to_string(),
    )
    .into_response()
}

const INDEX_HTML: &str = include_str!("../../web/templates/index.html");
