//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::SolarcastError;
use crate::features::FeatureError;

pub const MODEL_UNAVAILABLE_MESSAGE: &str =
    "The machine learning model is not available. Please check server logs.";
pub const PREDICTION_FAILED_MESSAGE: &str =
    "An internal server error occurred during prediction.";

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(#[from] FeatureError),

    #[error("Model not loaded")]
    ModelUnavailable,

    #[error("Prediction failed: {0}")]
    Prediction(#[from] SolarcastError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(e) => {
                tracing::warn!(detail = ?e, "Rejected prediction request");
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ServerError::ModelUnavailable => {
                tracing::error!("Prediction failed because the model is not loaded");
                (StatusCode::INTERNAL_SERVER_ERROR, MODEL_UNAVAILABLE_MESSAGE.to_string())
            }
            ServerError::Prediction(e) => {
                tracing::error!(detail = %e, "Prediction error");
                (StatusCode::INTERNAL_SERVER_ERROR, PREDICTION_FAILED_MESSAGE.to_string())
            }
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServerError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed. Use POST /predict for predictions.".to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
