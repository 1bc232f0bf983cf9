//! Solarcast - solar output prediction service
//!
//! Loads a pre-trained regression model once at startup and serves one
//! synchronous prediction per HTTP request.
//!
//! # Modules
//!
//! - [`features`] - request payload to fixed-order feature vector
//! - [`models`] - regression model families and the [`models::Predictor`] trait
//! - [`inference`] - startup loading and the single-row prediction path
//! - [`server`] - HTTP server
//! - [`cli`] - command-line interface

// Core error handling
pub mod error;

// Prediction pipeline
pub mod features;
pub mod models;
pub mod inference;

// Services
pub mod server;
pub mod cli;

pub use error::{SolarcastError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{SolarcastError, Result};
    pub use crate::features::{FeatureError, FeatureVector, FEATURE_ORDER, N_FEATURES};
    pub use crate::inference::{load_model, InferenceEngine, ModelOutput, ModelStatus};
    pub use crate::models::{ModelArtifact, Predictor, TrainedModel};
    pub use crate::server::{create_router, AppState, ServerConfig};
}
