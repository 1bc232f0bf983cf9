//! Application state management

use crate::inference::{InferenceEngine, ModelStatus};

use super::error::{Result, ServerError};
use super::ServerConfig;

/// Application state shared across handlers. Built once before the listener
/// binds and never mutated, so handlers read it without locking.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub model: ModelStatus,
}

impl AppState {
    /// Load the model named by the config and freeze the outcome.
    pub fn new(config: ServerConfig) -> Self {
        let model = ModelStatus::load(&config.model_path);
        Self { config, model }
    }

    /// Use an already loaded (or failed) model instead of reading from disk.
    pub fn with_model(config: ServerConfig, model: ModelStatus) -> Self {
        Self { config, model }
    }

    pub fn engine(&self) -> Result<&InferenceEngine> {
        self.model.engine().ok_or(ServerError::ModelUnavailable)
    }
}
