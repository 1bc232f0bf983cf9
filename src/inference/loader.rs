//! Startup model loading
//!
//! The artifact is read exactly once. The outcome is frozen into a
//! [`ModelStatus`] that lives in the shared application state; a failed load
//! leaves the service running with predictions disabled.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use super::InferenceEngine;
use crate::error::SolarcastError;
use crate::features::feature_names;
use crate::models::{ModelArtifact, Predictor};

#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("model artifact not found at {0}")]
    NotFound(PathBuf),

    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("model artifact is invalid: {0}")]
    Invalid(#[source] SolarcastError),

    #[error("model expects {actual} features but requests carry {expected}")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("model was trained on features {actual:?} but requests are ordered {expected:?}")]
    FeatureOrderMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

/// Outcome of the startup load, immutable afterwards
#[derive(Debug)]
pub enum ModelStatus {
    Ready(InferenceEngine),
    Unavailable(ModelLoadError),
}

impl ModelStatus {
    /// Load from `path`, logging the outcome.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match load_model(path) {
            Ok(engine) => {
                info!(
                    path = %path.display(),
                    family = engine.predictor().name(),
                    n_features = engine.predictor().n_features(),
                    "Model loaded successfully"
                );
                ModelStatus::Ready(engine)
            }
            Err(err @ ModelLoadError::NotFound(_)) => {
                error!(
                    path = %path.display(),
                    "Model artifact not found; /predict will answer 500 until the service restarts with a model in place"
                );
                ModelStatus::Unavailable(err)
            }
            Err(err) => {
                error!(path = %path.display(), error = %err, "Unexpected error while loading the model");
                ModelStatus::Unavailable(err)
            }
        }
    }

    pub fn engine(&self) -> Option<&InferenceEngine> {
        match self {
            ModelStatus::Ready(engine) => Some(engine),
            ModelStatus::Unavailable(_) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelStatus::Ready(_))
    }
}

impl From<std::result::Result<InferenceEngine, ModelLoadError>> for ModelStatus {
    fn from(result: std::result::Result<InferenceEngine, ModelLoadError>) -> Self {
        match result {
            Ok(engine) => ModelStatus::Ready(engine),
            Err(err) => ModelStatus::Unavailable(err),
        }
    }
}

/// Deserialize and validate the artifact at `path`.
pub fn load_model(path: impl AsRef<Path>) -> std::result::Result<InferenceEngine, ModelLoadError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ModelLoadError::NotFound(path.to_path_buf())
        } else {
            ModelLoadError::Io { path: path.to_path_buf(), source }
        }
    })?;

    let artifact: ModelArtifact = serde_json::from_str(&json).map_err(|e| ModelLoadError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if let Some(names) = &artifact.feature_names {
        let expected: Vec<String> = feature_names().map(str::to_string).collect();
        if *names != expected {
            return Err(ModelLoadError::FeatureOrderMismatch {
                expected,
                actual: names.clone(),
            });
        }
    }

    let engine = InferenceEngine::new(Arc::new(artifact.model))?;
    Ok(engine.with_source(path))
}
