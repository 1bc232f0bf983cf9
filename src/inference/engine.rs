//! Inference engine implementation
//!
//! Holds the predictor produced at startup and runs the single-row prediction
//! path shared by the HTTP endpoint and the CLI.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::{round2, ModelLoadError};
use crate::error::{Result, SolarcastError};
use crate::features::{feature_names, FeatureVector, N_FEATURES};
use crate::models::Predictor;

/// Model metadata exposed by the health endpoint and `info` command
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub family: &'static str,
    pub n_features: usize,
    pub feature_names: Vec<&'static str>,
    pub source: Option<String>,
    pub loaded_at: String,
}

/// Read-only predictor shared across requests
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    predictor: Arc<dyn Predictor>,
    source: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
}

impl InferenceEngine {
    /// Wrap a predictor after checking it accepts the feature vector.
    pub fn new(predictor: Arc<dyn Predictor>) -> std::result::Result<Self, ModelLoadError> {
        predictor.validate().map_err(ModelLoadError::Invalid)?;
        if predictor.n_features() != N_FEATURES {
            return Err(ModelLoadError::WidthMismatch {
                expected: N_FEATURES,
                actual: predictor.n_features(),
            });
        }
        Ok(Self {
            predictor,
            source: None,
            loaded_at: Utc::now(),
        })
    }

    pub(crate) fn with_source(mut self, path: &Path) -> Self {
        self.source = Some(path.to_path_buf());
        self
    }

    pub fn predictor(&self) -> &dyn Predictor {
        self.predictor.as_ref()
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            family: self.predictor.name(),
            n_features: self.predictor.n_features(),
            feature_names: feature_names().collect(),
            source: self.source.as_ref().map(|path| path.display().to_string()),
            loaded_at: self.loaded_at.to_rfc3339(),
        }
    }

    /// Predict for one feature vector (batch size 1), rounded to 2 decimals.
    pub fn predict_one(&self, features: &FeatureVector) -> Result<f64> {
        let start = Instant::now();
        let output = self.predictor.predict(&features.to_batch())?;
        let value = output.first_scalar()?;
        debug!(
            family = self.predictor.name(),
            output_depth = output.depth(),
            raw = value,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Inference complete"
        );
        let rounded = round2(value);
        if !rounded.is_finite() {
            return Err(SolarcastError::NonFiniteOutput(rounded));
        }
        Ok(rounded)
    }
}
