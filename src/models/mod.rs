//! Regression model families that can back the prediction endpoint
//!
//! A model artifact is a JSON document naming one family and carrying its
//! fitted parameters:
//!
//! ```json
//! {
//!   "feature_names": ["temperature", "pressure", "humidity", "wind_direction",
//!                     "wind_speed", "month", "hour"],
//!   "model": { "kind": "linear_regression", "coefficients": [...], "intercept": 0.0 }
//! }
//! ```
//!
//! Tabular families answer with one value per row; the MLP answers with one
//! row of outputs per input row.

mod forest;
mod linear;
mod mlp;
mod tree;

pub use forest::RandomForestRegressor;
pub use linear::LinearRegression;
pub use mlp::{Activation, DenseLayer, MlpRegressor};
pub use tree::{DecisionTreeRegressor, Tree};

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::error::{Result, SolarcastError};
use crate::inference::ModelOutput;

/// In-memory object exposing a single inference operation
pub trait Predictor: Send + Sync + Debug {
    /// Short family name used in logs and the health endpoint
    fn name(&self) -> &'static str;

    /// Number of input columns the model expects
    fn n_features(&self) -> usize;

    /// Check internal consistency of the fitted parameters
    fn validate(&self) -> Result<()>;

    /// Run inference on a batch of rows
    fn predict(&self, x: &Array2<f64>) -> Result<ModelOutput>;
}

/// Fitted model of one of the supported families
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrainedModel {
    LinearRegression(LinearRegression),
    DecisionTreeRegressor(DecisionTreeRegressor),
    RandomForestRegressor(RandomForestRegressor),
    MlpRegressor(MlpRegressor),
}

impl TrainedModel {
    fn as_predictor(&self) -> &dyn Predictor {
        match self {
            TrainedModel::LinearRegression(m) => m,
            TrainedModel::DecisionTreeRegressor(m) => m,
            TrainedModel::RandomForestRegressor(m) => m,
            TrainedModel::MlpRegressor(m) => m,
        }
    }
}

impl Predictor for TrainedModel {
    fn name(&self) -> &'static str {
        self.as_predictor().name()
    }

    fn n_features(&self) -> usize {
        self.as_predictor().n_features()
    }

    fn validate(&self) -> Result<()> {
        self.as_predictor().validate()
    }

    fn predict(&self, x: &Array2<f64>) -> Result<ModelOutput> {
        self.as_predictor().predict(x)
    }
}

/// Serialized model file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Column order used at training time, when the exporter recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub model: TrainedModel,
}

impl ModelArtifact {
    pub fn new(model: TrainedModel) -> Self {
        Self { feature_names: None, model }
    }

    pub fn with_feature_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save the artifact to a file
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Reject batches whose width does not match the model
pub(crate) fn check_width(x: &Array2<f64>, expected: usize) -> Result<()> {
    if x.ncols() != expected {
        return Err(SolarcastError::ShapeError {
            expected: format!("{} columns", expected),
            actual: format!("{} columns", x.ncols()),
        });
    }
    Ok(())
}
