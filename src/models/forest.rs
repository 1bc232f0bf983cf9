//! Random forest regressor: mean of independent decision trees

use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::tree::Tree;
use super::{check_width, Predictor};
use crate::error::{Result, SolarcastError};
use crate::inference::ModelOutput;

/// Random Forest model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    /// Number of features
    pub n_features: usize,
    /// Member trees
    pub trees: Vec<Tree>,
}

impl RandomForestRegressor {
    pub fn new(n_features: usize, trees: Vec<Tree>) -> Self {
        Self { n_features, trees }
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }
}

impl Predictor for RandomForestRegressor {
    fn name(&self) -> &'static str {
        "random_forest_regressor"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(SolarcastError::InvalidModel("random forest has no trees".to_string()));
        }
        if self.n_features == 0 {
            return Err(SolarcastError::InvalidModel(
                "random forest declares zero features".to_string(),
            ));
        }
        self.trees.iter().try_for_each(|tree| tree.check(self.n_features))
    }

    fn predict(&self, x: &Array2<f64>) -> Result<ModelOutput> {
        check_width(x, self.n_features)?;
        if self.trees.is_empty() {
            return Err(SolarcastError::InferenceError("random forest has no trees".to_string()));
        }

        // Sum per-row predictions across trees
        let totals = self
            .trees
            .par_iter()
            .map(|tree| x.outer_iter().map(|row| tree.evaluate(row)).collect::<Array1<f64>>())
            .reduce(|| Array1::zeros(x.nrows()), |acc, preds| acc + preds);

        let predictions = totals / self.trees.len() as f64;
        Ok(predictions.into())
    }
}
