//! Ordinary least squares regression, evaluated from fitted parameters

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::{check_width, Predictor};
use crate::error::{Result, SolarcastError};
use crate::inference::ModelOutput;

/// Linear regression model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Fitted coefficients (weights), one per input column
    pub coefficients: Vec<f64>,
    /// Fitted intercept (bias)
    #[serde(default)]
    pub intercept: f64,
}

impl LinearRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self { coefficients, intercept }
    }
}

impl Predictor for LinearRegression {
    fn name(&self) -> &'static str {
        "linear_regression"
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(SolarcastError::InvalidModel(
                "linear regression has no coefficients".to_string(),
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(SolarcastError::InvalidModel(
                "linear regression has non-finite parameters".to_string(),
            ));
        }
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<ModelOutput> {
        check_width(x, self.n_features())?;
        let weights = ArrayView1::from(&self.coefficients[..]);
        let predictions = x.dot(&weights) + self.intercept;
        Ok(predictions.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_predict_batch() {
        let model = LinearRegression::new(vec![2.0, -1.0], 1.0);
        let out = model.predict(&array![[1.0, 1.0], [3.0, 0.0]]).unwrap();
        assert_eq!(out, ModelOutput::flat(vec![2.0, 7.0]));
    }

    #[test]
    fn test_width_mismatch() {
        let model = LinearRegression::new(vec![1.0, 1.0, 1.0], 0.0);
        assert!(model.predict(&array![[1.0, 1.0]]).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(LinearRegression::new(vec![1.0], 0.0).validate().is_ok());
        assert!(LinearRegression::new(vec![], 0.0).validate().is_err());
        assert!(LinearRegression::new(vec![f64::NAN], 0.0).validate().is_err());
    }

    #[test]
    fn test_intercept_defaults_to_zero() {
        let model: LinearRegression = serde_json::from_str(r#"{"coefficients": [1.5]}"#).unwrap();
        assert_eq!(model.intercept, 0.0);
    }
}
