//! Model output shapes
//!
//! Tabular estimators answer a batch with one value per row, neural networks
//! with one row of outputs per input row, and some models with a bare scalar.
//! [`ModelOutput`] captures all of these so the endpoint never has to inspect
//! a value's runtime type.

use ndarray::{Array1, Array2};

use crate::error::{Result, SolarcastError};

/// Raw predictor output, scalar or arbitrarily nested sequence
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    Scalar(f64),
    Sequence(Vec<ModelOutput>),
}

impl ModelOutput {
    /// One value per input row
    pub fn flat(values: impl IntoIterator<Item = f64>) -> Self {
        Self::Sequence(values.into_iter().map(Self::Scalar).collect())
    }

    /// One row of outputs per input row
    pub fn nested(rows: impl IntoIterator<Item = Vec<f64>>) -> Self {
        Self::Sequence(rows.into_iter().map(Self::flat).collect())
    }

    /// Nesting depth; a scalar has depth 0
    pub fn depth(&self) -> usize {
        match self {
            Self::Scalar(_) => 0,
            Self::Sequence(items) => 1 + items.first().map_or(0, Self::depth),
        }
    }

    /// Extract the prediction for the first row, whatever the nesting.
    pub fn first_scalar(&self) -> Result<f64> {
        let mut current = self;
        loop {
            match current {
                Self::Scalar(v) if v.is_finite() => return Ok(*v),
                Self::Scalar(v) => return Err(SolarcastError::NonFiniteOutput(*v)),
                Self::Sequence(items) => {
                    current = items.first().ok_or(SolarcastError::EmptyOutput)?;
                }
            }
        }
    }
}

impl From<f64> for ModelOutput {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Array1<f64>> for ModelOutput {
    fn from(values: Array1<f64>) -> Self {
        Self::flat(values)
    }
}

impl From<Array2<f64>> for ModelOutput {
    fn from(values: Array2<f64>) -> Self {
        Self::nested(values.outer_iter().map(|row| row.to_vec()))
    }
}

/// Round to two decimal places.
///
/// The exact binary value is rounded, ties to even, so 2.675 (stored just
/// below) gives 2.67. Never overflows for large finite inputs.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
