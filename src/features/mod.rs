//! Request-to-feature-vector mapping
//!
//! Turns the JSON object posted by the frontend into the fixed-order numeric
//! vector the model was trained on. The column order in [`FEATURE_ORDER`] is
//! the contract with the model artifact: reordering it silently corrupts every
//! prediction, so the loader checks it against the artifact's own list.

use ndarray::Array2;
use serde_json::{Map, Value};
use thiserror::Error;

/// How a raw JSON value is coerced before it enters the vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Any finite number
    Float,
    /// Truncated toward zero, like a month or an hour of day
    Integer,
}

/// A named input column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub kind: FeatureKind,
}

impl FeatureSpec {
    const fn float(name: &'static str) -> Self {
        Self { name, kind: FeatureKind::Float }
    }

    const fn integer(name: &'static str) -> Self {
        Self { name, kind: FeatureKind::Integer }
    }
}

/// Number of columns in every feature vector
pub const N_FEATURES: usize = 7;

/// Training-time column order
pub const FEATURE_ORDER: [FeatureSpec; N_FEATURES] = [
    FeatureSpec::float("temperature"),
    FeatureSpec::float("pressure"),
    FeatureSpec::float("humidity"),
    FeatureSpec::float("wind_direction"),
    FeatureSpec::float("wind_speed"),
    FeatureSpec::integer("month"),
    FeatureSpec::integer("hour"),
];

/// Column names in training order
pub fn feature_names() -> impl Iterator<Item = &'static str> {
    FEATURE_ORDER.iter().map(|spec| spec.name)
}

/// Request validation failures. All of them are the caller's fault.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("Invalid JSON payload.")]
    InvalidJson(String),

    #[error("Request body must be a JSON object.")]
    NotAnObject,

    #[error("Missing input data for: '{0}'.")]
    MissingField(&'static str),

    #[error("Invalid value for: '{0}'.")]
    InvalidValue(&'static str),
}

/// Fixed-order feature vector for one prediction
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector([f64; N_FEATURES]);

impl FeatureVector {
    /// Parse a raw request body. Content type is not consulted.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, FeatureError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| FeatureError::InvalidJson(e.to_string()))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, FeatureError> {
        match value {
            Value::Object(map) => Self::from_object(map),
            _ => Err(FeatureError::NotAnObject),
        }
    }

    /// Build the vector column by column. The first missing or invalid column
    /// in training order is the one reported.
    pub fn from_object(map: &Map<String, Value>) -> Result<Self, FeatureError> {
        let mut values = [0.0; N_FEATURES];
        for (slot, spec) in values.iter_mut().zip(FEATURE_ORDER.iter()) {
            let raw = map
                .get(spec.name)
                .ok_or(FeatureError::MissingField(spec.name))?;
            *slot = coerce(raw, spec.kind).ok_or(FeatureError::InvalidValue(spec.name))?;
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Single-row batch for the predictor
    pub fn to_batch(&self) -> Array2<f64> {
        Array2::from_shape_fn((1, N_FEATURES), |(_, j)| self.0[j])
    }
}

fn coerce(value: &Value, kind: FeatureKind) -> Option<f64> {
    let coerced = match (value, kind) {
        (Value::Bool(b), _) => Some(if *b { 1.0 } else { 0.0 }),
        (Value::Number(n), FeatureKind::Float) => n.as_f64(),
        (Value::Number(n), FeatureKind::Integer) => match n.as_i64() {
            Some(i) => Some(i as f64),
            None => n.as_f64().map(f64::trunc),
        },
        (Value::String(s), FeatureKind::Float) => s.trim().parse::<f64>().ok(),
        (Value::String(s), FeatureKind::Integer) => s.trim().parse::<i64>().ok().map(|i| i as f64),
        _ => None,
    };
    coerced.filter(|v| v.is_finite())
}
