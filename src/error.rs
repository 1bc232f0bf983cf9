//! Error types for the solarcast prediction service

use thiserror::Error;

/// Result type alias for solarcast operations
pub type Result<T> = std::result::Result<T, SolarcastError>;

/// Errors raised while evaluating a model or shaping its output
#[derive(Error, Debug)]
pub enum SolarcastError {
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model output is empty")]
    EmptyOutput,

    #[error("Model output is not a finite number: {0}")]
    NonFiniteOutput(f64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for SolarcastError {
    fn from(err: serde_json::Error) -> Self {
        SolarcastError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for SolarcastError {
    fn from(err: ndarray::ShapeError) -> Self {
        SolarcastError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SolarcastError::InferenceError("bad input".to_string());
        assert_eq!(err.to_string(), "Inference error: bad input");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SolarcastError = io_err.into();
        assert!(matches!(err, SolarcastError::IoError(_)));
    }

    #[test]
    fn test_shape_error_display() {
        let err = SolarcastError::ShapeError {
            expected: "7 columns".to_string(),
            actual: "3 columns".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid shape: expected 7 columns, got 3 columns");
    }
}
