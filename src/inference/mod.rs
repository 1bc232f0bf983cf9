//! Inference module
//!
//! - [`loader`]: one-shot startup load of the model artifact into a [`ModelStatus`]
//! - [`InferenceEngine`]: the loaded predictor plus the single-row prediction path
//! - [`ModelOutput`]: tagged union over the output shapes model families produce

mod engine;
pub mod loader;
mod output;

pub use engine::{InferenceEngine, ModelSummary};
pub use loader::{load_model, ModelLoadError, ModelStatus};
pub use output::{round2, ModelOutput};
