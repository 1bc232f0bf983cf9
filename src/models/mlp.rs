//! Neural Network (Multi-Layer Perceptron) regressor
//!
//! Feedforward evaluation of dense layers exported from a trained network.
//! Kernels are stored input-major (`n_in x n_out`) and the output keeps one
//! row of outputs per input row.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::{check_width, Predictor};
use crate::error::{Result, SolarcastError};
use crate::inference::ModelOutput;

/// Activation function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    /// Rectified Linear Unit
    Relu,
    /// Sigmoid
    Sigmoid,
    /// Hyperbolic tangent
    Tanh,
    /// Linear (identity)
    #[default]
    Linear,
}

impl Activation {
    fn apply(self, z: &mut Array2<f64>) {
        match self {
            Activation::Relu => z.mapv_inplace(|v| v.max(0.0)),
            Activation::Sigmoid => z.mapv_inplace(|v| 1.0 / (1.0 + (-v).exp())),
            Activation::Tanh => z.mapv_inplace(f64::tanh),
            Activation::Linear => {}
        }
    }
}

/// Wire form of a dense layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayerSpec {
    weights: Vec<Vec<f64>>,
    biases: Vec<f64>,
    #[serde(default)]
    activation: Activation,
}

/// Fully connected layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DenseLayerSpec", into = "DenseLayerSpec")]
pub struct DenseLayer {
    weights: Array2<f64>,
    biases: Array1<f64>,
    activation: Activation,
}

impl DenseLayer {
    pub fn new(weights: Array2<f64>, biases: Array1<f64>, activation: Activation) -> Result<Self> {
        if weights.ncols() != biases.len() {
            return Err(SolarcastError::ShapeError {
                expected: format!("{} biases", weights.ncols()),
                actual: format!("{} biases", biases.len()),
            });
        }
        if weights.is_empty() {
            return Err(SolarcastError::InvalidModel("dense layer has no weights".to_string()));
        }
        if weights.iter().chain(biases.iter()).any(|v| !v.is_finite()) {
            return Err(SolarcastError::InvalidModel(
                "dense layer has non-finite parameters".to_string(),
            ));
        }
        Ok(Self { weights, biases, activation })
    }

    pub fn n_inputs(&self) -> usize {
        self.weights.nrows()
    }

    pub fn n_outputs(&self) -> usize {
        self.weights.ncols()
    }

    fn forward(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut z = x.dot(&self.weights) + &self.biases;
        self.activation.apply(&mut z);
        z
    }
}

impl TryFrom<DenseLayerSpec> for DenseLayer {
    type Error = SolarcastError;

    fn try_from(spec: DenseLayerSpec) -> Result<Self> {
        let n_in = spec.weights.len();
        let n_out = spec.weights.first().map_or(0, Vec::len);
        if spec.weights.iter().any(|row| row.len() != n_out) {
            return Err(SolarcastError::ShapeError {
                expected: format!("{} weights per row", n_out),
                actual: "ragged weight matrix".to_string(),
            });
        }
        let flat: Vec<f64> = spec.weights.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((n_in, n_out), flat)?;
        DenseLayer::new(weights, Array1::from(spec.biases), spec.activation)
    }
}

impl From<DenseLayer> for DenseLayerSpec {
    fn from(layer: DenseLayer) -> Self {
        DenseLayerSpec {
            weights: layer.weights.outer_iter().map(|row| row.to_vec()).collect(),
            biases: layer.biases.to_vec(),
            activation: layer.activation,
        }
    }
}

/// Multi-Layer Perceptron Regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpRegressor {
    pub layers: Vec<DenseLayer>,
}

impl MlpRegressor {
    pub fn new(layers: Vec<DenseLayer>) -> Self {
        Self { layers }
    }
}

impl Predictor for MlpRegressor {
    fn name(&self) -> &'static str {
        "mlp_regressor"
    }

    fn n_features(&self) -> usize {
        self.layers.first().map_or(0, DenseLayer::n_inputs)
    }

    fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(SolarcastError::InvalidModel("network has no layers".to_string()));
        }
        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[0].n_outputs() != pair[1].n_inputs() {
                return Err(SolarcastError::InvalidModel(format!(
                    "layer {} emits {} values but layer {} expects {}",
                    i,
                    pair[0].n_outputs(),
                    i + 1,
                    pair[1].n_inputs()
                )));
            }
        }
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<ModelOutput> {
        check_width(x, self.n_features())?;
        let mut activations = x.to_owned();
        for layer in &self.layers {
            if activations.ncols() != layer.n_inputs() {
                return Err(SolarcastError::ShapeError {
                    expected: format!("{} columns", layer.n_inputs()),
                    actual: format!("{} columns", activations.ncols()),
                });
            }
            activations = layer.forward(&activations);
        }
        Ok(activations.into())
    }
}
