//! Decision tree regressor
//!
//! Trees are stored as parallel node arrays, the layout scikit-learn exposes
//! through `tree_`. Node 0 is the root and a node's children always have a
//! larger index than the node itself, so the artifact nests no deeper than
//! one array however deep the tree grows.

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::{check_width, Predictor};
use crate::error::{Result, SolarcastError};
use crate::inference::ModelOutput;

/// Child index marking a leaf
pub const TREE_LEAF: i64 = -1;
/// Feature index stored on leaves
pub const TREE_UNDEFINED: i64 = -2;

/// Binary regression tree in flat array form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl Tree {
    /// Single-node tree
    pub fn leaf(value: f64) -> Self {
        Self {
            children_left: vec![TREE_LEAF],
            children_right: vec![TREE_LEAF],
            feature: vec![TREE_UNDEFINED],
            threshold: vec![-2.0],
            value: vec![value],
        }
    }

    /// New root where samples with `x[feature] <= threshold` go to `left`.
    pub fn split(feature: usize, threshold: f64, left: Tree, right: Tree) -> Self {
        let mut tree = Self {
            children_left: vec![1],
            children_right: vec![1 + left.n_nodes() as i64],
            feature: vec![feature as i64],
            threshold: vec![threshold],
            value: vec![0.0],
        };
        tree.append(left);
        tree.append(right);
        tree
    }

    fn append(&mut self, subtree: Tree) {
        let offset = self.n_nodes() as i64;
        let shift = |child: i64| if child == TREE_LEAF { child } else { child + offset };
        self.children_left.extend(subtree.children_left.into_iter().map(shift));
        self.children_right.extend(subtree.children_right.into_iter().map(shift));
        self.feature.extend(subtree.feature);
        self.threshold.extend(subtree.threshold);
        self.value.extend(subtree.value);
    }

    pub fn n_nodes(&self) -> usize {
        self.value.len()
    }

    fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] == TREE_LEAF
    }

    /// Walk from the root to a leaf. The tree must already be checked.
    pub(crate) fn evaluate(&self, sample: ArrayView1<f64>) -> f64 {
        let mut node = 0;
        while !self.is_leaf(node) {
            node = if sample[self.feature[node] as usize] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        self.value[node]
    }

    pub(crate) fn check(&self, n_features: usize) -> Result<()> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(SolarcastError::InvalidModel("tree has no nodes".to_string()));
        }
        if [
            self.children_left.len(),
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
        ]
        .iter()
        .any(|&len| len != n_nodes)
        {
            return Err(SolarcastError::InvalidModel(format!(
                "tree node arrays differ in length (expected {} nodes)",
                n_nodes
            )));
        }

        for node in 0..n_nodes {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF || right == TREE_LEAF {
                if left != right {
                    return Err(SolarcastError::InvalidModel(format!(
                        "tree node {} has only one child",
                        node
                    )));
                }
                if !self.value[node].is_finite() {
                    return Err(SolarcastError::InvalidModel(
                        "tree leaf holds a non-finite value".to_string(),
                    ));
                }
                continue;
            }

            // Children after their parent rule out cycles
            for child in [left, right] {
                if child <= node as i64 || child >= n_nodes as i64 {
                    return Err(SolarcastError::InvalidModel(format!(
                        "tree node {} points at invalid child {}",
                        node, child
                    )));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(SolarcastError::InvalidModel(format!(
                    "tree splits on feature {} but the model has {} features",
                    feature, n_features
                )));
            }
            if self.threshold[node].is_nan() {
                return Err(SolarcastError::InvalidModel(
                    "tree split threshold is NaN".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Longest root-to-leaf path, in edges. The tree must already be checked.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.n_nodes()];
        for node in 0..self.n_nodes() {
            if !self.is_leaf(node) {
                let child_depth = depths[node] + 1;
                depths[self.children_left[node] as usize] = child_depth;
                depths[self.children_right[node] as usize] = child_depth;
            }
        }
        depths.into_iter().max().unwrap_or(0)
    }
}

/// Decision tree model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    /// Number of features
    pub n_features: usize,
    pub tree: Tree,
}

impl DecisionTreeRegressor {
    pub fn new(n_features: usize, tree: Tree) -> Self {
        Self { n_features, tree }
    }

    pub(crate) fn predict_rows(&self, x: &Array2<f64>) -> Array1<f64> {
        x.outer_iter().map(|row| self.tree.evaluate(row)).collect()
    }
}

impl Predictor for DecisionTreeRegressor {
    fn name(&self) -> &'static str {
        "decision_tree_regressor"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn validate(&self) -> Result<()> {
        if self.n_features == 0 {
            return Err(SolarcastError::InvalidModel(
                "decision tree declares zero features".to_string(),
            ));
        }
        self.tree.check(self.n_features)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<ModelOutput> {
        check_width(x, self.n_features)?;
        Ok(self.predict_rows(x).into())
    }
}
