//! Trained binary models
//!
//! A [`TrainedModel`] separates one category from everything else. It is
//! produced by [`crate::solver::SmoSolver::generate`] and evaluated by the
//! functions in [`predict`].

pub mod predict;

pub use self::predict::count_errors;

use crate::core::{KernelSpec, Label};
use crate::utils::scaling::Normalization;
use ndarray::{Array1, Array2};

/// Support-vector model for one category
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    /// Training rows with a non-zero alpha
    pub support_vectors: Array2<f64>,
    /// ±1 label of each support vector
    pub support_labels: Array1<f64>,
    /// Alpha of each support vector
    pub alpha: Array1<f64>,
    /// Linear weight vector W = Xᵀ(α∘y), used by the linear kernel only
    pub weights: Array1<f64>,
    pub bias: f64,
    pub kernel: KernelSpec,
    pub c: f64,
    pub tolerance: f64,
    /// Category scored positive by this model
    pub category: Label,
    pub passes: usize,
    pub max_passes: usize,
    pub trained: bool,
    /// Per-feature scaling applied to inputs before evaluation
    pub normalization: Option<Normalization>,
}

impl TrainedModel {
    /// Number of support vectors
    pub fn n_support_vectors(&self) -> usize {
        self.support_vectors.nrows()
    }

    /// Number of input features the model expects
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// Attach a normalization applied to every input before prediction
    pub fn with_normalization(mut self, normalization: Option<Normalization>) -> Self {
        self.normalization = normalization;
        self
    }
}
