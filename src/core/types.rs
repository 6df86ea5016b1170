//! Core type definitions for SVM

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category identifier carried by input labels.
///
/// `0` marks background (negative) examples; positive values name a category.
pub type Label = usize;

/// Kernel family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelKind {
    Linear,
    Polynomial,
    Gaussian,
    Radial,
    Sigmoid,
    Fourier,
    /// Any kind this library does not recognize (e.g. from a foreign model file)
    #[serde(other)]
    Unknown,
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KernelKind::Linear => "linear",
            KernelKind::Polynomial => "polynomial",
            KernelKind::Gaussian => "gaussian",
            KernelKind::Radial => "radial",
            KernelKind::Sigmoid => "sigmoid",
            KernelKind::Fourier => "fourier",
            KernelKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Kernel family plus its positional parameters
///
/// Missing trailing parameters fall back to per-family defaults, see
/// [`crate::kernel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelSpec {
    pub kind: KernelKind,
    #[serde(default)]
    pub params: Vec<f64>,
}

impl KernelSpec {
    /// Create a kernel specification
    pub fn new(kind: KernelKind, params: Vec<f64>) -> Self {
        Self { kind, params }
    }

    /// Linear kernel with default slope and intercept
    pub fn linear() -> Self {
        Self::new(KernelKind::Linear, Vec::new())
    }

    /// Gaussian kernel with the given width
    pub fn gaussian(sigma: f64) -> Self {
        Self::new(KernelKind::Gaussian, vec![sigma])
    }

    /// Positional parameter `index`, or `default` when the list is too short
    pub fn param(&self, index: usize, default: f64) -> f64 {
        self.params.get(index).copied().unwrap_or(default)
    }
}

impl Default for KernelSpec {
    fn default() -> Self {
        Self::linear()
    }
}

/// Configuration for the SMO solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Regularization parameter (upper bound for alpha)
    pub c: f64,
    /// Slack for the KKT test and for judging an alpha move significant
    pub tolerance: f64,
    /// Consecutive sweeps without any change before the solver stops
    pub max_passes: usize,
    /// Seed for partner selection; `None` seeds from the wall clock
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            tolerance: 0.001,
            max_passes: 5,
            seed: None,
        }
    }
}
