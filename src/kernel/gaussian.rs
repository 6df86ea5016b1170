//! Gaussian and radial basis function kernels
//!
//! Both kernels share the width parameter σ and the denominator 2σ²:
//!
//! - Gaussian: K(x, y) = exp(-||x - y||² / (2σ²))
//! - Radial:   K(x, y) = exp(-||x - y|| / (2σ²))
//!
//! The radial kernel divides the plain Euclidean distance (not its square) by
//! the same 2σ² term. A zero width makes both kernels return 0 instead of
//! dividing by zero.

use crate::core::KernelSpec;
use crate::kernel::Kernel;
use crate::linalg;
use ndarray::ArrayView1;

/// exp(-value / (2σ²)), or 0 when σ == 0
fn decay(value: f64, sigma: f64) -> f64 {
    let denom = 2.0 * sigma * sigma;
    if denom.abs() > 0.0 {
        (-value / denom).exp()
    } else {
        0.0
    }
}

/// Gaussian kernel with parameters `[sigma = 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianKernel {
    sigma: f64,
}

impl GaussianKernel {
    /// Create a Gaussian kernel with width `sigma`
    pub fn new(sigma: f64) -> Self {
        Self { sigma }
    }

    /// Read parameters from a kernel specification
    pub fn from_spec(spec: &KernelSpec) -> Self {
        Self::new(spec.param(0, 1.0))
    }

    /// Get the sigma parameter
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Kernel value for a precomputed squared distance
    ///
    /// Used by the closed-form kernel-matrix and prediction paths, which obtain
    /// squared distances from the norm expansion.
    pub fn apply_to_squared_distance(&self, squared_distance: f64) -> f64 {
        decay(squared_distance, self.sigma)
    }
}

impl Default for GaussianKernel {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Kernel for GaussianKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        self.apply_to_squared_distance(linalg::squared_distance(x, y))
    }
}

/// Radial basis function kernel with parameters `[sigma = 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialKernel {
    sigma: f64,
}

impl RadialKernel {
    /// Create a radial kernel with width `sigma`
    pub fn new(sigma: f64) -> Self {
        Self { sigma }
    }

    /// Read parameters from a kernel specification
    pub fn from_spec(spec: &KernelSpec) -> Self {
        Self::new(spec.param(0, 1.0))
    }

    /// Get the sigma parameter
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Kernel value for a precomputed squared distance
    pub fn apply_to_squared_distance(&self, squared_distance: f64) -> f64 {
        decay(squared_distance.max(0.0).sqrt(), self.sigma)
    }
}

impl Default for RadialKernel {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Kernel for RadialKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        self.apply_to_squared_distance(linalg::squared_distance(x, y))
    }
}
