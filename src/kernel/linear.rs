//! Linear kernel implementation

use crate::core::KernelSpec;
use crate::kernel::Kernel;
use crate::linalg;
use ndarray::ArrayView1;

/// Linear kernel: K(x, y) = slope * x^T y + intercept
///
/// Parameters are `[slope = 1, intercept = 0]`, so the default is the plain
/// dot product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearKernel {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearKernel {
    /// Create a new linear kernel
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Read parameters from a kernel specification
    pub fn from_spec(spec: &KernelSpec) -> Self {
        Self::new(spec.param(0, 1.0), spec.param(1, 0.0))
    }

    /// Map a raw dot product to the kernel value
    pub fn apply_to_dot(&self, dot: f64) -> f64 {
        dot * self.slope + self.intercept
    }
}

impl Default for LinearKernel {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl Kernel for LinearKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        self.apply_to_dot(linalg::dot(x, y))
    }
}
