//! Kernel functions for SVM
//!
//! Six kernel families are available, selected by [`KernelKind`]:
//!
//! | kind       | K(x, y)                               | params (defaults)         |
//! |------------|---------------------------------------|---------------------------|
//! | linear     | m·xᵀy + b                             | `[m = 1, b = 0]`          |
//! | polynomial | (xᵀy + b)^a                           | `[b = 0, a = 1]`          |
//! | gaussian   | exp(-‖x-y‖² / 2σ²)                    | `[σ = 1]`                 |
//! | radial     | exp(-‖x-y‖ / 2σ²)                     | `[σ = 1]`                 |
//! | sigmoid    | tanh(m·xᵀy / n + b)                   | `[m = 1, b = 0]`          |
//! | fourier    | Π sin(m+½)·dᵢ / sin(dᵢ/2)             | `[m = 1]`                 |

pub mod fourier;
pub mod gaussian;
pub mod linear;
pub mod polynomial;
pub mod sigmoid;
pub mod traits;

pub use self::fourier::*;
pub use self::gaussian::*;
pub use self::linear::*;
pub use self::polynomial::*;
pub use self::sigmoid::*;
pub use self::traits::*;

use crate::core::{KernelKind, KernelSpec, Result, SVMError};
use ndarray::ArrayView1;

/// Build the kernel function described by `spec`
pub fn build(spec: &KernelSpec) -> Result<Box<dyn Kernel>> {
    let kernel: Box<dyn Kernel> = match spec.kind {
        KernelKind::Linear => Box::new(LinearKernel::from_spec(spec)),
        KernelKind::Polynomial => Box::new(PolynomialKernel::from_spec(spec)),
        KernelKind::Gaussian => Box::new(GaussianKernel::from_spec(spec)),
        KernelKind::Radial => Box::new(RadialKernel::from_spec(spec)),
        KernelKind::Sigmoid => Box::new(SigmoidKernel::from_spec(spec)),
        KernelKind::Fourier => Box::new(FourierKernel::from_spec(spec)),
        KernelKind::Unknown => return Err(SVMError::UnknownKernel),
    };
    Ok(kernel)
}

/// Evaluate the kernel described by `spec` on two feature vectors
pub fn evaluate(spec: &KernelSpec, x1: ArrayView1<f64>, x2: ArrayView1<f64>) -> Result<f64> {
    if x1.len() != x2.len() {
        return Err(SVMError::DimensionMismatch {
            expected: x1.len(),
            actual: x2.len(),
        });
    }

    Ok(build(spec)?.compute(x1, x2))
}
