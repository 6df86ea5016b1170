//! Kernel (Gram) matrix construction
//!
//! The full m×m matrix is precomputed once per training run. Linear,
//! Gaussian and radial kernels use vectorized closed forms; the remaining
//! families fall back to evaluating the kernel on every pair of the upper
//! triangle. Every path leaves the result exactly symmetric.

use crate::core::{KernelKind, KernelSpec, Result, SVMError};
use crate::kernel::{self, GaussianKernel, LinearKernel, RadialKernel};
use crate::linalg;
use log::debug;
use ndarray::{Array2, ArrayView2};

/// Compute K[i][j] = K(x_i, x_j) over the rows of `x`
pub fn kernel_matrix(x: ArrayView2<f64>, spec: &KernelSpec) -> Result<Array2<f64>> {
    let mut k = match spec.kind {
        KernelKind::Linear => {
            let linear = LinearKernel::from_spec(spec);
            let mut k = x.dot(&x.t());
            k.mapv_inplace(|d| linear.apply_to_dot(d));
            k
        }
        KernelKind::Gaussian => {
            let gaussian = GaussianKernel::from_spec(spec);
            linalg::pairwise_squared_distances(x, x)
                .mapv(|d| gaussian.apply_to_squared_distance(d))
        }
        KernelKind::Radial => {
            let radial = RadialKernel::from_spec(spec);
            linalg::pairwise_squared_distances(x, x).mapv(|d| radial.apply_to_squared_distance(d))
        }
        KernelKind::Unknown => return Err(SVMError::UnknownKernel),
        _ => {
            debug!("Evaluating {} kernel pairwise", spec.kind);
            let kernel = kernel::build(spec)?;
            let m = x.nrows();
            let mut k = Array2::zeros((m, m));
            for i in 0..m {
                for j in i..m {
                    k[[i, j]] = kernel.compute(x.row(i), x.row(j));
                }
            }
            k
        }
    };

    linalg::mirror_upper(&mut k);
    Ok(k)
}
