//! Sequential Minimal Optimization (SMO) solver implementation
//!
//! This is the simplified SMO variant: every sweep visits each example, and an
//! example that violates the KKT conditions is optimized jointly with a
//! partner chosen uniformly at random. Training stops once `max_passes`
//! consecutive sweeps leave every alpha unchanged.
//!
//! The solver is driven explicitly so callers can interleave several
//! solvers (one-vs-rest training) or observe intermediate state:
//!
//! ```rust,no_run
//! use ndarray::array;
//! use rsmo::core::{KernelSpec, SolverConfig};
//! use rsmo::solver::SmoSolver;
//!
//! # fn main() -> rsmo::core::Result<()> {
//! let x = array![[0.0, 0.0], [1.0, 1.0]];
//! let labels = array![0, 1];
//! let mut solver = SmoSolver::setup(
//!     x.view(),
//!     labels.view(),
//!     &KernelSpec::linear(),
//!     &SolverConfig::default(),
//!     1,
//! )?;
//! while !solver.step() {}
//! let model = solver.generate();
//! # Ok(())
//! # }
//! ```

use crate::core::{
    uniform_source, KernelKind, KernelSpec, Label, Result, SVMError, SolverConfig, UniformSource,
};
use crate::model::TrainedModel;
use crate::solver::gram;
use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Mutable optimization state of one training run
#[derive(Debug, Clone)]
struct DualState {
    /// Lagrange multipliers, always within [0, C]
    alpha: Array1<f64>,
    /// Error cache E_i = f(x_i) - y_i for the examples last visited
    errors: Array1<f64>,
    b: f64,
    // Scratch values of the pair under update
    low: f64,
    high: f64,
    eta: f64,
    /// Consecutive sweeps without a changed pair
    no_change_streak: usize,
    sweeps: usize,
}

impl DualState {
    fn new(m: usize) -> Self {
        Self {
            alpha: Array1::zeros(m),
            errors: Array1::zeros(m),
            b: 0.0,
            low: 0.0,
            high: 0.0,
            eta: 0.0,
            no_change_streak: 0,
            sweeps: 0,
        }
    }
}

/// SMO solver for one binary (category vs rest) problem
///
/// Owns a copy of the training data, the precomputed kernel matrix and the
/// dual state from [`SmoSolver::setup`] until [`SmoSolver::generate`]
/// consumes it.
pub struct SmoSolver {
    x: Array2<f64>,
    /// Labels remapped to +1 (category) / -1 (everything else)
    y: Array1<f64>,
    gram: Array2<f64>,
    kernel: KernelSpec,
    config: SolverConfig,
    category: Label,
    state: DualState,
    source: Box<dyn UniformSource>,
}

impl SmoSolver {
    /// Prepare a training run
    ///
    /// Copies the data, remaps `labels` to ±1 by equality with `category` and
    /// precomputes the kernel matrix. Partner selection is seeded from
    /// `config.seed`, or from the clock when no seed is set.
    pub fn setup(
        x: ArrayView2<f64>,
        labels: ArrayView1<Label>,
        kernel: &KernelSpec,
        config: &SolverConfig,
        category: Label,
    ) -> Result<Self> {
        Self::setup_with_source(
            x,
            labels,
            kernel,
            config,
            category,
            uniform_source(config.seed),
        )
    }

    /// Prepare a training run drawing partners from `source`
    pub fn setup_with_source(
        x: ArrayView2<f64>,
        labels: ArrayView1<Label>,
        kernel: &KernelSpec,
        config: &SolverConfig,
        category: Label,
        source: Box<dyn UniformSource>,
    ) -> Result<Self> {
        validate(x, labels, kernel, config)?;

        let (m, n) = x.dim();
        info!(
            "Setting up SMO: {m} examples, {n} features, {} kernel, category {category}",
            kernel.kind
        );

        let gram = gram::kernel_matrix(x, kernel)?;
        let y = labels.mapv(|label| if label == category { 1.0 } else { -1.0 });

        Ok(Self {
            x: x.to_owned(),
            y,
            gram,
            kernel: kernel.clone(),
            config: config.clone(),
            category,
            state: DualState::new(m),
            source,
        })
    }

    /// Train to convergence and extract the model
    pub fn train(
        x: ArrayView2<f64>,
        labels: ArrayView1<Label>,
        kernel: &KernelSpec,
        config: &SolverConfig,
        category: Label,
    ) -> Result<TrainedModel> {
        let mut solver = Self::setup(x, labels, kernel, config, category)?;
        while !solver.step() {}
        Ok(solver.generate())
    }

    /// Run one sweep over all examples
    ///
    /// Returns `true` once `max_passes` consecutive sweeps changed nothing.
    /// After that every call returns `true` without touching the state.
    pub fn step(&mut self) -> bool {
        if self.is_converged() {
            return true;
        }

        let m = self.y.len();
        let mut changed = 0;

        for i in 0..m {
            if self.optimize_example(i) {
                changed += 1;
            }
        }

        self.state.sweeps += 1;
        if changed == 0 {
            self.state.no_change_streak += 1;
        } else {
            self.state.no_change_streak = 0;
        }

        debug!(
            "category {} sweep {}: {} pairs changed, streak {}/{}",
            self.category,
            self.state.sweeps,
            changed,
            self.state.no_change_streak,
            self.config.max_passes
        );

        self.is_converged()
    }

    /// Whether the no-change streak has reached `max_passes`
    pub fn is_converged(&self) -> bool {
        self.state.no_change_streak >= self.config.max_passes
    }

    /// Current decision-function error for example `i`
    fn error(&self, i: usize) -> f64 {
        let s = &self.state;
        let output: f64 = self
            .gram
            .column(i)
            .iter()
            .zip(s.alpha.iter())
            .zip(self.y.iter())
            .map(|((&k, &a), &y)| a * y * k)
            .sum();
        s.b + output - self.y[i]
    }

    /// Random partner index different from `i`, if one exists
    fn pick_partner(&mut self, i: usize) -> Option<usize> {
        let m = self.y.len();
        if m < 2 {
            return None;
        }

        loop {
            let j = ((m as f64 * self.source.next_uniform()).floor() as usize).min(m - 1);
            if j != i {
                return Some(j);
            }
        }
    }

    /// Try to optimize example `i` with a random partner
    ///
    /// Returns whether the pair's alphas changed. Degenerate pairs (empty
    /// feasible segment, non-negative curvature, negligible move) are skipped.
    fn optimize_example(&mut self, i: usize) -> bool {
        let c = self.config.c;
        let tol = self.config.tolerance;

        let e_i = self.error(i);
        self.state.errors[i] = e_i;

        let y_i = self.y[i];
        let r_i = y_i * e_i;
        let alpha_i = self.state.alpha[i];
        if !((r_i < -tol && alpha_i < c) || (r_i > tol && alpha_i > 0.0)) {
            return false;
        }

        let j = match self.pick_partner(i) {
            Some(j) => j,
            None => return false,
        };

        let e_j = self.error(j);
        self.state.errors[j] = e_j;

        let y_j = self.y[j];
        let alpha_i_old = self.state.alpha[i];
        let alpha_j_old = self.state.alpha[j];

        let (low, high) = if y_i == y_j {
            (
                (alpha_j_old + alpha_i_old - c).max(0.0),
                (alpha_j_old + alpha_i_old).min(c),
            )
        } else {
            (
                (alpha_j_old - alpha_i_old).max(0.0),
                (c + alpha_j_old - alpha_i_old).min(c),
            )
        };
        self.state.low = low;
        self.state.high = high;

        if (low - high).abs() <= f64::EPSILON {
            return false;
        }

        let k_ij = self.gram[[j, i]];
        let k_ii = self.gram[[i, i]];
        let k_jj = self.gram[[j, j]];
        let eta = 2.0 * k_ij - k_ii - k_jj;
        self.state.eta = eta;

        if eta >= 0.0 {
            return false;
        }

        let alpha_j = (alpha_j_old - y_j * (e_i - e_j) / eta).clamp(low, high);
        if (alpha_j - alpha_j_old).abs() < tol {
            return false;
        }

        let alpha_i = (alpha_i_old + y_i * y_j * (alpha_j_old - alpha_j)).clamp(0.0, c);
        self.state.alpha[i] = alpha_i;
        self.state.alpha[j] = alpha_j;

        let delta_i = y_i * (alpha_i - alpha_i_old);
        let delta_j = y_j * (alpha_j - alpha_j_old);
        let b = self.state.b;
        let b1 = b - e_i - delta_i * k_ij - delta_j * k_ij;
        let b2 = b - e_j - delta_i * k_ij - delta_j * k_jj;

        self.state.b = if 0.0 < alpha_i && alpha_i < c {
            b1
        } else if 0.0 < alpha_j && alpha_j < c {
            b2
        } else {
            (b1 + b2) / 2.0
        };

        true
    }

    /// Extract the trained model and release the training state
    ///
    /// Keeps every example with a non-zero alpha as a support vector. The
    /// weight vector W = Xᵀ(α∘y) is always computed but only meaningful for the
    /// linear kernel.
    pub fn generate(self) -> TrainedModel {
        let support: Vec<usize> = self
            .state
            .alpha
            .iter()
            .enumerate()
            .filter(|(_, a)| a.abs() > 0.0)
            .map(|(i, _)| i)
            .collect();

        let support_vectors = self.x.select(Axis(0), &support);
        let support_labels = self.y.select(Axis(0), &support);
        let alpha = self.state.alpha.select(Axis(0), &support);

        let weights = self.x.t().dot(&(&self.state.alpha * &self.y));

        info!(
            "Category {} trained after {} sweeps: {} support vectors, bias {:.6}",
            self.category,
            self.state.sweeps,
            support.len(),
            self.state.b
        );

        TrainedModel {
            support_vectors,
            support_labels,
            alpha,
            weights,
            bias: self.state.b,
            kernel: self.kernel,
            c: self.config.c,
            tolerance: self.config.tolerance,
            category: self.category,
            passes: self.state.no_change_streak,
            max_passes: self.config.max_passes,
            trained: true,
            normalization: None,
        }
    }

    /// Current alpha values
    pub fn alpha(&self) -> ArrayView1<f64> {
        self.state.alpha.view()
    }

    /// Error cache as of the last visit of each example
    pub fn errors(&self) -> ArrayView1<f64> {
        self.state.errors.view()
    }

    /// Labels remapped to ±1
    pub fn labels(&self) -> ArrayView1<f64> {
        self.y.view()
    }

    /// The precomputed kernel matrix
    pub fn gram(&self) -> ArrayView2<f64> {
        self.gram.view()
    }

    /// Current bias term
    pub fn bias(&self) -> f64 {
        self.state.b
    }

    /// Feasible segment [L, H] and curvature of the last pair examined
    pub fn last_pair_bounds(&self) -> (f64, f64, f64) {
        (self.state.low, self.state.high, self.state.eta)
    }

    /// Number of sweeps run so far
    pub fn sweeps(&self) -> usize {
        self.state.sweeps
    }

    /// Category this solver separates from the rest
    pub fn category(&self) -> Label {
        self.category
    }
}

fn validate(
    x: ArrayView2<f64>,
    labels: ArrayView1<Label>,
    kernel: &KernelSpec,
    config: &SolverConfig,
) -> Result<()> {
    let (m, n) = x.dim();
    if m == 0 || n == 0 {
        return Err(SVMError::EmptyDataset);
    }
    if labels.len() != m {
        return Err(SVMError::DimensionMismatch {
            expected: m,
            actual: labels.len(),
        });
    }
    if kernel.kind == KernelKind::Unknown {
        return Err(SVMError::UnknownKernel);
    }
    if !(config.c.is_finite() && config.c > 0.0) {
        return Err(SVMError::InvalidParameter(format!(
            "C must be positive, got: {}",
            config.c
        )));
    }
    if !(config.tolerance.is_finite() && config.tolerance >= 0.0) {
        return Err(SVMError::InvalidParameter(format!(
            "Tolerance must be non-negative, got: {}",
            config.tolerance
        )));
    }
    if config.max_passes == 0 {
        return Err(SVMError::InvalidParameter(
            "Max passes must be at least 1".to_string(),
        ));
    }
    Ok(())
}
