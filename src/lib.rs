//! Support Vector Machine training with a simplified SMO solver
//!
//! Binary and one-vs-rest multiclass classifiers over dense feature
//! matrices, with six kernel families, min/max feature scaling and JSON model
//! files.

pub mod api;
pub mod core;
pub mod data;
pub mod kernel;
pub mod linalg;
pub mod model;
pub mod persistence;
pub mod solver;
pub mod utils;

// Re-export main types for convenience
pub use crate::api::{EvaluationMetrics, ModelInfo, MultiClassModel, SVM};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{Result, SVMError};
pub use crate::data::{Delimiter, LabeledDataset};
pub use crate::kernel::Kernel;
pub use crate::model::TrainedModel;
pub use crate::persistence::ModelFile;
pub use crate::solver::SmoSolver;
pub use crate::utils::scaling::Normalization;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
