//! Model serialization and persistence
//!
//! Trained models are stored as JSON. Arrays are converted to nested vectors
//! here so the rest of the crate only deals with `ndarray` types.

use crate::api::MultiClassModel;
use crate::core::{KernelSpec, Label, Result, SVMError};
use crate::model::TrainedModel;
use crate::utils::scaling::Normalization;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Serializable representation of a set of trained models
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    /// One binary model per category
    pub models: Vec<SerializableModel>,
    /// Feature scaling shared by all models
    #[serde(default)]
    pub normalization: Option<SerializableNormalization>,
    /// Model metadata
    pub metadata: ModelMetadata,
}

/// Serializable binary model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableModel {
    /// Support vectors, one row per vector
    pub support_vectors: Vec<Vec<f64>>,
    /// ±1 label of each support vector
    pub support_labels: Vec<f64>,
    pub kernel: KernelSpec,
    pub alpha: Vec<f64>,
    /// Linear weight vector
    pub weights: Vec<f64>,
    pub bias: f64,
    pub c: f64,
    pub tolerance: f64,
    pub category: Label,
    pub passes: usize,
    pub max_passes: usize,
    pub trained: bool,
}

/// Per-feature bounds used for min/max scaling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableNormalization {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

/// Model metadata for tracking and validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Creation timestamp
    pub created_at: String,
}

impl ModelMetadata {
    fn now() -> Self {
        Self {
            library_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl From<&TrainedModel> for SerializableModel {
    fn from(model: &TrainedModel) -> Self {
        Self {
            support_vectors: model
                .support_vectors
                .rows()
                .into_iter()
                .map(|row| row.to_vec())
                .collect(),
            support_labels: model.support_labels.to_vec(),
            kernel: model.kernel.clone(),
            alpha: model.alpha.to_vec(),
            weights: model.weights.to_vec(),
            bias: model.bias,
            c: model.c,
            tolerance: model.tolerance,
            category: model.category,
            passes: model.passes,
            max_passes: model.max_passes,
            trained: model.trained,
        }
    }
}

impl TryFrom<&SerializableModel> for TrainedModel {
    type Error = SVMError;

    fn try_from(s: &SerializableModel) -> Result<Self> {
        let n = s.weights.len();
        let count = s.support_vectors.len();

        if s.support_labels.len() != count || s.alpha.len() != count {
            return Err(SVMError::SerializationError(format!(
                "Category {}: {count} support vectors but {} labels and {} alphas",
                s.category,
                s.support_labels.len(),
                s.alpha.len()
            )));
        }
        if let Some(row) = s.support_vectors.iter().find(|row| row.len() != n) {
            return Err(SVMError::DimensionMismatch {
                expected: n,
                actual: row.len(),
            });
        }

        let flat: Vec<f64> = s.support_vectors.iter().flatten().copied().collect();
        let support_vectors = Array2::from_shape_vec((count, n), flat)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;

        Ok(TrainedModel {
            support_vectors,
            support_labels: Array1::from(s.support_labels.clone()),
            alpha: Array1::from(s.alpha.clone()),
            weights: Array1::from(s.weights.clone()),
            bias: s.bias,
            kernel: s.kernel.clone(),
            c: s.c,
            tolerance: s.tolerance,
            category: s.category,
            passes: s.passes,
            max_passes: s.max_passes,
            trained: s.trained,
            normalization: None,
        })
    }
}

impl From<&Normalization> for SerializableNormalization {
    fn from(normalization: &Normalization) -> Self {
        Self {
            min: normalization.min.to_vec(),
            max: normalization.max.to_vec(),
        }
    }
}

impl TryFrom<&SerializableNormalization> for Normalization {
    type Error = SVMError;

    fn try_from(s: &SerializableNormalization) -> Result<Self> {
        Normalization::new(Array1::from(s.min.clone()), Array1::from(s.max.clone()))
    }
}

impl ModelFile {
    /// Create a serializable model file from trained models
    pub fn from_models(model: &MultiClassModel) -> Self {
        Self {
            models: model.models().iter().map(SerializableModel::from).collect(),
            normalization: model.normalization().map(SerializableNormalization::from),
            metadata: ModelMetadata::now(),
        }
    }

    /// Convert back to trained models
    pub fn to_models(&self) -> Result<MultiClassModel> {
        let models = self
            .models
            .iter()
            .map(TrainedModel::try_from)
            .collect::<Result<Vec<_>>>()?;
        let normalization = self
            .normalization
            .as_ref()
            .map(Normalization::try_from)
            .transpose()?;
        Ok(MultiClassModel::new(models, normalization))
    }

    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(SVMError::IoError)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        writer.flush().map_err(SVMError::IoError)
    }

    /// Load model from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| SVMError::SerializationError(e.to_string()))
    }

    /// Print model summary
    pub fn print_summary(&self) {
        println!("=== SVM Model Summary ===");
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
        println!("Models: {}", self.models.len());
        println!(
            "Normalization: {}",
            if self.normalization.is_some() { "min/max" } else { "none" }
        );
        for model in &self.models {
            println!("--- Category {} ---", model.category);
            println!("  Kernel: {} {:?}", model.kernel.kind, model.kernel.params);
            println!("  Features: {}", model.weights.len());
            println!("  Support Vectors: {}", model.support_vectors.len());
            println!("  Bias: {:.6}", model.bias);
            println!("  C: {}", model.c);
            println!("  Tolerance: {}", model.tolerance);
            println!("  Passes: {}/{}", model.passes, model.max_passes);
            println!("  Trained: {}", model.trained);
        }
    }
}
