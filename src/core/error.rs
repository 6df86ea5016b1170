//! Error types for training, prediction and model files

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SVMError {
    /// C, tolerance or max passes out of range
    #[error("Invalid solver parameter: {0}")]
    InvalidParameter(String),

    /// Prediction requested from a model whose `trained` flag is unset
    #[error("Model has not been trained")]
    ModelNotTrained,

    #[error("Malformed dataset: {0}")]
    InvalidDataset(String),

    /// Feature count or label count disagrees with what was expected
    #[error("Dimension mismatch: expected {expected} columns or rows, found {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Dataset has no examples or no features")]
    EmptyDataset,

    #[error("Kernel kind is not recognised")]
    UnknownKernel,

    #[error("I/O failure: {0}")]
    IoError(#[from] std::io::Error),

    /// Unparseable number or label in a delimited file
    #[error("Cannot parse input: {0}")]
    ParseError(String),

    #[error("Model file error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, SVMError>;
