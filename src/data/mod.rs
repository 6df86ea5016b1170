//! Data loading and writing
//!
//! Datasets are plain delimited text: one example per line, tab or comma
//! separated, with the category label in the last column of training files.

pub mod delimited;

pub use self::delimited::*;
