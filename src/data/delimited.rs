//! Delimited text dataset implementation
//!
//! Supports tab- or comma-separated numeric files where:
//! - Every non-empty line is one example
//! - Training files carry the integer category label in the last column
//! - Prediction files carry only features; the feature count is given by the
//!   caller

use crate::core::{Label, Result, SVMError};
use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayView1};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Column separator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Tab,
    Comma,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Tab => '\t',
            Delimiter::Comma => ',',
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Tab => f.write_str("tab"),
            Delimiter::Comma => f.write_str("comma"),
        }
    }
}

impl FromStr for Delimiter {
    type Err = SVMError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tab" | "\\t" => Ok(Delimiter::Tab),
            "comma" | "," => Ok(Delimiter::Comma),
            other => Err(SVMError::InvalidParameter(format!(
                "Unknown delimiter: {other}"
            ))),
        }
    }
}

/// Feature matrix with one category label per row
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    pub features: Array2<f64>,
    pub labels: Array1<Label>,
}

impl LabeledDataset {
    /// Load a labeled dataset from a file
    pub fn from_file<P: AsRef<Path>>(path: P, delimiter: Delimiter) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader, delimiter)
    }

    /// Load a labeled dataset from a reader
    ///
    /// All rows must have the same number of columns, at least two.
    pub fn from_reader<R: BufRead>(reader: R, delimiter: Delimiter) -> Result<Self> {
        let mut values = Vec::new();
        let mut labels = Vec::new();
        let mut width = None;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(SVMError::IoError)?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            let mut row = parse_line(line, delimiter, line_no + 1)?;
            let columns = row.len();
            match width {
                None if columns < 2 => {
                    return Err(SVMError::InvalidDataset(format!(
                        "Line {}: expected features and a label, got {columns} column(s)",
                        line_no + 1
                    )));
                }
                None => width = Some(columns),
                Some(w) if w != columns => {
                    return Err(SVMError::InvalidDataset(format!(
                        "Line {}: expected {w} columns, got {columns}",
                        line_no + 1
                    )));
                }
                Some(_) => {}
            }

            let label = row.pop().unwrap_or_default();
            labels.push(parse_label(label, line_no + 1)?);
            values.extend(row);
        }

        let n = match width {
            Some(w) => w - 1,
            None => return Err(SVMError::EmptyDataset),
        };
        let m = labels.len();
        let features = Array2::from_shape_vec((m, n), values)
            .map_err(|e| SVMError::InvalidDataset(e.to_string()))?;

        debug!("Loaded {m} labeled examples with {n} features");

        Ok(Self {
            features,
            labels: Array1::from(labels),
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.features.ncols()
    }

    /// Number of categories, the largest label present
    pub fn categories(&self) -> usize {
        crate::utils::validation::category_count(self.labels.view())
    }
}

/// Load an unlabeled feature matrix with exactly `features` columns
///
/// Rows with fewer values are skipped with a warning; extra trailing values
/// are ignored.
pub fn load_unlabeled<P: AsRef<Path>>(
    path: P,
    delimiter: Delimiter,
    features: usize,
) -> Result<Array2<f64>> {
    let file = File::open(path).map_err(SVMError::IoError)?;
    read_unlabeled(BufReader::new(file), delimiter, features)
}

/// Reader counterpart of [`load_unlabeled`]
pub fn read_unlabeled<R: BufRead>(
    reader: R,
    delimiter: Delimiter,
    features: usize,
) -> Result<Array2<f64>> {
    if features == 0 {
        return Err(SVMError::InvalidParameter(
            "Feature count must be at least 1".to_string(),
        ));
    }

    let mut values = Vec::new();
    let mut rows = 0;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(SVMError::IoError)?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let row = parse_line(line, delimiter, line_no + 1)?;
        if row.len() < features {
            warn!(
                "Line {}: {} value(s), expected {features}; skipping",
                line_no + 1,
                row.len()
            );
            continue;
        }

        values.extend_from_slice(&row[..features]);
        rows += 1;
    }

    if rows == 0 {
        return Err(SVMError::EmptyDataset);
    }

    Array2::from_shape_vec((rows, features), values)
        .map_err(|e| SVMError::InvalidDataset(e.to_string()))
}

/// Write one label per line
pub fn write_classification<P: AsRef<Path>>(path: P, labels: ArrayView1<Label>) -> Result<()> {
    let file = File::create(path).map_err(SVMError::IoError)?;
    let mut writer = BufWriter::new(file);
    write_labels(&mut writer, labels)?;
    writer.flush().map_err(SVMError::IoError)
}

/// Writer counterpart of [`write_classification`]
pub fn write_labels<W: Write>(writer: &mut W, labels: ArrayView1<Label>) -> Result<()> {
    for label in labels.iter() {
        writeln!(writer, "{label}").map_err(SVMError::IoError)?;
    }
    Ok(())
}

fn parse_line(line: &str, delimiter: Delimiter, line_no: usize) -> Result<Vec<f64>> {
    let sep = delimiter.as_char();
    // A trailing separator does not start another column
    line.trim_end_matches(|c: char| c == sep || c.is_whitespace())
        .split(sep)
        .enumerate()
        .map(|(col, token)| {
            token.trim().parse::<f64>().map_err(|_| {
                SVMError::ParseError(format!(
                    "Line {line_no}, column {}: invalid number '{}'",
                    col + 1,
                    token.trim()
                ))
            })
        })
        .collect()
}

fn parse_label(value: f64, line_no: usize) -> Result<Label> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Ok(value as Label)
    } else {
        Err(SVMError::ParseError(format!(
            "Line {line_no}: label must be a non-negative integer, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Cursor;

    #[test]
    fn test_labeled_tab() {
        let data = "1.0\t2.0\t1\n3.0\t4.0\t0\n\n5.0\t6.0\t2\n";
        let dataset = LabeledDataset::from_reader(Cursor::new(data), Delimiter::Tab).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.dim(), 2);
        assert_eq!(dataset.features, array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        assert_eq!(dataset.labels, array![1, 0, 2]);
        assert_eq!(dataset.categories(), 2);
    }

    #[test]
    fn test_labeled_comma_with_crlf() {
        let data = "0.5, -1.5, 3\r\n2.0,1.0,1\r\n";
        let dataset = LabeledDataset::from_reader(Cursor::new(data), Delimiter::Comma).unwrap();

        assert_eq!(dataset.features, array![[0.5, -1.5], [2.0, 1.0]]);
        assert_eq!(dataset.labels, array![3, 1]);
    }

    #[test]
    fn test_trailing_delimiter_ignored() {
        let data = "1.0\t2.0\t1\t\n";
        let dataset = LabeledDataset::from_reader(Cursor::new(data), Delimiter::Tab).unwrap();
        assert_eq!(dataset.features, array![[1.0, 2.0]]);
        assert_eq!(dataset.labels, array![1]);
    }

    #[test]
    fn test_labeled_integral_float_label() {
        let data = "1.0,2.0\n";
        let dataset = LabeledDataset::from_reader(Cursor::new(data), Delimiter::Comma).unwrap();
        assert_eq!(dataset.labels, array![2]);
    }

    #[test]
    fn test_labeled_errors() {
        // Invalid number
        let result = LabeledDataset::from_reader(Cursor::new("1.0,abc,1\n"), Delimiter::Comma);
        assert!(matches!(result, Err(SVMError::ParseError(_))));

        // Ragged rows
        let result =
            LabeledDataset::from_reader(Cursor::new("1.0,2.0,1\n1.0,1\n"), Delimiter::Comma);
        assert!(matches!(result, Err(SVMError::InvalidDataset(_))));

        // Label column only
        let result = LabeledDataset::from_reader(Cursor::new("1\n"), Delimiter::Comma);
        assert!(matches!(result, Err(SVMError::InvalidDataset(_))));

        // Negative label
        let result = LabeledDataset::from_reader(Cursor::new("1.0,-1\n"), Delimiter::Comma);
        assert!(matches!(result, Err(SVMError::ParseError(_))));

        // Nothing but blank lines
        let result = LabeledDataset::from_reader(Cursor::new("\n\n"), Delimiter::Tab);
        assert!(matches!(result, Err(SVMError::EmptyDataset)));
    }

    #[test]
    fn test_wrong_delimiter_is_parse_error() {
        let result = LabeledDataset::from_reader(Cursor::new("1.0,2.0,1\n"), Delimiter::Tab);
        assert!(matches!(result, Err(SVMError::ParseError(_))));
    }

    #[test]
    fn test_unlabeled_skips_short_rows() {
        let data = "1.0,2.0,9.0\n3.0\n4.0,5.0\n";
        let x = read_unlabeled(Cursor::new(data), Delimiter::Comma, 2).unwrap();
        assert_eq!(x, array![[1.0, 2.0], [4.0, 5.0]]);
    }

    #[test]
    fn test_unlabeled_errors() {
        assert!(matches!(
            read_unlabeled(Cursor::new("1.0\n"), Delimiter::Comma, 2),
            Err(SVMError::EmptyDataset)
        ));
        assert!(matches!(
            read_unlabeled(Cursor::new("1.0\n"), Delimiter::Comma, 0),
            Err(SVMError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_write_labels() {
        let mut out = Vec::new();
        write_labels(&mut out, array![1, 0, 3].view()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\n0\n3\n");
    }

    #[test]
    fn test_delimiter_parsing() {
        assert_eq!("tab".parse::<Delimiter>().unwrap(), Delimiter::Tab);
        assert_eq!("Comma".parse::<Delimiter>().unwrap(), Delimiter::Comma);
        assert_eq!(",".parse::<Delimiter>().unwrap(), Delimiter::Comma);
        assert!("pipe".parse::<Delimiter>().is_err());
        assert_eq!(Delimiter::default().to_string(), "tab");
    }
}
