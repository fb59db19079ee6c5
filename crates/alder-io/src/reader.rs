//! CSV dataset reader with input validation.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::IoError;
use crate::domain::Dataset;

/// Reads a labeled numeric table from a delimited text file.
///
/// Expected format:
/// - Header row required; the last column is the class label
/// - `feature1,feature2,...,featureN,label`
/// - Every cell must parse as a finite `f64`
///
/// A file that does not exist is not an error: [`DatasetReader::read`]
/// logs a warning and returns `Ok(None)`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileOpen`] | File exists but cannot be opened |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::NoFeatureColumns`] | Header has fewer than 2 columns |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
pub struct DatasetReader {
    path: PathBuf,
    delimiter: u8,
}

impl DatasetReader {
    /// Create a new comma-delimited reader for the given file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            delimiter: b',',
        }
    }

    /// Set the field delimiter byte.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read and validate the file.
    ///
    /// Returns `Ok(None)` when the path is not an existing regular file.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Option<Dataset>, IoError> {
        if !self.path.is_file() {
            warn!(path = %self.path.display(), "data file not found, skipping");
            return Ok(None);
        }

        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileOpen {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so that ragged rows surface as InconsistentRowLength
        // rather than a generic CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .delimiter(self.delimiter)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?;
        let expected_cols = header.len();
        debug!(expected_cols, "read CSV header");

        if expected_cols < 2 {
            return Err(IoError::NoFeatureColumns {
                path: self.path.clone(),
                n_columns: expected_cols,
            });
        }
        let header: Vec<String> = header.iter().map(String::from).collect();

        let mut rows = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            let mut row = Vec::with_capacity(expected_cols);
            for (col_index, raw) in record.iter().enumerate() {
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        col_index,
                        raw: raw.to_string(),
                    })?;
                row.push(value);
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_rows = rows.len(),
            n_columns = expected_cols,
            "dataset loaded"
        );

        Ok(Some(Dataset::from_parts(header, rows)))
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn read_valid_dataset() {
        let csv = "income,age,default\n100.0,35,0\n250.5,41,1\n80.0,23,0\n";
        let f = write_csv(csv);
        let ds = DatasetReader::new(f.path()).read().unwrap().unwrap();
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.feature_names(), &["income", "age"]);
        assert_eq!(ds.label_name(), "default");
        assert!((ds.rows()[1][0] - 250.5).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_file_is_absent_not_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nope.csv");
        let result = DatasetReader::new(&path).read().unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn directory_is_absent_not_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = DatasetReader::new(dir.path()).read().unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn semicolon_delimiter() {
        let csv = "a;b;y\n1;2;0\n3;4;1\n";
        let f = write_csv(csv);
        let ds = DatasetReader::new(f.path())
            .with_delimiter(b';')
            .read()
            .unwrap()
            .unwrap();
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.feature_names(), &["a", "b"]);
    }

    #[test]
    fn whitespace_around_cells_is_trimmed() {
        let csv = "a, y\n 1.5 , 0\n";
        let f = write_csv(csv);
        let ds = DatasetReader::new(f.path()).read().unwrap().unwrap();
        assert_eq!(ds.label_name(), "y");
        assert!((ds.rows()[0][0] - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_dataset_error() {
        let f = write_csv("a,b,y\n");
        let err = DatasetReader::new(f.path()).read().unwrap_err();
        assert!(matches!(err, IoError::EmptyDataset { .. }));
    }

    #[test]
    fn no_feature_columns_error() {
        let f = write_csv("y\n0\n1\n");
        let err = DatasetReader::new(f.path()).read().unwrap_err();
        assert!(matches!(err, IoError::NoFeatureColumns { n_columns: 1, .. }));
    }

    #[test]
    fn inconsistent_row_length_error() {
        let f = write_csv("a,b,y\n1,2,0\n3,1\n");
        let err = DatasetReader::new(f.path()).read().unwrap_err();
        assert!(matches!(
            err,
            IoError::InconsistentRowLength { row_index: 1, expected: 3, got: 2, .. }
        ));
    }

    #[test]
    fn non_finite_value_error() {
        let f = write_csv("a,y\nNaN,0\n");
        let err = DatasetReader::new(f.path()).read().unwrap_err();
        assert!(matches!(err, IoError::NonFiniteValue { col_index: 0, .. }));
    }

    #[test]
    fn unparseable_value_error() {
        let f = write_csv("a,y\n1.0,yes\n");
        let err = DatasetReader::new(f.path()).read().unwrap_err();
        assert!(matches!(
            err,
            IoError::NonFiniteValue { row_index: 0, col_index: 1, .. }
        ));
    }
}
