//! Domain types for alder-io.

use crate::IoError;

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A rectangular table of numeric rows with a parallel header.
///
/// The last column is the class label; every other column is a feature.
/// Produced by [`DatasetReader`](crate::DatasetReader) or built directly
/// with [`Dataset::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Column names, label last.
    header: Vec<String>,
    /// Row values: `rows[row_index][column_index]`.
    rows: Vec<Vec<f64>>,
}

impl Dataset {
    /// Build a dataset, checking that every row matches the header width.
    ///
    /// Zero rows are allowed (a fully filtered dataset is still a dataset).
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::MissingLabelColumn`] | Header has fewer than 2 columns |
    /// | [`IoError::RaggedRow`] | A row's width differs from the header |
    pub fn new(header: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, IoError> {
        if header.len() < 2 {
            return Err(IoError::MissingLabelColumn {
                n_columns: header.len(),
            });
        }
        if let Some((row_index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != header.len())
        {
            return Err(IoError::RaggedRow {
                row_index,
                expected: header.len(),
                got: row.len(),
            });
        }
        Ok(Self { header, rows })
    }

    /// Construct without validation; callers guarantee the shape.
    pub(crate) fn from_parts(header: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        debug_assert!(header.len() >= 2);
        debug_assert!(rows.iter().all(|r| r.len() == header.len()));
        Self { header, rows }
    }

    /// Return every column name, label included.
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Return the feature column names (label excluded).
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.header[..self.label_index()]
    }

    /// Return the name of the label column.
    #[must_use]
    pub fn label_name(&self) -> &str {
        &self.header[self.label_index()]
    }

    /// Return all rows, label included.
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Return the number of data rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Return the number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.label_index()
    }

    /// Return the feature part of row `row_index`.
    ///
    /// # Panics
    ///
    /// Panics if `row_index >= n_rows()`.
    #[must_use]
    pub fn features_of(&self, row_index: usize) -> &[f64] {
        &self.rows[row_index][..self.label_index()]
    }

    /// Return the raw label value of row `row_index`.
    ///
    /// # Panics
    ///
    /// Panics if `row_index >= n_rows()`.
    #[must_use]
    pub fn label_of(&self, row_index: usize) -> f64 {
        self.rows[row_index][self.label_index()]
    }

    fn label_index(&self) -> usize {
        self.header.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn experiment_name_valid() {
        let name = ExperimentName::new("loans-2024_q1".to_string());
        assert!(name.is_ok());
        assert_eq!(name.unwrap().as_str(), "loans-2024_q1");
    }

    #[test]
    fn experiment_name_rejects_empty() {
        let name = ExperimentName::new(String::new());
        assert!(matches!(name, Err(IoError::InvalidExperimentName { .. })));
    }

    #[test]
    fn experiment_name_rejects_special_chars() {
        let name = ExperimentName::new("my experiment!".to_string());
        assert!(matches!(name, Err(IoError::InvalidExperimentName { .. })));
    }

    #[test]
    fn feature_names_exclude_label() {
        let ds = Dataset::new(
            names(&["income", "age", "default"]),
            vec![vec![1.0, 2.0, 0.0], vec![3.0, 4.0, 1.0]],
        )
        .unwrap();
        assert_eq!(ds.feature_names(), &["income", "age"]);
        assert_eq!(ds.label_name(), "default");
        assert_eq!(ds.n_features(), 2);
        assert_eq!(ds.features_of(1), &[3.0, 4.0]);
        assert!((ds.label_of(1) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ragged_row_rejected() {
        let err = Dataset::new(names(&["a", "y"]), vec![vec![1.0, 0.0], vec![2.0]]).unwrap_err();
        assert!(matches!(
            err,
            IoError::RaggedRow { row_index: 1, expected: 2, got: 1 }
        ));
    }

    #[test]
    fn single_column_rejected() {
        let err = Dataset::new(names(&["y"]), vec![vec![0.0]]).unwrap_err();
        assert!(matches!(err, IoError::MissingLabelColumn { n_columns: 1 }));
    }

    #[test]
    fn zero_rows_allowed() {
        let ds = Dataset::new(names(&["a", "y"]), vec![]).unwrap();
        assert_eq!(ds.n_rows(), 0);
    }
}
