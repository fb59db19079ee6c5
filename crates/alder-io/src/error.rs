//! I/O error types for alder-io.

use std::path::PathBuf;

/// Errors from file I/O, CSV parsing, dataset shaping, and report serialization.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when an existing input file cannot be opened.
    #[error("cannot open {path}")]
    FileOpen {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the CSV file contains a header but zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when the header has no column besides the label.
    #[error("no feature columns in {path}: header has {n_columns} column(s)")]
    NoFeatureColumns {
        /// Path to the CSV file.
        path: PathBuf,
        /// Number of header columns.
        n_columns: usize,
    },

    /// Returned when a data row has a different number of columns than the header.
    #[error("inconsistent row length in {path}: row {row_index} has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Expected number of columns (from header).
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when a cell value is NaN, Inf, or otherwise not a finite float.
    #[error("non-finite value in {path}: row {row_index}, column {col_index}, raw value \"{raw}\"")]
    NonFiniteValue {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Zero-based column index.
        col_index: usize,
        /// The raw string value that failed to parse.
        raw: String,
    },

    /// Returned by [`Dataset::new`](crate::Dataset::new) when the header is
    /// too short to hold a feature and a label.
    #[error("dataset needs at least 2 columns (features + label), got {n_columns}")]
    MissingLabelColumn {
        /// Number of header columns.
        n_columns: usize,
    },

    /// Returned by [`Dataset::new`](crate::Dataset::new) when a row's width
    /// differs from the header.
    #[error("row {row_index} has {got} values, header has {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row_index: usize,
        /// Header width.
        expected: usize,
        /// Row width.
        got: usize,
    },

    /// Returned when the test fraction is outside the open interval (0, 1).
    #[error("test fraction must be in (0, 1), got {fraction}")]
    InvalidTestFraction {
        /// The rejected fraction.
        fraction: f64,
    },

    /// Returned when a label cell is negative or has a fractional part.
    #[error("label in row {row_index} must be a non-negative integer, got {value}")]
    NonIntegralLabel {
        /// Zero-based row index.
        row_index: usize,
        /// The offending label value.
        value: f64,
    },

    /// Returned when there are too few rows to form both partitions.
    #[error("need at least {required} rows to split, got {n_rows}")]
    TooFewRows {
        /// Rows available.
        n_rows: usize,
        /// Rows required.
        required: usize,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the report cannot be serialized to JSON.
    #[error("cannot serialize report for {path}")]
    Serialize {
        /// Destination path of the report.
        path: PathBuf,
        /// Underlying serde_json error.
        source: serde_json::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
