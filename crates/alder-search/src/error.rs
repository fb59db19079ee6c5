use alder_tree::TreeError;

/// Errors from pruning-strength search and feature extraction.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Wraps a tree fit or prediction failure.
    #[error("tree fit failed: {0}")]
    Tree(#[from] TreeError),

    /// Returned when the sweep step is zero, negative, or not finite.
    #[error("alpha step must be positive and finite, got {step}")]
    InvalidAlphaStep {
        /// The rejected step.
        step: f64,
    },

    /// Returned when the sweep ceiling is negative or not finite.
    #[error("max alpha must be non-negative and finite, got {max_alpha}")]
    InvalidMaxAlpha {
        /// The rejected ceiling.
        max_alpha: f64,
    },

    /// Returned when the accuracy tolerance is negative or not finite.
    #[error("accuracy tolerance must be non-negative and finite, got {tolerance}")]
    InvalidTolerance {
        /// The rejected tolerance.
        tolerance: f64,
    },

    /// Returned when the batch size is zero.
    #[error("batch size must be at least 1")]
    InvalidBatchSize,

    /// Returned when a search needs more fits than its budget allows.
    #[error("fit budget of {budget} exhausted before the search finished")]
    FitBudgetExhausted {
        /// The configured budget.
        budget: usize,
    },

    /// Returned when the number of feature names differs from the matrix width.
    #[error("{n_names} feature names supplied for {n_features} feature columns")]
    FeatureNameCountMismatch {
        /// Names supplied.
        n_names: usize,
        /// Columns in the feature matrix.
        n_features: usize,
    },

    /// Returned when a feature subset holds no columns.
    #[error("feature subset must not be empty")]
    EmptyFeatureSubset,

    /// Returned when a feature subset references a column past the matrix width.
    #[error("feature index {index} out of bounds for {n_features} features")]
    FeatureIndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Number of available features.
        n_features: usize,
    },

    /// Returned when a feature subset lists the same column twice.
    #[error("feature index {index} listed more than once")]
    DuplicateFeatureIndex {
        /// The repeated index.
        index: usize,
    },

    /// Returned when a row is too short to project onto a subset.
    #[error("row {row_index} has {width} values, projection needs at least {required}")]
    RowTooShort {
        /// Zero-based row index.
        row_index: usize,
        /// Row width.
        width: usize,
        /// Minimum width the subset needs.
        required: usize,
    },
}
