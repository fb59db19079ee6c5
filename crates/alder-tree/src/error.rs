/// Errors from decision tree fitting, prediction, and scoring.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Returned when ccp_alpha is negative, NaN, or infinite.
    #[error("ccp_alpha must be a finite non-negative number, got {ccp_alpha}")]
    InvalidCcpAlpha {
        /// The invalid ccp_alpha value provided.
        ccp_alpha: f64,
    },

    /// Returned when max_depth is zero.
    #[error("max_depth must be at least 1, got {max_depth}")]
    InvalidMaxDepth {
        /// The invalid max_depth value provided.
        max_depth: usize,
    },

    /// Returned when min_samples_split is less than 2.
    #[error("min_samples_split must be at least 2, got {min_samples_split}")]
    InvalidMinSamplesSplit {
        /// The invalid min_samples_split value provided.
        min_samples_split: usize,
    },

    /// Returned when min_samples_leaf is zero.
    #[error("min_samples_leaf must be at least 1, got {min_samples_leaf}")]
    InvalidMinSamplesLeaf {
        /// The invalid min_samples_leaf value provided.
        min_samples_leaf: usize,
    },

    /// Returned when the training dataset has zero samples.
    #[error("training dataset has zero samples")]
    EmptyDataset,

    /// Returned when the training dataset has zero feature columns.
    #[error("training dataset has zero feature columns")]
    ZeroFeatures,

    /// Returned when a sample has a different number of features than expected.
    #[error("sample {sample_index} has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the sample.
        got: usize,
        /// The zero-based index of the offending sample.
        sample_index: usize,
    },

    /// Returned when the number of labels differs from the number of samples.
    #[error("got {n_labels} labels for {n_samples} samples")]
    LabelCountMismatch {
        /// Number of feature rows.
        n_samples: usize,
        /// Number of labels.
        n_labels: usize,
    },

    /// Returned when a sample has a different number of features at prediction time.
    #[error("prediction input has {got} features, expected {expected}")]
    PredictionFeatureMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the prediction input.
        got: usize,
    },

    /// Returned when a training value is NaN or infinite.
    #[error("non-finite value at sample {sample_index}, feature {feature_index}")]
    NonFiniteValue {
        /// The zero-based index of the offending sample.
        sample_index: usize,
        /// The zero-based index of the offending feature column.
        feature_index: usize,
    },

    /// Returned when a metric is asked to score an empty label vector.
    #[error("cannot score an empty label vector")]
    EmptyLabels,

    /// Returned when true and predicted label vectors differ in length.
    #[error("true labels have length {n_true}, predictions have length {n_pred}")]
    PredictionLengthMismatch {
        /// Length of the true label vector.
        n_true: usize,
        /// Length of the predicted label vector.
        n_pred: usize,
    },

    /// Returned when a class id does not fit the confusion matrix.
    #[error("class {class} is outside a {n_classes}-class confusion matrix")]
    ClassOutOfRange {
        /// The offending class id.
        class: usize,
        /// Matrix size.
        n_classes: usize,
    },
}
