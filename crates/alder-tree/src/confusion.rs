//! Accuracy, recall, and the confusion matrix behind them.

use std::fmt;

use crate::error::TreeError;

/// Class treated as positive by [`recall`].
pub const POSITIVE_CLASS: usize = 1;

fn check_lengths(true_labels: &[usize], predicted: &[usize]) -> Result<(), TreeError> {
    if true_labels.len() != predicted.len() {
        return Err(TreeError::PredictionLengthMismatch {
            n_true: true_labels.len(),
            n_pred: predicted.len(),
        });
    }
    if true_labels.is_empty() {
        return Err(TreeError::EmptyLabels);
    }
    Ok(())
}

/// Fraction of predictions equal to the true label, in `[0, 1]`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`TreeError::PredictionLengthMismatch`] | Slices differ in length |
/// | [`TreeError::EmptyLabels`] | Zero labels provided |
pub fn accuracy(true_labels: &[usize], predicted: &[usize]) -> Result<f64, TreeError> {
    check_lengths(true_labels, predicted)?;
    let correct = true_labels
        .iter()
        .zip(predicted)
        .filter(|&(&t, &p)| t == p)
        .count();
    Ok(correct as f64 / true_labels.len() as f64)
}

/// Recall of [`POSITIVE_CLASS`]: TP / (TP + FN).
///
/// Returns 0.0 when no true label is positive instead of failing.
///
/// # Errors
///
/// Same as [`accuracy`].
pub fn recall(true_labels: &[usize], predicted: &[usize]) -> Result<f64, TreeError> {
    recall_of(true_labels, predicted, POSITIVE_CLASS)
}

/// Recall of `positive`, for label encodings where the positive class is
/// not `1`. Returns 0.0 when `positive` never occurs in `true_labels`.
///
/// # Errors
///
/// Same as [`accuracy`].
pub fn recall_of(
    true_labels: &[usize],
    predicted: &[usize],
    positive: usize,
) -> Result<f64, TreeError> {
    check_lengths(true_labels, predicted)?;
    let mut tp = 0usize;
    let mut support = 0usize;
    for (&t, &p) in true_labels.iter().zip(predicted) {
        if t == positive {
            support += 1;
            if p == positive {
                tp += 1;
            }
        }
    }
    if support == 0 {
        return Ok(0.0);
    }
    Ok(tp as f64 / support as f64)
}

/// A confusion matrix for classification.
///
/// Entry `matrix[true_class][predicted_class]` counts how many samples
/// with true label `true_class` were predicted as `predicted_class`.
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    matrix: Vec<Vec<usize>>,
    n_classes: usize,
}

/// Per-class precision, recall, and F1 score.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ClassMetrics {
    /// The class index.
    pub class: usize,
    /// Precision: TP / (TP + FP). 0.0 if no predictions for this class.
    pub precision: f64,
    /// Recall: TP / (TP + FN). 0.0 if no true samples for this class.
    pub recall: f64,
    /// F1: 2 * precision * recall / (precision + recall). 0.0 if both are zero.
    pub f1: f64,
    /// Number of true samples in this class.
    pub support: usize,
}

impl ConfusionMatrix {
    /// Build an `n_classes x n_classes` matrix from dense class ids.
    ///
    /// Classes absent from both slices still get a row and a column.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::PredictionLengthMismatch`] | Slices differ in length |
    /// | [`TreeError::EmptyLabels`] | Zero labels provided |
    /// | [`TreeError::ClassOutOfRange`] | A label is `>= n_classes` |
    pub fn from_labels(
        true_labels: &[usize],
        predicted: &[usize],
        n_classes: usize,
    ) -> Result<Self, TreeError> {
        check_lengths(true_labels, predicted)?;
        if let Some(&class) = true_labels.iter().chain(predicted).find(|&&c| c >= n_classes) {
            return Err(TreeError::ClassOutOfRange { class, n_classes });
        }
        let mut matrix = vec![vec![0usize; n_classes]; n_classes];
        for (&t, &p) in true_labels.iter().zip(predicted) {
            matrix[t][p] += 1;
        }
        Ok(Self { matrix, n_classes })
    }

    /// Overall accuracy: proportion of correct predictions.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let correct: usize = (0..self.n_classes).map(|i| self.matrix[i][i]).sum();
        let total: usize = self.matrix.iter().flat_map(|row| row.iter()).sum();
        if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        }
    }

    /// Per-class precision, recall, F1, and support.
    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics> {
        (0..self.n_classes)
            .map(|c| {
                let tp = self.matrix[c][c];
                let fp: usize = (0..self.n_classes)
                    .filter(|&i| i != c)
                    .map(|i| self.matrix[i][c])
                    .sum();
                let fn_: usize = (0..self.n_classes)
                    .filter(|&j| j != c)
                    .map(|j| self.matrix[c][j])
                    .sum();
                let support = tp + fn_;
                let precision = if tp + fp == 0 {
                    0.0
                } else {
                    tp as f64 / (tp + fp) as f64
                };
                let recall = if support == 0 {
                    0.0
                } else {
                    tp as f64 / support as f64
                };
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    class: c,
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect()
    }

    /// Return the underlying matrix rows.
    #[must_use]
    pub fn as_rows(&self) -> &[Vec<usize>] {
        &self.matrix
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>8}", "")?;
        for j in 0..self.n_classes {
            write!(f, " pred_{j:>3}")?;
        }
        writeln!(f)?;

        for (i, row) in self.matrix.iter().enumerate() {
            write!(f, "true_{i:>3}")?;
            for val in row {
                write!(f, " {val:>7}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
