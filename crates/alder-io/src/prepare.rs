//! Dataset preparation: sentinel filtering and per-feature dispersion.

use tracing::{debug, instrument};

use crate::domain::Dataset;

/// Cell value that marks a missing observation.
pub const MISSING_SENTINEL: f64 = -99.0;

fn is_missing(value: f64) -> bool {
    value == MISSING_SENTINEL
}

/// Return a copy of `dataset` without any row that holds [`MISSING_SENTINEL`]
/// in any column, label included.
///
/// Surviving rows keep their relative order. The input is not modified.
#[must_use]
#[instrument(skip_all, fields(n_rows = dataset.n_rows()))]
pub fn filter(dataset: &Dataset) -> Dataset {
    let rows: Vec<Vec<f64>> = dataset
        .rows()
        .iter()
        .filter(|row| !row.iter().copied().any(is_missing))
        .cloned()
        .collect();
    debug!(kept = rows.len(), dropped = dataset.n_rows() - rows.len(), "filtered sentinel rows");
    Dataset::from_parts(dataset.header().to_vec(), rows)
}

/// Coefficient of variation of every feature column after [`filter`].
///
/// Each value is the population standard deviation divided by the mean.
/// A column whose mean is exactly zero yields `f64::INFINITY`; when no row
/// survives filtering every column yields `NaN`. The label column is
/// excluded, so the result has one entry per feature name.
#[must_use]
pub fn dispersion(dataset: &Dataset) -> Vec<f64> {
    let filtered = filter(dataset);
    let n_features = filtered.n_features();
    let n = filtered.n_rows();
    if n == 0 {
        return vec![f64::NAN; n_features];
    }

    (0..n_features)
        .map(|col| {
            let mean = filtered.rows().iter().map(|r| r[col]).sum::<f64>() / n as f64;
            if mean == 0.0 {
                return f64::INFINITY;
            }
            let variance = filtered
                .rows()
                .iter()
                .map(|r| (r[col] - mean).powi(2))
                .sum::<f64>()
                / n as f64;
            variance.sqrt() / mean
        })
        .collect()
}
