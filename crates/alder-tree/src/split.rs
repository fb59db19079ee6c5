use rand::Rng;
use rand::seq::SliceRandom;

use crate::node::{FeatureIndex, Impurity};

/// Gini impurity `1 - Σ(p_i²)` of a node with the given class counts.
///
/// An empty node counts as pure.
#[must_use]
pub(crate) fn gini(class_counts: &[usize], n_samples: usize) -> Impurity {
    if n_samples == 0 {
        return Impurity::new(0.0);
    }
    let n = n_samples as f64;
    let sum_sq: f64 = class_counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum();
    Impurity::new(1.0 - sum_sq)
}

/// Result of finding the best split for a node.
#[derive(Debug, Clone)]
pub(crate) struct SplitResult {
    /// Feature used for the split.
    pub(crate) feature: FeatureIndex,
    /// Threshold value.
    pub(crate) threshold: f64,
    /// Sample indices going to the left child.
    pub(crate) left_indices: Vec<usize>,
    /// Sample indices going to the right child.
    pub(crate) right_indices: Vec<usize>,
}

/// Best cut found on one feature column.
struct Cut {
    decrease: f64,
    threshold: f64,
}

/// Find the best split over every feature column.
///
/// Features are visited in an order drawn from `rng`, so the seed decides
/// which feature wins when two features tie on impurity decrease: only a
/// strictly larger decrease replaces the current best.
///
/// Returns `None` when no valid split exists (all values identical,
/// or every split would violate `min_samples_leaf`).
///
/// `features` is column-major: `features[feature_idx][sample_idx]`.
pub(crate) fn find_best_split(
    features: &[Vec<f64>],
    labels: &[usize],
    sample_indices: &[usize],
    class_counts: &[usize],
    min_samples_leaf: usize,
    rng: &mut impl Rng,
) -> Option<SplitResult> {
    if sample_indices.len() < 2 || features.is_empty() {
        return None;
    }

    let mut feature_order: Vec<usize> = (0..features.len()).collect();
    feature_order.shuffle(rng);

    let scan = ColumnScan {
        labels,
        sample_indices,
        class_counts,
        min_samples_leaf,
    };

    let mut best: Option<(FeatureIndex, Cut)> = None;
    for feat_idx in feature_order {
        let Some(cut) = scan.best_cut(&features[feat_idx]) else {
            continue;
        };
        if best.as_ref().is_none_or(|(_, b)| cut.decrease > b.decrease) {
            best = Some((FeatureIndex::new(feat_idx), cut));
        }
    }

    let (feature, Cut { threshold, .. }) = best?;
    let column = &features[feature.index()];
    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = sample_indices
        .iter()
        .partition(|&&si| column[si] <= threshold);

    Some(SplitResult {
        feature,
        threshold,
        left_indices,
        right_indices,
    })
}

/// Per-node state shared by every column scan.
struct ColumnScan<'a> {
    labels: &'a [usize],
    sample_indices: &'a [usize],
    class_counts: &'a [usize],
    min_samples_leaf: usize,
}

impl ColumnScan<'_> {
    /// Sweep one column in sorted order, moving samples from the right
    /// partition to the left one at a time, and keep the first cut with the
    /// largest weighted impurity decrease. Cuts between equal values are
    /// skipped, so a constant column yields `None`.
    fn best_cut(&self, column: &[f64]) -> Option<Cut> {
        let n = self.sample_indices.len();
        let parent = n as f64 * gini(self.class_counts, n).value();

        let mut order: Vec<(f64, usize)> = self
            .sample_indices
            .iter()
            .map(|&si| (column[si], self.labels[si]))
            .collect();
        order.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

        let mut left = vec![0usize; self.class_counts.len()];
        let mut right = self.class_counts.to_vec();
        let mut best: Option<Cut> = None;

        for (n_left, pair) in (1..n).zip(order.windows(2)) {
            let ((lo, class), (hi, _)) = (pair[0], pair[1]);
            left[class] += 1;
            right[class] -= 1;

            let n_right = n - n_left;
            if lo == hi || n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
                continue;
            }

            let decrease = parent
                - n_left as f64 * gini(&left, n_left).value()
                - n_right as f64 * gini(&right, n_right).value();
            if best.as_ref().is_none_or(|b| decrease > b.decrease) {
                best = Some(Cut {
                    decrease,
                    threshold: midpoint(lo, hi),
                });
            }
        }
        best
    }
}

/// Midpoint of two adjacent distinct values, never equal to `hi`.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = (lo + hi) / 2.0;
    // Adjacent floats can round up to the upper value.
    if mid == hi { lo } else { mid }
}
