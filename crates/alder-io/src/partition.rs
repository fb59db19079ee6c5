//! Stratified, seeded train/test partitioning.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::IoError;
use crate::domain::Dataset;

/// A dataset split into training and held-out rows.
///
/// Feature matrices are row-major and exclude the label column. Labels are
/// dense class ids: id `k` stands for the label value `classes[k]`.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    /// Training feature rows.
    pub x_train: Vec<Vec<f64>>,
    /// Held-out feature rows.
    pub x_test: Vec<Vec<f64>>,
    /// Training labels, parallel to `x_train`.
    pub y_train: Vec<usize>,
    /// Held-out labels, parallel to `x_test`.
    pub y_test: Vec<usize>,
    /// One name per feature column.
    pub feature_names: Vec<String>,
    /// Distinct label values in ascending order, indexed by class id.
    pub classes: Vec<f64>,
}

impl TrainTestSplit {
    /// Class id of the label value `1`, the class scored by recall.
    #[must_use]
    pub fn positive_class(&self) -> Option<usize> {
        self.class_of(1.0)
    }

    /// Class id of a label value, if it occurs in the data.
    #[must_use]
    pub fn class_of(&self, value: f64) -> Option<usize> {
        self.classes.iter().position(|&c| c == value)
    }
}

/// Split `dataset` into train and test partitions stratified by label.
///
/// The test side receives `ceil(test_fraction * n_rows)` rows, apportioned
/// across classes by largest remainder so class proportions match the input
/// as closely as possible. Every class with at least two rows keeps at least
/// one row on each side; single-row classes stay in training. Rows are drawn
/// within each class by a `ChaCha8Rng` seeded with `seed`, and both sides keep
/// the input row order.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::InvalidTestFraction`] | `test_fraction` not in (0, 1) |
/// | [`IoError::TooFewRows`] | Fewer than 2 rows |
/// | [`IoError::NonIntegralLabel`] | A label is negative or fractional |
#[instrument(skip(dataset), fields(n_rows = dataset.n_rows()))]
pub fn train_test_split(
    dataset: &Dataset,
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit, IoError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(IoError::InvalidTestFraction {
            fraction: test_fraction,
        });
    }

    let n_rows = dataset.n_rows();
    if n_rows < 2 {
        return Err(IoError::TooFewRows {
            n_rows,
            required: 2,
        });
    }

    let (classes, labels) = class_labels(dataset)?;
    let n_classes = classes.len();

    let mut class_indices: Vec<Vec<usize>> = vec![vec![]; n_classes];
    for (i, &label) in labels.iter().enumerate() {
        class_indices[label].push(i);
    }

    let n_test = ((test_fraction * n_rows as f64).ceil() as usize).clamp(1, n_rows - 1);
    let counts: Vec<usize> = class_indices.iter().map(Vec::len).collect();
    let allocation = apportion(&counts, n_test);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut is_test = vec![false; n_rows];
    for (indices, &take) in class_indices.iter_mut().zip(&allocation) {
        indices.shuffle(&mut rng);
        for &idx in indices.iter().take(take) {
            is_test[idx] = true;
        }
    }

    let mut split = TrainTestSplit {
        x_train: Vec::with_capacity(n_rows - n_test),
        x_test: Vec::with_capacity(n_test),
        y_train: Vec::with_capacity(n_rows - n_test),
        y_test: Vec::with_capacity(n_test),
        feature_names: dataset.feature_names().to_vec(),
        classes,
    };
    for (i, &label) in labels.iter().enumerate() {
        let row = dataset.features_of(i).to_vec();
        if is_test[i] {
            split.x_test.push(row);
            split.y_test.push(label);
        } else {
            split.x_train.push(row);
            split.y_train.push(label);
        }
    }

    debug!(
        n_train = split.y_train.len(),
        n_test = split.y_test.len(),
        n_classes,
        "stratified split done"
    );

    Ok(split)
}

/// Validate the label column and map each value to its rank among the
/// distinct values, so class ids stay dense whatever the label magnitudes.
fn class_labels(dataset: &Dataset) -> Result<(Vec<f64>, Vec<usize>), IoError> {
    let values = (0..dataset.n_rows())
        .map(|row_index| {
            let value = dataset.label_of(row_index);
            if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
                return Err(IoError::NonIntegralLabel { row_index, value });
            }
            // Fold -0.0 into 0.0.
            Ok(value + 0.0)
        })
        .collect::<Result<Vec<f64>, IoError>>()?;

    let mut classes = values.clone();
    classes.sort_by(f64::total_cmp);
    classes.dedup();
    let ids = values
        .iter()
        .map(|v| classes.partition_point(|c| c < v))
        .collect();
    Ok((classes, ids))
}

/// Decide how many rows of each class go to the test side.
///
/// Starts from the floor of each class's proportional quota, hands out the
/// remaining rows by descending fractional remainder (lower class id first on
/// ties), then nudges the totals back to `n_test` within the per-class bounds.
fn apportion(counts: &[usize], n_test: usize) -> Vec<usize> {
    let n_rows: usize = counts.iter().sum();
    let bounds: Vec<(usize, usize)> = counts
        .iter()
        .map(|&c| if c >= 2 { (1, c - 1) } else { (0, 0) })
        .collect();

    let quotas: Vec<f64> = counts
        .iter()
        .map(|&c| n_test as f64 * c as f64 / n_rows as f64)
        .collect();
    let mut allocation: Vec<usize> = quotas
        .iter()
        .zip(&bounds)
        .map(|(&q, &(lo, hi))| (q.floor() as usize).clamp(lo, hi))
        .collect();

    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = quotas[a] - quotas[a].floor();
        let rb = quotas[b] - quotas[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });

    let mut total: usize = allocation.iter().sum();
    while total < n_test {
        let Some(&class) = order.iter().find(|&&c| allocation[c] < bounds[c].1) else {
            break;
        };
        allocation[class] += 1;
        total += 1;
        // Rotate so the next extra row goes to the next class in line.
        order.retain(|&c| c != class);
        order.push(class);
    }
    while total > n_test {
        let Some(&class) = order.iter().rev().find(|&&c| allocation[c] > bounds[c].0) else {
            break;
        };
        allocation[class] -= 1;
        total -= 1;
        order.retain(|&c| c != class);
        order.insert(0, class);
    }

    allocation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(labels: &[f64]) -> Dataset {
        let header = vec!["x".to_string(), "y".to_string()];
        let rows = labels
            .iter()
            .enumerate()
            .map(|(i, &l)| vec![i as f64, l])
            .collect();
        Dataset::new(header, rows).unwrap()
    }

    #[test]
    fn test_size_is_ceiling_of_fraction() {
        let labels: Vec<f64> = (0..10).map(|i| f64::from(i % 2)).collect();
        let split = train_test_split(&dataset(&labels), 0.3, 1).unwrap();
        assert_eq!(split.y_test.len(), 3);
        assert_eq!(split.y_train.len(), 7);
        assert_eq!(split.feature_names, vec!["x".to_string()]);
    }

    #[test]
    fn class_proportions_preserved() {
        // 14 negatives, 6 positives, 30% test → 6 test rows: 4 + 2.
        let mut labels = vec![0.0; 14];
        labels.extend(vec![1.0; 6]);
        let split = train_test_split(&dataset(&labels), 0.3, 1).unwrap();
        let test_pos = split.y_test.iter().filter(|&&y| y == 1).count();
        assert_eq!(split.y_test.len(), 6);
        assert_eq!(test_pos, 2);
    }

    #[test]
    fn every_split_class_on_both_sides() {
        // Minority class with two rows keeps one on each side.
        let mut labels = vec![0.0; 18];
        labels.extend(vec![1.0; 2]);
        let split = train_test_split(&dataset(&labels), 0.1, 3).unwrap();
        assert!(split.y_train.contains(&1));
        assert!(split.y_test.contains(&1));
    }

    #[test]
    fn rows_stay_whole_and_disjoint() {
        let labels: Vec<f64> = (0..12).map(|i| f64::from(i % 3)).collect();
        let split = train_test_split(&dataset(&labels), 0.25, 9).unwrap();
        let mut seen: Vec<usize> = split
            .x_train
            .iter()
            .chain(&split.x_test)
            .map(|r| r[0] as usize)
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..12).collect::<Vec<_>>());
        // Feature x == row index, so the label must match row % 3.
        for (row, &y) in split.x_test.iter().zip(&split.y_test) {
            assert_eq!(row[0] as usize % 3, y);
        }
    }

    #[test]
    fn same_seed_same_split() {
        let labels: Vec<f64> = (0..30).map(|i| f64::from(i % 2)).collect();
        let ds = dataset(&labels);
        let a = train_test_split(&ds, 0.3, 1).unwrap();
        let b = train_test_split(&ds, 0.3, 1).unwrap();
        assert_eq!(a.x_test, b.x_test);
        assert_eq!(a.y_train, b.y_train);
    }

    #[test]
    fn invalid_fraction_rejected() {
        let ds = dataset(&[0.0, 1.0, 0.0, 1.0]);
        for f in [0.0, 1.0, -0.2, f64::NAN] {
            assert!(matches!(
                train_test_split(&ds, f, 1),
                Err(IoError::InvalidTestFraction { .. })
            ));
        }
    }

    #[test]
    fn fractional_label_rejected() {
        let ds = dataset(&[0.0, 1.5, 0.0]);
        let err = train_test_split(&ds, 0.3, 1).unwrap_err();
        assert!(matches!(err, IoError::NonIntegralLabel { row_index: 1, .. }));
    }

    #[test]
    fn negative_label_rejected() {
        let ds = dataset(&[0.0, -1.0, 1.0]);
        assert!(matches!(
            train_test_split(&ds, 0.3, 1),
            Err(IoError::NonIntegralLabel { .. })
        ));
    }

    #[test]
    fn single_row_rejected() {
        let ds = dataset(&[1.0]);
        assert!(matches!(
            train_test_split(&ds, 0.3, 1),
            Err(IoError::TooFewRows { n_rows: 1, required: 2 })
        ));
    }

    #[test]
    fn huge_label_values_become_dense_ids() {
        let labels: Vec<f64> = (0..10).map(|i| if i % 2 == 0 { 0.0 } else { 1e20 }).collect();
        let split = train_test_split(&dataset(&labels), 0.3, 1).unwrap();
        assert_eq!(split.classes, vec![0.0, 1e20]);
        assert!(split.y_train.iter().chain(&split.y_test).all(|&y| y < 2));
        assert_eq!(split.y_test.len(), 3);
        assert!(split.y_test.contains(&0) && split.y_test.contains(&1));
        assert_eq!(split.positive_class(), None);
        assert_eq!(split.class_of(1e20), Some(1));
    }

    #[test]
    fn positive_class_follows_label_value_one() {
        // Labels 1 and 5: value 1 is class id 0.
        let labels: Vec<f64> = (0..8).map(|i| if i < 4 { 5.0 } else { 1.0 }).collect();
        let split = train_test_split(&dataset(&labels), 0.25, 1).unwrap();
        assert_eq!(split.classes, vec![1.0, 5.0]);
        assert_eq!(split.positive_class(), Some(0));
        for (row, &y) in split.x_train.iter().zip(&split.y_train) {
            assert_eq!(y, usize::from(row[0] < 4.0));
        }
    }

    #[test]
    fn apportion_largest_remainder() {
        // Quotas 2.8 / 1.2 with n_test = 4 → 3 / 1.
        assert_eq!(apportion(&[14, 6], 4), vec![3, 1]);
        // Singleton class never lands in test.
        assert_eq!(apportion(&[9, 1], 2), vec![2, 0]);
    }
}
