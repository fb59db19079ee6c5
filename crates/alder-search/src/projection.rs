//! Feature subsets and column projection.

use crate::SearchError;

/// An ordered set of distinct feature columns.
///
/// Projection keeps columns in the order given here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSubset {
    indices: Vec<usize>,
}

impl FeatureSubset {
    /// Build a subset of a matrix with `n_features` columns.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SearchError::EmptyFeatureSubset`] | `indices` is empty |
    /// | [`SearchError::FeatureIndexOutOfBounds`] | An index is `>= n_features` |
    /// | [`SearchError::DuplicateFeatureIndex`] | An index appears twice |
    pub fn new(indices: Vec<usize>, n_features: usize) -> Result<Self, SearchError> {
        if indices.is_empty() {
            return Err(SearchError::EmptyFeatureSubset);
        }
        let mut seen = vec![false; n_features];
        for &index in &indices {
            if index >= n_features {
                return Err(SearchError::FeatureIndexOutOfBounds { index, n_features });
            }
            if seen[index] {
                return Err(SearchError::DuplicateFeatureIndex { index });
            }
            seen[index] = true;
        }
        Ok(Self { indices })
    }

    /// Every column except `excluded`, in ascending order.
    ///
    /// Returns `None` when nothing would remain.
    pub(crate) fn complement(excluded: usize, n_features: usize) -> Option<Self> {
        let indices: Vec<usize> = (0..n_features).filter(|&i| i != excluded).collect();
        (!indices.is_empty()).then_some(Self { indices })
    }

    /// Return the column indices in projection order.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Return the number of selected columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Always `false`; an empty subset cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Copy the selected columns out of every row.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::RowTooShort`] when a row lacks a selected column.
    pub fn project(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, SearchError> {
        let required = self.indices.iter().max().map_or(0, |&m| m + 1);
        rows.iter()
            .enumerate()
            .map(|(row_index, row)| {
                if row.len() < required {
                    return Err(SearchError::RowTooShort {
                        row_index,
                        width: row.len(),
                        required,
                    });
                }
                Ok(self.indices.iter().map(|&i| row[i]).collect())
            })
            .collect()
    }
}

/// Check that `names` labels every column of `rows`.
///
/// An empty matrix is accepted here; the tree fit reports it.
pub(crate) fn check_names(rows: &[Vec<f64>], names: &[String]) -> Result<(), SearchError> {
    if let Some(first) = rows.first()
        && first.len() != names.len()
    {
        return Err(SearchError::FeatureNameCountMismatch {
            n_names: names.len(),
            n_features: first.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Vec<f64>> {
        vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]
    }

    #[test]
    fn project_keeps_given_order() {
        let subset = FeatureSubset::new(vec![2, 0], 3).unwrap();
        assert_eq!(
            subset.project(&rows()).unwrap(),
            vec![vec![3.0, 1.0], vec![6.0, 4.0]]
        );
    }

    #[test]
    fn single_column_projection() {
        let subset = FeatureSubset::new(vec![1], 3).unwrap();
        assert_eq!(subset.project(&rows()).unwrap(), vec![vec![2.0], vec![5.0]]);
        assert_eq!(subset.len(), 1);
    }

    #[test]
    fn rejects_bad_subsets() {
        assert!(matches!(
            FeatureSubset::new(vec![], 3),
            Err(SearchError::EmptyFeatureSubset)
        ));
        assert!(matches!(
            FeatureSubset::new(vec![3], 3),
            Err(SearchError::FeatureIndexOutOfBounds { index: 3, n_features: 3 })
        ));
        assert!(matches!(
            FeatureSubset::new(vec![1, 1], 3),
            Err(SearchError::DuplicateFeatureIndex { index: 1 })
        ));
    }

    #[test]
    fn short_row_rejected() {
        let subset = FeatureSubset::new(vec![2], 3).unwrap();
        let err = subset.project(&[vec![1.0, 2.0]]).unwrap_err();
        assert!(matches!(
            err,
            SearchError::RowTooShort { row_index: 0, width: 2, required: 3 }
        ));
    }

    #[test]
    fn complement_drops_one_column() {
        let rest = FeatureSubset::complement(1, 3).unwrap();
        assert_eq!(rest.indices(), &[0, 2]);
        assert!(FeatureSubset::complement(0, 1).is_none());
    }

    #[test]
    fn name_count_checked() {
        let names = vec!["a".to_string(), "b".to_string()];
        assert!(matches!(
            check_names(&rows(), &names),
            Err(SearchError::FeatureNameCountMismatch { n_names: 2, n_features: 3 })
        ));
        assert!(check_names(&[], &names).is_ok());
    }
}
