//! Searches composed over reduced feature subsets.

use tracing::{debug, info, instrument};

use crate::projection::{FeatureSubset, check_names};
use crate::sweep::Sweep;
use crate::{SearchConfig, SearchError};

impl SearchConfig {
    /// Optimal pruning strength when the tree may only see the most
    /// important feature.
    ///
    /// Runs [`SearchConfig::important_feature`] on all columns. With no
    /// feature found the result is 0.0; otherwise train and test rows are
    /// projected to that one column and [`SearchConfig::optimal_ccp_alpha`]
    /// runs on them. Both steps draw on one fit budget.
    ///
    /// # Errors
    ///
    /// Same as [`SearchConfig::important_feature`] and
    /// [`SearchConfig::optimal_ccp_alpha`], plus [`SearchError::RowTooShort`]
    /// when a test row is narrower than the training rows.
    #[instrument(skip_all, fields(n_features = feature_names.len()))]
    pub fn optimal_ccp_alpha_single_feature(
        &self,
        x_train: &[Vec<f64>],
        y_train: &[usize],
        x_test: &[Vec<f64>],
        y_test: &[usize],
        feature_names: &[String],
    ) -> Result<f64, SearchError> {
        self.validate()?;
        check_names(x_train, feature_names)?;
        let mut sweep = Sweep::new(self);

        let Some(feature) = self.root_feature_index(&mut sweep, x_train, y_train)? else {
            info!("no discriminative feature, single-feature alpha is 0");
            return Ok(0.0);
        };
        debug!(feature = %feature_names[feature.index()], "projecting to single feature");

        let subset = FeatureSubset::new(vec![feature.index()], feature_names.len())?;
        let alpha = self.threshold_search(
            &mut sweep,
            &subset.project(x_train)?,
            y_train,
            &subset.project(x_test)?,
            y_test,
        )?;
        info!(alpha, fits = sweep.fits(), "single-feature analysis complete");
        Ok(alpha)
    }

    /// Depth of the optimally pruned tree restricted to the two dominant
    /// features.
    ///
    /// 1. Extract the first feature from all columns; none → 0.
    /// 2. Drop it and extract a second feature from the remaining columns;
    ///    none, or no column left → 0.
    /// 3. Project train and test rows to both columns, keeping their original
    ///    relative order, run [`SearchConfig::optimal_ccp_alpha`], fit one
    ///    tree at the result, and return its depth.
    ///
    /// Every fit, the final one included, is charged to one fit budget.
    ///
    /// # Errors
    ///
    /// Same as [`SearchConfig::optimal_ccp_alpha_single_feature`].
    #[instrument(skip_all, fields(n_features = feature_names.len()))]
    pub fn optimal_depth_two_features(
        &self,
        x_train: &[Vec<f64>],
        y_train: &[usize],
        x_test: &[Vec<f64>],
        y_test: &[usize],
        feature_names: &[String],
    ) -> Result<usize, SearchError> {
        self.validate()?;
        check_names(x_train, feature_names)?;
        let n_features = feature_names.len();
        let mut sweep = Sweep::new(self);

        let Some(first) = self.root_feature_index(&mut sweep, x_train, y_train)? else {
            info!("no discriminative feature, two-feature depth is 0");
            return Ok(0);
        };
        let first = first.index();

        let Some(rest) = FeatureSubset::complement(first, n_features) else {
            info!("no column left after removing the first feature");
            return Ok(0);
        };
        let rest_train = rest.project(x_train)?;
        let Some(second) = self.root_feature_index(&mut sweep, &rest_train, y_train)? else {
            info!(first = %feature_names[first], "no second discriminative feature");
            return Ok(0);
        };
        // Map back from the reduced matrix to original column numbers.
        let second = rest.indices()[second.index()];
        debug!(
            first = %feature_names[first],
            second = %feature_names[second],
            "feature pair selected"
        );

        let pair = FeatureSubset::new(vec![first.min(second), first.max(second)], n_features)?;
        let train_pair = pair.project(x_train)?;
        let alpha =
            self.threshold_search(&mut sweep, &train_pair, y_train, &pair.project(x_test)?, y_test)?;
        sweep.charge(1)?;
        let depth = self.tree_config(alpha).fit(&train_pair, y_train)?.depth();

        info!(alpha, depth, fits = sweep.fits(), "two-feature analysis complete");
        Ok(depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn single_feature_without_signal_is_zero() {
        let x = vec![vec![2.0, 2.0]; 6];
        let y = vec![0, 1, 0, 1, 0, 1];
        let alpha = SearchConfig::new()
            .optimal_ccp_alpha_single_feature(&x, &y, &x, &y, &names(&["a", "b"]))
            .unwrap();
        assert!(alpha.abs() < f64::EPSILON);
    }

    #[test]
    fn two_features_without_signal_is_zero() {
        let x = vec![vec![2.0, 2.0]; 6];
        let y = vec![0, 1, 0, 1, 0, 1];
        // The first extraction stops at its first candidate, so one fit is
        // all the analysis may spend.
        let depth = SearchConfig::new()
            .with_batch_size(1)
            .with_fit_budget(1)
            .optimal_depth_two_features(&x, &y, &x, &y, &names(&["a", "b"]))
            .unwrap();
        assert_eq!(depth, 0);
    }

    #[test]
    fn one_column_leaves_nothing_for_second_pick() {
        let x = vec![vec![1.0], vec![2.0], vec![10.0], vec![11.0]];
        let y = vec![0, 0, 1, 1];
        let depth = SearchConfig::new()
            .optimal_depth_two_features(&x, &y, &x, &y, &names(&["only"]))
            .unwrap();
        assert_eq!(depth, 0);
    }

    #[test]
    fn second_constant_column_gives_zero() {
        let x = vec![
            vec![1.0, 5.0],
            vec![2.0, 5.0],
            vec![10.0, 5.0],
            vec![11.0, 5.0],
        ];
        let y = vec![0, 0, 1, 1];
        let depth = SearchConfig::new()
            .optimal_depth_two_features(&x, &y, &x, &y, &names(&["signal", "flat"]))
            .unwrap();
        assert_eq!(depth, 0);
    }

    #[test]
    fn name_count_mismatch_rejected() {
        let x = vec![vec![1.0, 2.0]];
        assert!(matches!(
            SearchConfig::new().optimal_depth_two_features(&x, &[0], &x, &[0], &names(&["a"])),
            Err(SearchError::FeatureNameCountMismatch { .. })
        ));
    }
}
