//! Root-feature extraction.

use std::ops::ControlFlow;

use alder_tree::FeatureIndex;
use tracing::{debug, info, instrument};

use crate::projection::check_names;
use crate::sweep::Sweep;
use crate::{SearchConfig, SearchError};

impl SearchConfig {
    /// Name the feature the tree leans on most.
    ///
    /// Sweeps α = `0, step, 2*step, ..` up to `max_alpha` and reads the
    /// depth `d` of each fitted tree:
    ///
    /// - `d >= 2`: remember the root feature and keep going.
    /// - `d == 1`: return the root feature at once; later candidates are
    ///   never fit.
    /// - `d == 0`: return the remembered feature, or `None`.
    ///
    /// If the sweep ends first, the remembered feature (or `None`) is
    /// returned. `feature_names` holds one name per column of `x_train`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SearchError::FeatureNameCountMismatch`] | Name count differs from column count |
    /// | [`SearchError::Tree`] | A fit fails |
    /// | [`SearchError::FitBudgetExhausted`] | More fits needed than budgeted |
    #[instrument(skip_all, fields(n_train = x_train.len(), n_features = feature_names.len()))]
    pub fn important_feature(
        &self,
        x_train: &[Vec<f64>],
        y_train: &[usize],
        feature_names: &[String],
    ) -> Result<Option<String>, SearchError> {
        self.validate()?;
        check_names(x_train, feature_names)?;
        let root = self.root_feature_index(&mut Sweep::new(self), x_train, y_train)?;
        let name = root.map(|f| feature_names[f.index()].clone());
        info!(feature = ?name, "root-feature extraction complete");
        Ok(name)
    }

    /// Index form of [`SearchConfig::important_feature`], charging its fits
    /// to `sweep`.
    pub(crate) fn root_feature_index(
        &self,
        sweep: &mut Sweep,
        x_train: &[Vec<f64>],
        y_train: &[usize],
    ) -> Result<Option<FeatureIndex>, SearchError> {
        let mut last_valid: Option<FeatureIndex> = None;

        let decided = sweep.run(
            &self.extraction_candidates(),
            |alpha| {
                let tree = self.tree_config(alpha).fit(x_train, y_train)?;
                Ok((tree.depth(), tree.root_feature()))
            },
            |alpha, (depth, root)| {
                debug!(alpha, depth, root = ?root, "candidate fitted");
                match (depth, root) {
                    (1, Some(feature)) => ControlFlow::Break(Some(feature)),
                    (d, Some(feature)) if d >= 2 => {
                        last_valid = Some(feature);
                        ControlFlow::Continue(())
                    }
                    _ => ControlFlow::Break(last_valid),
                }
            },
        )?;

        Ok(decided.unwrap_or(last_valid))
    }
}
