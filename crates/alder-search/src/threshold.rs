//! Pruning-threshold search.

use std::ops::ControlFlow;

use alder_tree::accuracy;
use tracing::{debug, info, instrument};

use crate::sweep::Sweep;
use crate::{SearchConfig, SearchError};

impl SearchConfig {
    /// Find the largest pruning strength whose test accuracy stays within
    /// `tolerance` of the unpruned tree.
    ///
    /// 1. Fit with α = 0 and score it on the test rows (`A0`).
    /// 2. If `A0` is exactly 1.0, return 0.0 without sweeping.
    /// 3. Sweep α = `step, 2*step, ..` up to `max_alpha`. The first candidate
    ///    scoring below `A0 - tolerance` ends the sweep and the previous
    ///    accepted candidate (0.0 if none) is returned.
    /// 4. If no candidate fails, the last one is returned.
    ///
    /// The scan never looks past the first failure, even if accuracy would
    /// recover at a larger α.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SearchError::Tree`] | A fit or prediction fails |
    /// | [`SearchError::FitBudgetExhausted`] | More fits needed than budgeted |
    /// | `Invalid*` config variants | Non-positive step, negative ceiling or tolerance, zero batch size |
    #[instrument(skip_all, fields(n_train = x_train.len(), n_test = x_test.len()))]
    pub fn optimal_ccp_alpha(
        &self,
        x_train: &[Vec<f64>],
        y_train: &[usize],
        x_test: &[Vec<f64>],
        y_test: &[usize],
    ) -> Result<f64, SearchError> {
        self.validate()?;
        self.threshold_search(&mut Sweep::new(self), x_train, y_train, x_test, y_test)
    }

    /// Threshold search charging its fits to an existing sweep.
    pub(crate) fn threshold_search(
        &self,
        sweep: &mut Sweep,
        x_train: &[Vec<f64>],
        y_train: &[usize],
        x_test: &[Vec<f64>],
        y_test: &[usize],
    ) -> Result<f64, SearchError> {
        sweep.charge(1)?;
        let baseline = self.test_accuracy(0.0, x_train, y_train, x_test, y_test)?;
        if baseline == 1.0 {
            info!("unpruned tree is already perfect, skipping sweep");
            return Ok(0.0);
        }

        let floor = baseline - self.tolerance;
        let mut last_valid = 0.0;
        let stopped = sweep.run(
            &self.threshold_candidates(),
            |alpha| self.test_accuracy(alpha, x_train, y_train, x_test, y_test),
            |alpha, acc| {
                debug!(alpha, accuracy = acc, "candidate scored");
                if acc < floor {
                    ControlFlow::Break(alpha)
                } else {
                    last_valid = alpha;
                    ControlFlow::Continue(())
                }
            },
        )?;

        info!(
            baseline,
            optimal_ccp_alpha = last_valid,
            failed_at = ?stopped,
            fits = sweep.fits(),
            "threshold search complete"
        );
        Ok(last_valid)
    }

    fn test_accuracy(
        &self,
        ccp_alpha: f64,
        x_train: &[Vec<f64>],
        y_train: &[usize],
        x_test: &[Vec<f64>],
        y_test: &[usize],
    ) -> Result<f64, SearchError> {
        let tree = self.tree_config(ccp_alpha).fit(x_train, y_train)?;
        let predicted = tree.predict_batch(x_test)?;
        Ok(accuracy(y_test, &predicted)?)
    }
}
