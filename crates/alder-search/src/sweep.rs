//! Ordered, batched evaluation of candidate pruning strengths.

use std::ops::ControlFlow;

use rayon::prelude::*;
use tracing::trace;

use crate::{SearchConfig, SearchError};

/// Drives one search call: fits candidates in parallel batches and feeds the
/// results to a sequential decision rule in candidate order.
///
/// Within a batch every candidate is fit even if an earlier one stops the
/// sweep, so the outcome is identical to a one-at-a-time scan.
pub(crate) struct Sweep {
    batch_size: usize,
    budget: Option<usize>,
    fits: usize,
}

impl Sweep {
    pub(crate) fn new(config: &SearchConfig) -> Self {
        Self {
            batch_size: config.batch_size(),
            budget: config.fit_budget(),
            fits: 0,
        }
    }

    /// Return the number of fits charged so far.
    pub(crate) fn fits(&self) -> usize {
        self.fits
    }

    /// Reserve `n` fits against the budget.
    pub(crate) fn charge(&mut self, n: usize) -> Result<(), SearchError> {
        if let Some(budget) = self.budget
            && self.fits + n > budget
        {
            return Err(SearchError::FitBudgetExhausted { budget });
        }
        self.fits += n;
        Ok(())
    }

    /// Number of fits still allowed, if budgeted.
    fn remaining(&self) -> Option<usize> {
        self.budget.map(|b| b.saturating_sub(self.fits))
    }

    /// Evaluate `candidates` in order until `decide` breaks.
    ///
    /// Returns `Some(value)` from the first `Break`, or `None` when every
    /// candidate was accepted.
    pub(crate) fn run<T, B, E, D>(
        &mut self,
        candidates: &[f64],
        eval: E,
        mut decide: D,
    ) -> Result<Option<B>, SearchError>
    where
        T: Send,
        E: Fn(f64) -> Result<T, SearchError> + Sync,
        D: FnMut(f64, T) -> ControlFlow<B>,
    {
        let mut start = 0;
        while start < candidates.len() {
            let mut end = (start + self.batch_size).min(candidates.len());
            if let Some(remaining) = self.remaining() {
                end = end.min(start + remaining.max(1));
            }
            let batch = &candidates[start..end];
            self.charge(batch.len())?;

            let results = batch
                .par_iter()
                .map(|&alpha| eval(alpha))
                .collect::<Result<Vec<T>, SearchError>>()?;
            trace!(start, len = batch.len(), "batch evaluated");

            for (&alpha, result) in batch.iter().zip(results) {
                if let ControlFlow::Break(value) = decide(alpha, result) {
                    return Ok(Some(value));
                }
            }
            start = end;
        }
        Ok(None)
    }
}
