//! Configuration for pruning-strength sweeps.

use alder_tree::DecisionTreeConfig;

use crate::SearchError;

/// Configuration shared by every search operation.
///
/// Construct via [`SearchConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter         | Default                          |
/// |-------------------|----------------------------------|
/// | `alpha_step`      | 0.001 (threshold search)         |
/// | `extraction_step` | 0.01 (root-feature extraction)   |
/// | `max_alpha`       | 1.0 (inclusive sweep ceiling)    |
/// | `tolerance`       | 0.01 (allowed accuracy drop)     |
/// | `seed`            | 1                                |
/// | `batch_size`      | `None` (rayon thread count)      |
/// | `fit_budget`      | `None` (unbounded)               |
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub(crate) alpha_step: f64,
    pub(crate) extraction_step: f64,
    pub(crate) max_alpha: f64,
    pub(crate) tolerance: f64,
    pub(crate) seed: u64,
    pub(crate) batch_size: Option<usize>,
    pub(crate) fit_budget: Option<usize>,
}

impl SearchConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            alpha_step: 0.001,
            extraction_step: 0.01,
            max_alpha: 1.0,
            tolerance: 0.01,
            seed: 1,
            batch_size: None,
            fit_budget: None,
        }
    }

    /// Set the α increment of the threshold search.
    #[must_use]
    pub fn with_alpha_step(mut self, alpha_step: f64) -> Self {
        self.alpha_step = alpha_step;
        self
    }

    /// Set the α increment of root-feature extraction.
    #[must_use]
    pub fn with_extraction_step(mut self, extraction_step: f64) -> Self {
        self.extraction_step = extraction_step;
        self
    }

    /// Set the largest α either sweep visits (inclusive).
    #[must_use]
    pub fn with_max_alpha(mut self, max_alpha: f64) -> Self {
        self.max_alpha = max_alpha;
        self
    }

    /// Set how far test accuracy may fall below the unpruned baseline.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the seed passed to every tree fit.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set how many candidates are fit concurrently before the stop rule runs.
    ///
    /// `1` gives a strictly sequential sweep.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Cap the number of tree fits a single search call may perform.
    #[must_use]
    pub fn with_fit_budget(mut self, fit_budget: usize) -> Self {
        self.fit_budget = Some(fit_budget);
        self
    }

    // --- Getters ---

    /// Return the threshold-search step.
    #[must_use]
    pub fn alpha_step(&self) -> f64 {
        self.alpha_step
    }

    /// Return the extraction step.
    #[must_use]
    pub fn extraction_step(&self) -> f64 {
        self.extraction_step
    }

    /// Return the sweep ceiling.
    #[must_use]
    pub fn max_alpha(&self) -> f64 {
        self.max_alpha
    }

    /// Return the accuracy tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Return the tree seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Return the effective batch size.
    ///
    /// Falls back to the size of the current rayon pool when unset.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
            .unwrap_or_else(rayon::current_num_threads)
            .max(1)
    }

    /// Return the fit budget, if any.
    #[must_use]
    pub fn fit_budget(&self) -> Option<usize> {
        self.fit_budget
    }

    /// Tree configuration used for a single candidate fit.
    pub(crate) fn tree_config(&self, ccp_alpha: f64) -> DecisionTreeConfig {
        DecisionTreeConfig::new()
            .with_ccp_alpha(ccp_alpha)
            .with_seed(self.seed)
    }

    /// Threshold-search candidates `step, 2*step, ..` up to `max_alpha`.
    pub(crate) fn threshold_candidates(&self) -> Vec<f64> {
        grid(self.alpha_step, self.max_alpha, 1)
    }

    /// Extraction candidates `0, step, 2*step, ..` up to `max_alpha`.
    pub(crate) fn extraction_candidates(&self) -> Vec<f64> {
        grid(self.extraction_step, self.max_alpha, 0)
    }

    pub(crate) fn validate(&self) -> Result<(), SearchError> {
        for step in [self.alpha_step, self.extraction_step] {
            if !step.is_finite() || step <= 0.0 {
                return Err(SearchError::InvalidAlphaStep { step });
            }
        }
        if !self.max_alpha.is_finite() || self.max_alpha < 0.0 {
            return Err(SearchError::InvalidMaxAlpha {
                max_alpha: self.max_alpha,
            });
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SearchError::InvalidTolerance {
                tolerance: self.tolerance,
            });
        }
        if self.batch_size == Some(0) {
            return Err(SearchError::InvalidBatchSize);
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Multiples `i * step` for `i` in `first..=n` where `n * step <= max`.
///
/// Each value is computed by multiplication rather than accumulation so the
/// grid does not drift; the small slack absorbs `max / step` landing just
/// under an integer.
fn grid(step: f64, max: f64, first: usize) -> Vec<f64> {
    let n = (max / step + 1e-9).floor() as usize;
    (first..=n).map(|i| i as f64 * step).collect()
}
