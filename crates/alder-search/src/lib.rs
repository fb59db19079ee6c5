//! Pruning-strength search and root-feature extraction over CART trees.
//!
//! Every analysis repeatedly fits [`alder_tree::DecisionTree`]s over a grid
//! of `ccp_alpha` values and applies a sequential decision rule to the
//! ordered results:
//!
//! - [`optimal_ccp_alpha`]: largest α whose test accuracy stays within a
//!   tolerance of the unpruned tree.
//! - [`important_feature`]: root-split feature of the least pruned tree that
//!   is still a single decisive split.
//! - [`optimal_ccp_alpha_single_feature`] and [`optimal_depth_two_features`]:
//!   the two searches composed over reduced feature subsets.
//!
//! The free functions use [`SearchConfig::default`]; the same operations are
//! available as methods on a customized [`SearchConfig`].

mod composite;
mod config;
mod error;
mod extraction;
mod projection;
mod sweep;
mod threshold;

pub use config::SearchConfig;
pub use error::SearchError;
pub use projection::FeatureSubset;

/// Largest pruning strength that keeps test accuracy within 1 point of the
/// unpruned tree. See [`SearchConfig::optimal_ccp_alpha`].
///
/// # Errors
///
/// Propagates tree-fit failures as [`SearchError::Tree`].
pub fn optimal_ccp_alpha(
    x_train: &[Vec<f64>],
    y_train: &[usize],
    x_test: &[Vec<f64>],
    y_test: &[usize],
) -> Result<f64, SearchError> {
    SearchConfig::default().optimal_ccp_alpha(x_train, y_train, x_test, y_test)
}

/// Name of the feature the tree splits on first. See
/// [`SearchConfig::important_feature`].
///
/// # Errors
///
/// See [`SearchConfig::important_feature`].
pub fn important_feature(
    x_train: &[Vec<f64>],
    y_train: &[usize],
    feature_names: &[String],
) -> Result<Option<String>, SearchError> {
    SearchConfig::default().important_feature(x_train, y_train, feature_names)
}

/// Optimal pruning strength using only the most important feature. See
/// [`SearchConfig::optimal_ccp_alpha_single_feature`].
///
/// # Errors
///
/// See [`SearchConfig::optimal_ccp_alpha_single_feature`].
pub fn optimal_ccp_alpha_single_feature(
    x_train: &[Vec<f64>],
    y_train: &[usize],
    x_test: &[Vec<f64>],
    y_test: &[usize],
    feature_names: &[String],
) -> Result<f64, SearchError> {
    SearchConfig::default().optimal_ccp_alpha_single_feature(
        x_train,
        y_train,
        x_test,
        y_test,
        feature_names,
    )
}

/// Depth of the optimally pruned tree on the two dominant features. See
/// [`SearchConfig::optimal_depth_two_features`].
///
/// # Errors
///
/// See [`SearchConfig::optimal_depth_two_features`].
pub fn optimal_depth_two_features(
    x_train: &[Vec<f64>],
    y_train: &[usize],
    x_test: &[Vec<f64>],
    y_test: &[usize],
    feature_names: &[String],
) -> Result<usize, SearchError> {
    SearchConfig::default().optimal_depth_two_features(
        x_train,
        y_train,
        x_test,
        y_test,
        feature_names,
    )
}
