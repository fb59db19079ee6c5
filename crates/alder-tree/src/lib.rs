//! CART classification trees with minimal cost-complexity pruning.
//!
//! Provides a hand-rolled decision tree classifier (Gini impurity,
//! exhaustive split search in a seeded feature order), post-fit pruning
//! controlled by `ccp_alpha`, the cost-complexity pruning path, depth and
//! root-split inspection, accuracy/recall scoring, and a text rendering of
//! the learned rules.

mod confusion;
mod error;
mod node;
mod prune;
mod split;
mod text;
mod tree;

pub use confusion::{ClassMetrics, ConfusionMatrix, POSITIVE_CLASS, accuracy, recall, recall_of};
pub use error::TreeError;
pub use node::{FeatureIndex, Impurity, Node, NodeIndex};
pub use prune::PruningPath;
pub use text::TreeText;
pub use tree::{DecisionTree, DecisionTreeConfig};
