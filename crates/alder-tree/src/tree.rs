use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::{
    TreeError,
    node::{FeatureIndex, Node, NodeIndex},
    prune::{PruningPath, prune, pruning_path},
    split::{find_best_split, gini},
    text::TreeText,
};

/// Configuration for a single CART decision tree split on Gini impurity.
///
/// Construct via [`DecisionTreeConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter           | Default             |
/// |---------------------|---------------------|
/// | `max_depth`         | `None` (unlimited)  |
/// | `min_samples_split` | 2                   |
/// | `min_samples_leaf`  | 1                   |
/// | `ccp_alpha`         | 0.0 (no pruning)    |
/// | `seed`              | 1                   |
#[derive(Debug, Clone)]
pub struct DecisionTreeConfig {
    pub(crate) max_depth: Option<usize>,
    pub(crate) min_samples_split: usize,
    pub(crate) min_samples_leaf: usize,
    pub(crate) ccp_alpha: f64,
    pub(crate) seed: u64,
}

impl DecisionTreeConfig {
    /// Create a new config with default values.
    ///
    /// All parameters use the defaults shown in the struct-level documentation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            ccp_alpha: 0.0,
            seed: 1,
        }
    }

    /// Set the maximum tree depth.
    ///
    /// `None` means grow until all leaves are pure or stopping conditions
    /// are met. `Some(d)` limits depth to `d` levels (root is depth 0).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum number of samples required to attempt a split.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Set the minimum number of samples required in each leaf after a split.
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Set the cost-complexity pruning strength applied after growing.
    #[must_use]
    pub fn with_ccp_alpha(mut self, ccp_alpha: f64) -> Self {
        self.ccp_alpha = ccp_alpha;
        self
    }

    /// Set the random seed that orders feature candidates at each split.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // --- Getters ---

    /// Return the maximum depth limit, if any.
    #[must_use]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Return the minimum samples required to split a node.
    #[must_use]
    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    /// Return the minimum samples required in each leaf.
    #[must_use]
    pub fn min_samples_leaf(&self) -> usize {
        self.min_samples_leaf
    }

    /// Return the cost-complexity pruning strength.
    #[must_use]
    pub fn ccp_alpha(&self) -> f64 {
        self.ccp_alpha
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Train a decision tree on the provided row-major dataset.
    ///
    /// `features[sample_idx][feature_idx]` (row-major).
    /// `labels[sample_idx]`: class labels. Any `usize` values work; the tree
    /// keeps the distinct labels it saw and predicts among them.
    ///
    /// The tree is grown to purity (subject to the depth and sample limits)
    /// and then pruned with minimal cost-complexity pruning at `ccp_alpha`.
    ///
    /// # Errors
    ///
    /// | Variant                              | When                                      |
    /// |--------------------------------------|-------------------------------------------|
    /// | [`TreeError::EmptyDataset`]          | `features` is empty                       |
    /// | [`TreeError::ZeroFeatures`]          | rows have zero feature columns            |
    /// | [`TreeError::FeatureCountMismatch`]  | rows have inconsistent lengths            |
    /// | [`TreeError::LabelCountMismatch`]    | `labels.len() != features.len()`          |
    /// | [`TreeError::NonFiniteValue`]        | any value is NaN or infinite              |
    /// | [`TreeError::InvalidCcpAlpha`]       | `ccp_alpha` is negative or not finite     |
    /// | [`TreeError::InvalidMaxDepth`]       | `max_depth` is `Some(0)`                  |
    /// | [`TreeError::InvalidMinSamplesSplit`]| `min_samples_split` < 2                   |
    /// | [`TreeError::InvalidMinSamplesLeaf`] | `min_samples_leaf` < 1                    |
    #[instrument(skip(self, features, labels), fields(n_samples = features.len(), ccp_alpha = self.ccp_alpha))]
    pub fn fit(&self, features: &[Vec<f64>], labels: &[usize]) -> Result<DecisionTree, TreeError> {
        let grown = self.grow(features, labels)?;
        let nodes = prune(grown.nodes, self.ccp_alpha);

        debug!(n_nodes = nodes.len(), "decision tree fitted");

        Ok(DecisionTree { nodes, ..grown })
    }

    /// Compute the cost-complexity pruning path of the fully grown tree.
    ///
    /// The configured `ccp_alpha` is ignored: the path always starts from
    /// the unpruned tree and ends when only the root remains.
    ///
    /// # Errors
    ///
    /// Same input and config validation as [`DecisionTreeConfig::fit`].
    #[instrument(skip(self, features, labels), fields(n_samples = features.len()))]
    pub fn pruning_path(
        &self,
        features: &[Vec<f64>],
        labels: &[usize],
    ) -> Result<PruningPath, TreeError> {
        let grown = self.grow(features, labels)?;
        Ok(pruning_path(&grown.nodes))
    }

    fn validate(&self, features: &[Vec<f64>], labels: &[usize]) -> Result<usize, TreeError> {
        if features.is_empty() {
            return Err(TreeError::EmptyDataset);
        }

        let n_features = features[0].len();
        if n_features == 0 {
            return Err(TreeError::ZeroFeatures);
        }

        if labels.len() != features.len() {
            return Err(TreeError::LabelCountMismatch {
                n_samples: features.len(),
                n_labels: labels.len(),
            });
        }

        for (sample_index, row) in features.iter().enumerate() {
            if row.len() != n_features {
                return Err(TreeError::FeatureCountMismatch {
                    expected: n_features,
                    got: row.len(),
                    sample_index,
                });
            }
            for (feature_index, &val) in row.iter().enumerate() {
                if !val.is_finite() {
                    return Err(TreeError::NonFiniteValue {
                        sample_index,
                        feature_index,
                    });
                }
            }
        }

        if !self.ccp_alpha.is_finite() || self.ccp_alpha < 0.0 {
            return Err(TreeError::InvalidCcpAlpha {
                ccp_alpha: self.ccp_alpha,
            });
        }

        if let Some(d) = self.max_depth
            && d == 0
        {
            return Err(TreeError::InvalidMaxDepth { max_depth: 0 });
        }

        if self.min_samples_split < 2 {
            return Err(TreeError::InvalidMinSamplesSplit {
                min_samples_split: self.min_samples_split,
            });
        }

        if self.min_samples_leaf < 1 {
            return Err(TreeError::InvalidMinSamplesLeaf {
                min_samples_leaf: self.min_samples_leaf,
            });
        }

        Ok(n_features)
    }

    /// Validate inputs and grow the unpruned tree.
    fn grow(&self, features: &[Vec<f64>], labels: &[usize]) -> Result<DecisionTree, TreeError> {
        let n_features = self.validate(features, labels)?;
        let n_samples = features.len();
        let (classes, encoded) = encode_labels(labels);
        let n_classes = classes.len();

        // Column-major layout for find_best_split.
        let col_features: Vec<Vec<f64>> = (0..n_features)
            .map(|feat_idx| features.iter().map(|row| row[feat_idx]).collect())
            .collect();

        let sample_indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut arena: Vec<Node> = Vec::new();

        let mut builder = Builder {
            col_features: &col_features,
            labels: &encoded,
            n_classes,
            config: self,
            rng: &mut rng,
            arena: &mut arena,
        };
        builder.build(&sample_indices, 0);

        debug!(n_samples, n_features, n_classes, n_nodes = arena.len(), "tree grown");

        Ok(DecisionTree {
            nodes: arena,
            n_features,
            classes,
        })
    }
}

/// Sorted distinct labels, and each label rewritten as its position among them.
fn encode_labels(labels: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let mut classes = labels.to_vec();
    classes.sort_unstable();
    classes.dedup();
    let encoded = labels
        .iter()
        .map(|label| classes.partition_point(|c| c < label))
        .collect();
    (classes, encoded)
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursive arena builder state.
struct Builder<'a, R> {
    col_features: &'a [Vec<f64>],
    labels: &'a [usize],
    n_classes: usize,
    config: &'a DecisionTreeConfig,
    rng: &'a mut R,
    arena: &'a mut Vec<Node>,
}

impl<R: rand::Rng> Builder<'_, R> {
    /// Build the subtree for `sample_indices` and return its arena index.
    fn build(&mut self, sample_indices: &[usize], depth: usize) -> NodeIndex {
        let n_samples = sample_indices.len();

        let mut class_counts = vec![0usize; self.n_classes];
        for &si in sample_indices {
            class_counts[self.labels[si]] += 1;
        }

        let impurity = gini(&class_counts, n_samples);

        let depth_exceeded = self.config.max_depth.is_some_and(|max_d| depth >= max_d);
        let too_few = n_samples < self.config.min_samples_split;
        let pure = impurity.value() == 0.0;

        let split = if too_few || pure || depth_exceeded {
            None
        } else {
            find_best_split(
                self.col_features,
                self.labels,
                sample_indices,
                &class_counts,
                self.config.min_samples_leaf,
                &mut *self.rng,
            )
        };

        let node_idx = self.arena.len();
        let Some(split) = split else {
            self.arena.push(Node::leaf(impurity, class_counts));
            return NodeIndex::new(node_idx);
        };

        // Reserve the index, recurse, then overwrite with the split.
        self.arena.push(Node::leaf(impurity, class_counts.clone()));
        let left = self.build(&split.left_indices, depth + 1);
        let right = self.build(&split.right_indices, depth + 1);

        self.arena[node_idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
            impurity,
            class_counts,
        };

        NodeIndex::new(node_idx)
    }
}

/// A fitted CART decision tree.
///
/// Stored as an arena-based `Vec<Node>` in pre-order with index references;
/// the root is always index 0. Class counts and leaf predictions inside the
/// arena are positions in [`DecisionTree::classes`].
#[derive(Debug, Clone)]
pub struct DecisionTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) n_features: usize,
    pub(crate) classes: Vec<usize>,
}

impl DecisionTree {
    /// Predict the class label for a single sample.
    ///
    /// Traverses from the root: at each `Split`, goes left when
    /// `sample[feature] <= threshold`, right otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict(&self, sample: &[f64]) -> Result<usize, TreeError> {
        if sample.len() != self.n_features {
            return Err(TreeError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { prediction, .. } => return Ok(self.classes[*prediction]),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    idx = if sample[feature.index()] <= *threshold {
                        left.index()
                    } else {
                        right.index()
                    };
                }
            }
        }
    }

    /// Predict class labels for a batch of samples.
    ///
    /// # Errors
    ///
    /// Returns the first [`TreeError::PredictionFeatureMismatch`] encountered.
    pub fn predict_batch(&self, samples: &[Vec<f64>]) -> Result<Vec<usize>, TreeError> {
        samples.iter().map(|s| self.predict(s)).collect()
    }

    /// Return the feature tested at the root, or `None` for a single-leaf tree.
    #[must_use]
    pub fn root_feature(&self) -> Option<FeatureIndex> {
        match self.nodes.first() {
            Some(Node::Split { feature, .. }) => Some(*feature),
            _ => None,
        }
    }

    /// Return the maximum depth of the tree.
    ///
    /// A single-node tree (just a root leaf) has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        let mut max_depth = 0usize;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((node_idx, d)) = stack.pop() {
            match &self.nodes[node_idx] {
                Node::Leaf { .. } => max_depth = max_depth.max(d),
                Node::Split { left, right, .. } => {
                    stack.push((left.index(), d + 1));
                    stack.push((right.index(), d + 1));
                }
            }
        }
        max_depth
    }

    /// Return the total number of nodes in the tree (both splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the number of feature columns the tree was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the number of distinct training labels.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Return the distinct training labels in ascending order.
    #[must_use]
    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// Return the node arena in pre-order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return a [`Display`](std::fmt::Display) rendering of the decision rules.
    ///
    /// `feature_names` should hold one name per feature column; missing
    /// names fall back to `feature_{index}`.
    #[must_use]
    pub fn render<'a>(&'a self, feature_names: &'a [String]) -> TreeText<'a> {
        TreeText::new(self, feature_names)
    }
}
