//! Minimal cost-complexity pruning.
//!
//! The risk of a node as a leaf is `R(t) = impurity(t) * n_t / N`, where `N`
//! is the number of training samples at the root. For an interior node the
//! effective alpha is
//!
//! ```text
//! g(t) = (R(t) - R(T_t)) / (|leaves(T_t)| - 1)
//! ```
//!
//! with `R(T_t)` the summed risk of the leaves below `t`. Pruning repeatedly
//! collapses the weakest link (smallest `g`, lowest arena index on ties)
//! until the weakest link exceeds `ccp_alpha`.

use crate::node::{Node, NodeIndex};

/// The sequence of effective alphas visited while pruning a tree down to its root.
///
/// `ccp_alphas[0]` is always `0.0` (the unpruned tree). `impurities[i]` is the
/// summed weighted leaf impurity of the subtree obtained once every weakest
/// link with effective alpha up to `ccp_alphas[i]` has been collapsed.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PruningPath {
    /// Effective alphas in non-decreasing order.
    pub ccp_alphas: Vec<f64>,
    /// Total leaf impurity after each pruning step.
    pub impurities: Vec<f64>,
}

impl PruningPath {
    /// Return the number of steps on the path, including the unpruned tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ccp_alphas.len()
    }

    /// Return `true` if the path has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ccp_alphas.is_empty()
    }
}

/// Collapse state over a fully grown arena.
struct Pruner<'a> {
    nodes: &'a [Node],
    collapsed: Vec<bool>,
    n_total: f64,
}

impl<'a> Pruner<'a> {
    fn new(nodes: &'a [Node]) -> Self {
        let n_total = nodes.first().map_or(0, Node::n_samples) as f64;
        Self {
            nodes,
            collapsed: vec![false; nodes.len()],
            n_total,
        }
    }

    fn node_risk(&self, idx: usize) -> f64 {
        let node = &self.nodes[idx];
        if self.n_total == 0.0 {
            return 0.0;
        }
        node.impurity().value() * node.n_samples() as f64 / self.n_total
    }

    fn is_interior(&self, idx: usize) -> bool {
        !self.collapsed[idx] && !self.nodes[idx].is_leaf()
    }

    /// Return `(n_leaves, branch_risk)` for the subtree at `idx`, pushing every
    /// interior node's effective alpha onto `candidates`.
    fn walk(&self, idx: usize, candidates: &mut Vec<(usize, f64)>) -> (usize, f64) {
        match &self.nodes[idx] {
            Node::Split { left, right, .. } if self.is_interior(idx) => {
                let (left_leaves, left_risk) = self.walk(left.index(), candidates);
                let (right_leaves, right_risk) = self.walk(right.index(), candidates);
                let n_leaves = left_leaves + right_leaves;
                let branch_risk = left_risk + right_risk;
                let alpha = (self.node_risk(idx) - branch_risk) / (n_leaves as f64 - 1.0);
                candidates.push((idx, alpha));
                (n_leaves, branch_risk)
            }
            _ => (1, self.node_risk(idx)),
        }
    }

    /// Return the interior node with the smallest effective alpha, if any remain.
    fn weakest_link(&self) -> Option<(usize, f64)> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut candidates = Vec::new();
        self.walk(0, &mut candidates);
        candidates
            .into_iter()
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
    }

    fn total_leaf_risk(&self) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        let mut scratch = Vec::new();
        self.walk(0, &mut scratch).1
    }

    fn collapse(&mut self, idx: usize) {
        self.collapsed[idx] = true;
    }

    /// Copy the reachable, uncollapsed tree into a fresh pre-order arena.
    fn rebuild(&self, idx: usize, out: &mut Vec<Node>) -> NodeIndex {
        let node_idx = out.len();
        match &self.nodes[idx] {
            Node::Split {
                feature,
                threshold,
                left,
                right,
                impurity,
                class_counts,
            } if self.is_interior(idx) => {
                out.push(Node::leaf(*impurity, class_counts.clone()));
                let new_left = self.rebuild(left.index(), out);
                let new_right = self.rebuild(right.index(), out);
                out[node_idx] = Node::Split {
                    feature: *feature,
                    threshold: *threshold,
                    left: new_left,
                    right: new_right,
                    impurity: *impurity,
                    class_counts: class_counts.clone(),
                };
            }
            node => out.push(Node::leaf(node.impurity(), node.class_counts().to_vec())),
        }
        NodeIndex::new(node_idx)
    }
}

/// Prune a fully grown arena with the given complexity parameter.
///
/// A `ccp_alpha` of zero leaves the tree untouched.
pub(crate) fn prune(nodes: Vec<Node>, ccp_alpha: f64) -> Vec<Node> {
    if ccp_alpha <= 0.0 || nodes.len() <= 1 {
        return nodes;
    }

    let mut pruner = Pruner::new(&nodes);
    let mut n_collapsed = 0usize;
    while let Some((idx, alpha)) = pruner.weakest_link() {
        if alpha > ccp_alpha {
            break;
        }
        pruner.collapse(idx);
        n_collapsed += 1;
    }

    if n_collapsed == 0 {
        return nodes;
    }

    let mut out = Vec::with_capacity(nodes.len());
    pruner.rebuild(0, &mut out);
    tracing::trace!(n_collapsed, n_nodes = out.len(), "tree pruned");
    out
}

/// Walk the weakest-link sequence from the full tree down to the root.
pub(crate) fn pruning_path(nodes: &[Node]) -> PruningPath {
    let mut pruner = Pruner::new(nodes);
    let mut ccp_alphas = vec![0.0];
    let mut impurities = vec![pruner.total_leaf_risk()];

    while let Some((idx, alpha)) = pruner.weakest_link() {
        pruner.collapse(idx);
        // Rounding can leave a zero-gain link a hair below zero.
        ccp_alphas.push(alpha.max(0.0));
        impurities.push(pruner.total_leaf_risk());
    }

    PruningPath {
        ccp_alphas,
        impurities,
    }
}

#[cfg(test)]
mod tests {
    use super::{prune, pruning_path};
    use crate::node::{FeatureIndex, Impurity, Node, NodeIndex};

    /// Root splits 10 samples (6/4) into a pure left leaf (5/0) and a right
    /// split that separates the remaining 5 samples (1/4).
    ///
    /// Gini: root = 0.48, right = 0.32.
    /// R(root) = 0.48, R(right) = 0.32 * 5 / 10 = 0.16, leaves are pure.
    /// g(right) = 0.16, g(root) = 0.48 / 2 = 0.24 before and
    /// (0.48 - 0.16) / 1 = 0.32 after the right split collapses.
    fn two_level_tree() -> Vec<Node> {
        vec![
            Node::Split {
                feature: FeatureIndex::new(0),
                threshold: 1.5,
                left: NodeIndex::new(1),
                right: NodeIndex::new(2),
                impurity: Impurity::new(0.48),
                class_counts: vec![6, 4],
            },
            Node::leaf(Impurity::new(0.0), vec![5, 0]),
            Node::Split {
                feature: FeatureIndex::new(1),
                threshold: 0.5,
                left: NodeIndex::new(3),
                right: NodeIndex::new(4),
                impurity: Impurity::new(0.32),
                class_counts: vec![1, 4],
            },
            Node::leaf(Impurity::new(0.0), vec![1, 0]),
            Node::leaf(Impurity::new(0.0), vec![0, 4]),
        ]
    }

    #[test]
    fn zero_alpha_keeps_tree() {
        let pruned = prune(two_level_tree(), 0.0);
        assert_eq!(pruned.len(), 5);
    }

    #[test]
    fn alpha_below_weakest_link_keeps_tree() {
        let pruned = prune(two_level_tree(), 0.1);
        assert_eq!(pruned.len(), 5);
    }

    #[test]
    fn alpha_between_links_collapses_lower_split() {
        let pruned = prune(two_level_tree(), 0.2);
        assert_eq!(pruned.len(), 3);
        assert!(!pruned[0].is_leaf());
        match &pruned[2] {
            Node::Leaf { prediction, class_counts, .. } => {
                assert_eq!(*prediction, 1);
                assert_eq!(class_counts, &vec![1, 4]);
            }
            Node::Split { .. } => panic!("right child should be a leaf"),
        }
    }

    #[test]
    fn large_alpha_collapses_to_root() {
        let pruned = prune(two_level_tree(), 0.5);
        assert_eq!(pruned.len(), 1);
        assert!(pruned[0].is_leaf());
    }

    #[test]
    fn path_lists_each_weakest_link() {
        let path = pruning_path(&two_level_tree());
        assert_eq!(path.len(), 3);
        assert!((path.ccp_alphas[0] - 0.0).abs() < 1e-12);
        assert!((path.ccp_alphas[1] - 0.16).abs() < 1e-12);
        assert!((path.ccp_alphas[2] - 0.32).abs() < 1e-12);
        assert!((path.impurities[0] - 0.0).abs() < 1e-12);
        assert!((path.impurities[1] - 0.16).abs() < 1e-12);
        assert!((path.impurities[2] - 0.48).abs() < 1e-12);
    }

    #[test]
    fn path_of_single_leaf() {
        let path = pruning_path(&[Node::leaf(Impurity::new(0.5), vec![2, 2])]);
        assert_eq!(path.ccp_alphas, vec![0.0]);
        assert!((path.impurities[0] - 0.5).abs() < 1e-12);
    }
}
