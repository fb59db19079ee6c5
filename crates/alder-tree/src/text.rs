//! Plain-text rendering of decision rules.

use std::fmt;

use crate::node::Node;
use crate::tree::DecisionTree;

/// Indented rule listing for a fitted tree, one line per branch.
///
/// ```text
/// |--- amount <= 120.50
/// |   |--- class: 0
/// |--- amount >  120.50
/// |   |--- class: 1
/// ```
pub struct TreeText<'a> {
    tree: &'a DecisionTree,
    feature_names: &'a [String],
}

impl<'a> TreeText<'a> {
    pub(crate) fn new(tree: &'a DecisionTree, feature_names: &'a [String]) -> Self {
        Self {
            tree,
            feature_names,
        }
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, idx: usize, depth: usize) -> fmt::Result {
        let indent = "|   ".repeat(depth);
        match &self.tree.nodes[idx] {
            Node::Leaf { prediction, .. } => {
                writeln!(f, "{indent}|--- class: {}", self.tree.classes[*prediction])
            }
            Node::Split {
                feature,
                threshold,
                left,
                right,
                ..
            } => {
                let name = self
                    .feature_names
                    .get(feature.index())
                    .cloned()
                    .unwrap_or_else(|| format!("feature_{}", feature.index()));
                writeln!(f, "{indent}|--- {name} <= {threshold:.2}")?;
                self.write_node(f, left.index(), depth + 1)?;
                writeln!(f, "{indent}|--- {name} >  {threshold:.2}")?;
                self.write_node(f, right.index(), depth + 1)
            }
        }
    }
}

impl fmt::Display for TreeText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tree.nodes.is_empty() {
            return Ok(());
        }
        self.write_node(f, 0, 0)
    }
}
