//! Dendrogram tree node.

use core::fmt;

/// A node in a dendrogram.
///
/// Leaves hold one original item; internal nodes are created by a merge and
/// hold the union of their children's members.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node id: `0..n` for leaves, `n + m` for the node created by merge `m`.
    pub id: usize,
    /// Child node ids (`None` for leaves).
    pub children: Option<(usize, usize)>,
    /// Merge height, written once after the merge.
    pub height: Option<f64>,
    /// Original item ids under this node, sorted.
    pub members: Vec<usize>,
}

impl Node {
    /// Create a leaf for item `id`.
    pub fn leaf(id: usize) -> Self {
        Self {
            id,
            children: None,
            height: None,
            members: vec![id],
        }
    }

    /// Create an internal node from two children.
    pub(crate) fn internal(id: usize, left: &Node, right: &Node) -> Self {
        let mut members = Vec::with_capacity(left.members.len() + right.members.len());
        members.extend_from_slice(&left.members);
        members.extend_from_slice(&right.members);
        members.sort_unstable();
        Self {
            id,
            children: Some((left.id, right.id)),
            height: None,
            members,
        }
    }

    /// Check if this is a leaf node.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Number of original items under this node.
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.children, self.height) {
            (None, _) => write!(f, "Leaf[{}]", self.id),
            (Some((a, b)), Some(h)) => write!(f, "Node[{}] ({a}, {b}) h={h}", self.id),
            (Some((a, b)), None) => write!(f, "Node[{}] ({a}, {b})", self.id),
        }
    }
}
