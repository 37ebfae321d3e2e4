//! Dendrogram for hierarchical clustering.
//!
//! A dendrogram records the nested structure of clusters produced by
//! agglomerative (bottom-up) clustering.
//!
//! Node ids follow the SciPy/MATLAB convention:
//! - leaves: `0..n-1`
//! - merge `m` creates node `n + m`
//!
//! Besides the tree itself, the dendrogram tracks which node each *live
//! matrix position* represents. [`Dendrogram::merge`] retires a position the
//! same way [`DissimilarityMatrix::remove`](crate::DissimilarityMatrix::remove)
//! drops a row, so positions and nodes stay aligned for the whole run.

use std::collections::BTreeSet;

use super::node::Node;
use crate::error::{Error, Result};

/// A dendrogram representing hierarchical cluster merges.
#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram {
    /// Leaves followed by one internal node per merge.
    nodes: Vec<Node>,
    /// Merge history, in order.
    merges: Vec<Merge>,
    /// Node id at each live matrix position.
    live: Vec<usize>,
    /// Number of original items.
    n_items: usize,
}

/// A single merge operation in the dendrogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    /// Node at the surviving position.
    pub cluster_a: usize,
    /// Node at the retired position.
    pub cluster_b: usize,
    /// Surviving matrix position at merge time.
    pub position_a: usize,
    /// Retired matrix position at merge time.
    pub position_b: usize,
    /// Node created by this merge.
    pub node: usize,
    /// Size of resulting cluster.
    pub size: usize,
}

impl Dendrogram {
    /// Create a dendrogram with `n_items` singleton leaves at positions `0..n_items`.
    pub fn new(n_items: usize) -> Self {
        let mut nodes = Vec::with_capacity((2 * n_items).saturating_sub(1));
        nodes.extend((0..n_items).map(Node::leaf));
        Self {
            nodes,
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            live: (0..n_items).collect(),
            n_items,
        }
    }

    /// Merge the clusters at live positions `i` and `j`.
    ///
    /// Position `i` now refers to the new node; position `j` is retired and
    /// later positions shift down by one. Returns the new node id.
    pub fn merge(&mut self, i: usize, j: usize) -> Result<usize> {
        if i == j {
            return Err(Error::InvalidMerge {
                left: i,
                right: j,
                reason: "cannot merge a cluster with itself",
            });
        }
        if i >= self.live.len() || j >= self.live.len() {
            return Err(Error::InvalidMerge {
                left: i,
                right: j,
                reason: "position is not live",
            });
        }

        let (a, b) = (self.live[i], self.live[j]);
        let id = self.nodes.len();
        let node = Node::internal(id, &self.nodes[a], &self.nodes[b]);
        let size = node.size();
        self.nodes.push(node);

        self.live[i] = id;
        self.live.remove(j);

        self.merges.push(Merge {
            cluster_a: a,
            cluster_b: b,
            position_a: i,
            position_b: j,
            node: id,
            size,
        });
        Ok(id)
    }

    /// Record the merge height of the most recently created node.
    ///
    /// Heights are written once, right after the merge that created the node.
    pub fn set_height(&mut self, node: usize, height: f64) -> Result<()> {
        let latest = self.nodes.len().saturating_sub(1);
        let target = self.nodes.get_mut(node).ok_or(Error::InvalidNode {
            node,
            reason: "no such node",
        })?;
        if target.is_leaf() {
            return Err(Error::InvalidNode {
                node,
                reason: "leaves have no merge height",
            });
        }
        if target.height.is_some() {
            return Err(Error::InvalidNode {
                node,
                reason: "height already set",
            });
        }
        if node != latest {
            return Err(Error::InvalidNode {
                node,
                reason: "only the most recent merge can take a height",
            });
        }
        target.height = Some(height);
        Ok(())
    }

    /// Member sets after the first `n - k` merges, ordered by smallest member.
    pub fn extract_clusters(&self, k: usize) -> Result<Vec<Vec<usize>>> {
        if k == 0 || k > self.n_items || self.n_items - k > self.merges.len() {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_items: self.n_items,
            });
        }

        let mut roots: BTreeSet<usize> = (0..self.n_items).collect();
        for merge in &self.merges[..self.n_items - k] {
            roots.remove(&merge.cluster_a);
            roots.remove(&merge.cluster_b);
            roots.insert(merge.node);
        }

        let mut clusters: Vec<Vec<usize>> = roots
            .into_iter()
            .map(|id| self.nodes[id].members.clone())
            .collect();
        clusters.sort_by_key(|members| members[0]);
        Ok(clusters)
    }

    /// Flat cluster label per item for a cut into `k` clusters.
    ///
    /// Labels are numbered in order of each cluster's smallest member.
    pub fn labels(&self, k: usize) -> Result<Vec<usize>> {
        let clusters = self.extract_clusters(k)?;
        let mut labels = vec![0; self.n_items];
        for (label, members) in clusters.iter().enumerate() {
            for &item in members {
                labels[item] = label;
            }
        }
        Ok(labels)
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Iterate over merges.
    pub fn merges(&self) -> impl Iterator<Item = &Merge> {
        self.merges.iter()
    }

    /// Look up a node by id.
    pub fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Iterate over all nodes, leaves first.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// The single remaining cluster, once everything has been merged.
    pub fn root(&self) -> Option<&Node> {
        match self.live.as_slice() {
            [id] => self.nodes.get(*id),
            _ => None,
        }
    }

    /// Node ids at the live matrix positions.
    pub fn live_nodes(&self) -> &[usize] {
        &self.live
    }

    /// Cluster size at every live matrix position.
    pub fn sizes(&self) -> Vec<usize> {
        self.live.iter().map(|&id| self.nodes[id].size()).collect()
    }

    /// Merge heights in merge order; `NaN` where no height was recorded.
    pub fn heights(&self) -> Vec<f64> {
        self.merges
            .iter()
            .map(|m| self.nodes[m.node].height.unwrap_or(f64::NAN))
            .collect()
    }

    /// SciPy-style linkage rows: `(cluster_a, cluster_b, height, size)`.
    pub fn linkage_matrix(&self) -> Vec<(usize, usize, f64, usize)> {
        self.merges
            .iter()
            .zip(self.heights())
            .map(|(m, h)| (m.cluster_a, m.cluster_b, h, m.size))
            .collect()
    }
}
