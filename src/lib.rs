//! # agglo
//!
//! Hierarchical agglomerative clustering: a shrinking dissimilarity matrix,
//! Lance-Williams linkage updates, and the dendrogram that records every merge.
//!
//! ```rust
//! use agglo::{AgglomerativeClusterer, Clusterer, DissimilarityMatrix, HierarchicalClustering};
//!
//! let vectors = vec![
//!     vec![2.0, 4.0], vec![0.0, 1.0], vec![1.0, 1.0],
//!     vec![3.0, 2.0], vec![4.0, 0.0], vec![2.0, 2.0],
//! ];
//! // Half squared Euclidean distance: the ESS increase of merging two points.
//! let matrix = DissimilarityMatrix::from_vectors(&vectors, |a, b| {
//!     agglo::distance::squared_euclidean(a, b) / 2.0
//! })
//! .unwrap();
//!
//! let mut clusterer = Clusterer::new(matrix, &HierarchicalClustering::new(1)).unwrap();
//! clusterer.cluster().unwrap();
//!
//! let root = clusterer.dendrogram().root().unwrap();
//! assert_eq!(root.members, vec![0, 1, 2, 3, 4, 5]);
//! ```
//!
//! Optional features:
//! - `parallel`: compute the initial pairwise distances on rayon.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod distance;
/// Error types used across `agglo`.
pub mod error;
pub mod hierarchy;
pub mod matrix;


pub use cluster::{
    AgglomerativeClusterer, Clusterer, Clustering, HierarchicalClustering, Linkage, MergeOrder,
    NeighborClusterer,
};
pub use distance::Metric;
pub use error::{Error, Result};
pub use hierarchy::{Dendrogram, Merge, Node};
pub use matrix::{Cell, DissimilarityMatrix};
