//! Agglomerative clustering over a dissimilarity matrix.
//!
//! Bottom-up: start with each item as its own cluster, repeatedly merge
//! the two closest clusters until the target count remains. The merge
//! history forms a **dendrogram**, a binary tree you can cut to get any
//! coarser number of clusters.
//!
//! **Linkage methods** determine "distance between clusters":
//!
//! | Linkage | Distance | Effect |
//! |---------|----------|--------|
//! | Single | min(pairwise) | Chaining; elongated clusters |
//! | Complete | max(pairwise) | Compact, spherical clusters |
//! | Average | mean(pairwise) | Balanced compromise |
//! | Median | midpoint of merged centroids | Robust to unequal sizes |
//! | Centroid | distance between centroids | Can invert heights |
//! | Ward | Variance increase | Minimizes within-cluster variance |
//!
//! ## Usage
//!
//! ```rust
//! use agglo::cluster::{AgglomerativeClusterer, Clusterer, HierarchicalClustering, Linkage};
//! use agglo::DissimilarityMatrix;
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//! let matrix = DissimilarityMatrix::from_vectors(&data, agglo::distance::euclidean).unwrap();
//!
//! let config = HierarchicalClustering::new(1).with_linkage(Linkage::Average);
//! let mut clusterer = Clusterer::new(matrix, &config).unwrap();
//! clusterer.cluster().unwrap();
//!
//! let dendro = clusterer.dendrogram();
//! assert_eq!(dendro.n_merges(), 3);
//! assert_eq!(dendro.extract_clusters(2).unwrap(), vec![vec![0, 1], vec![2, 3]]);
//! ```

mod hierarchical;
mod linkage;
mod traits;

pub use hierarchical::{Clusterer, HierarchicalClustering, MergeOrder, NeighborClusterer};
pub use linkage::Linkage;
pub use traits::{AgglomerativeClusterer, Clustering};
