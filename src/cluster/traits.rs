//! Clustering traits.

use crate::error::Result;
use crate::hierarchy::Dendrogram;
use crate::matrix::DissimilarityMatrix;

/// Trait for flat clustering algorithms.
pub trait Clustering {
    /// Fit the model to data and return cluster assignments.
    ///
    /// Returns a vector of cluster labels, one per input point.
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>>;

    /// Get the number of clusters.
    fn n_clusters(&self) -> usize;
}

/// Capability shared by the agglomerative clusterers.
///
/// A clusterer owns its matrix and dendrogram for one run. [`cluster`](Self::cluster)
/// runs to completion; calling it again afterwards is a no-op.
pub trait AgglomerativeClusterer {
    /// Merge until the configured number of clusters remains.
    fn cluster(&mut self) -> Result<()>;

    /// Merge history accumulated so far.
    fn dendrogram(&self) -> &Dendrogram;

    /// Configured target number of clusters.
    fn num_clusters(&self) -> usize;

    /// The matrix as it currently stands (after [`cluster`](Self::cluster):
    /// distances between the remaining clusters).
    fn matrix(&self) -> &DissimilarityMatrix;

    /// Whether the run has finished.
    fn is_done(&self) -> bool;
}
