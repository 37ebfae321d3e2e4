//! Hierarchical (agglomerative) clustering.
//!
//! Bottom-up clustering that builds a **dendrogram** by iteratively
//! merging the closest clusters:
//!
//! 1. pick the closest pair `(i, j)` in the dissimilarity matrix,
//! 2. rewrite row/column `i` with the [`Linkage`] recurrence,
//! 3. record the merge and its height in the [`Dendrogram`],
//! 4. drop row/column `j` from the matrix,
//!
//! until `n_clusters` clusters remain.
//!
//! # Neighbor clustering
//!
//! [`NeighborClusterer`] only merges clusters that sit next to each other in
//! matrix order, which preserves a predetermined sequence (time, position
//! along a transect, ...). Under that constraint per-step heights can drop
//! sharply once a cheap neighbor appears, and cutting such a tree tends to
//! yield mostly singletons. Heights are therefore accumulated, and a
//! configuration that asks for the neighbor variant without `sum_ess` is
//! rejected instead of being silently corrected.
//!
//! # Merge heights
//!
//! With `sum_ess = false` the height of a merge is the selected matrix value.
//! With `sum_ess = true` it is the running sum of all selected values so far
//! (Ward, 1963). For Ward linkage over half squared Euclidean distances that
//! sum is the total error sum of squares of the partition.

use core::fmt;

use log::{debug, trace};

use super::linkage::Linkage;
use super::traits::{AgglomerativeClusterer, Clustering};
use crate::distance::Metric;
use crate::error::{Error, Result};
use crate::hierarchy::Dendrogram;
use crate::matrix::{Cell, DissimilarityMatrix};

/// Which pairs are eligible for merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeOrder {
    /// Any pair of live clusters.
    #[default]
    Unconstrained,
    /// Only clusters at adjacent matrix positions.
    Adjacent,
}

/// Hierarchical (agglomerative) clustering configuration.
#[derive(Debug, Clone)]
pub struct HierarchicalClustering {
    /// Number of clusters to produce.
    n_clusters: usize,
    /// Linkage method.
    linkage: Linkage,
    /// Distance used when building the matrix from vectors.
    metric: Metric,
    /// Accumulate merge heights.
    sum_ess: bool,
    /// Eligible merge pairs.
    order: MergeOrder,
}

impl HierarchicalClustering {
    /// Create a new hierarchical clusterer.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            linkage: Linkage::Ward,
            metric: Metric::Euclidean,
            sum_ess: false,
            order: MergeOrder::Unconstrained,
        }
    }

    /// Set linkage method.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Set the distance used by [`fit_dendrogram`](Self::fit_dendrogram).
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Report cumulative rather than per-step merge heights.
    pub fn with_sum_ess(mut self, sum_ess: bool) -> Self {
        self.sum_ess = sum_ess;
        self
    }

    /// Restrict which pairs may merge.
    pub fn with_order(mut self, order: MergeOrder) -> Self {
        self.order = order;
        self
    }

    /// Linkage method.
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Distance metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Whether heights accumulate.
    pub fn sum_ess(&self) -> bool {
        self.sum_ess
    }

    /// Merge order.
    pub fn order(&self) -> MergeOrder {
        self.order
    }

    /// Check the configuration against a dataset of `n_items` items.
    pub fn validate(&self, n_items: usize) -> Result<()> {
        if self.n_clusters == 0 || self.n_clusters > n_items {
            return Err(Error::InvalidClusterCount {
                requested: self.n_clusters,
                n_items,
            });
        }
        if self.order == MergeOrder::Adjacent && !self.sum_ess {
            return Err(Error::InvalidParameter {
                name: "sum_ess",
                message: "neighbor clustering requires cumulative merge heights",
            });
        }
        Ok(())
    }

    /// Create the clusterer matching the configured merge order.
    pub fn build(&self, matrix: DissimilarityMatrix) -> Result<Box<dyn AgglomerativeClusterer>> {
        Ok(match self.order {
            MergeOrder::Unconstrained => Box::new(Clusterer::new(matrix, self)?),
            MergeOrder::Adjacent => Box::new(NeighborClusterer::new(matrix, self)?),
        })
    }

    /// Fit and return the full dendrogram (down to `n_clusters`).
    pub fn fit_dendrogram(&self, data: &[Vec<f64>]) -> Result<Dendrogram> {
        let metric = self.metric;
        let matrix = DissimilarityMatrix::from_vectors(data, |a, b| metric.distance(a, b))?;
        let mut clusterer = self.build(matrix)?;
        clusterer.cluster()?;
        Ok(clusterer.dendrogram().clone())
    }
}

impl Clustering for HierarchicalClustering {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        let dendro = self.fit_dendrogram(data)?;
        dendro.labels(self.n_clusters)
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}

impl fmt::Display for HierarchicalClustering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HierarchicalClustering(linkage={}, n_clusters={}, order={:?}, sum_ess={})",
            self.linkage, self.n_clusters, self.order, self.sum_ess
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Running,
    Done,
}

/// State of one agglomerative run, shared by both clusterers.
#[derive(Debug, Clone)]
struct Agglomeration {
    matrix: DissimilarityMatrix,
    dendrogram: Dendrogram,
    linkage: Linkage,
    n_clusters: usize,
    sum_ess: bool,
    state: RunState,
}

impl Agglomeration {
    fn new(matrix: DissimilarityMatrix, config: &HierarchicalClustering) -> Result<Self> {
        config.validate(matrix.size())?;
        Ok(Self {
            dendrogram: Dendrogram::new(matrix.size()),
            matrix,
            linkage: config.linkage,
            n_clusters: config.n_clusters,
            sum_ess: config.sum_ess,
            state: RunState::Running,
        })
    }

    fn run(&mut self, select: impl Fn(&DissimilarityMatrix) -> Result<Cell>) -> Result<()> {
        if self.state == RunState::Done {
            return Ok(());
        }
        debug!(
            "agglomerating {} items with {} linkage down to {} cluster(s)",
            self.matrix.size(),
            self.linkage,
            self.n_clusters
        );

        let mut summed = 0.0;
        while self.matrix.size() > self.n_clusters {
            let Cell { value, row, col } = select(&self.matrix)?;
            let height = if self.sum_ess {
                summed += value;
                summed
            } else {
                value
            };

            let sizes = self.dendrogram.sizes();
            self.linkage.update(&mut self.matrix, row, col, &sizes)?;
            let node = self.dendrogram.merge(row, col)?;
            self.dendrogram.set_height(node, height)?;
            self.matrix = self.matrix.remove(col)?;

            trace!(
                "k={} merged positions ({row}, {col}) into node {node} at height {height}",
                self.matrix.size()
            );
        }

        self.state = RunState::Done;
        debug!("done after {} merges", self.dendrogram.n_merges());
        Ok(())
    }
}

/// Agglomerative clusterer that may merge any pair of clusters.
#[derive(Debug, Clone)]
pub struct Clusterer {
    run: Agglomeration,
}

impl Clusterer {
    /// Prepare a run over `matrix` with the given configuration.
    ///
    /// The configured [`MergeOrder`] is ignored (and so is the neighbor-only
    /// `sum_ess` rule); use [`HierarchicalClustering::build`] to dispatch on it.
    pub fn new(matrix: DissimilarityMatrix, config: &HierarchicalClustering) -> Result<Self> {
        let config = config.clone().with_order(MergeOrder::Unconstrained);
        Ok(Self {
            run: Agglomeration::new(matrix, &config)?,
        })
    }

    /// Linkage method used by this run.
    pub fn linkage(&self) -> Linkage {
        self.run.linkage
    }
}

impl AgglomerativeClusterer for Clusterer {
    fn cluster(&mut self) -> Result<()> {
        self.run.run(DissimilarityMatrix::minimum_cell)
    }

    fn dendrogram(&self) -> &Dendrogram {
        &self.run.dendrogram
    }

    fn num_clusters(&self) -> usize {
        self.run.n_clusters
    }

    fn matrix(&self) -> &DissimilarityMatrix {
        &self.run.matrix
    }

    fn is_done(&self) -> bool {
        self.run.state == RunState::Done
    }
}

/// Agglomerative clusterer restricted to merging adjacent clusters.
#[derive(Debug, Clone)]
pub struct NeighborClusterer {
    run: Agglomeration,
}

impl NeighborClusterer {
    /// Prepare a neighbor run over `matrix`.
    ///
    /// Fails with [`Error::InvalidParameter`] unless `config` enables `sum_ess`.
    pub fn new(matrix: DissimilarityMatrix, config: &HierarchicalClustering) -> Result<Self> {
        let config = config.clone().with_order(MergeOrder::Adjacent);
        Ok(Self {
            run: Agglomeration::new(matrix, &config)?,
        })
    }

    /// Linkage method used by this run.
    pub fn linkage(&self) -> Linkage {
        self.run.linkage
    }
}

impl AgglomerativeClusterer for NeighborClusterer {
    fn cluster(&mut self) -> Result<()> {
        self.run.run(DissimilarityMatrix::adjacent_minimum)
    }

    fn dendrogram(&self) -> &Dendrogram {
        &self.run.dendrogram
    }

    fn num_clusters(&self) -> usize {
        self.run.n_clusters
    }

    fn matrix(&self) -> &DissimilarityMatrix {
        &self.run.matrix
    }

    fn is_done(&self) -> bool {
        self.run.state == RunState::Done
    }
}
