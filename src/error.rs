use thiserror::Error;

/// Result alias for `agglo`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by matrix construction, linkage updates, and clustering runs.
///
/// Every variant is terminal for the current run: clustering is a deterministic
/// numeric procedure, so nothing here is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Malformed construction input (too few items, bad diagonal, non-finite cell, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Vectors or rows have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// A pre-built matrix is not symmetric within tolerance.
    #[error("matrix is not symmetric at ({row}, {col})")]
    NotSymmetric {
        /// Row of the first offending cell.
        row: usize,
        /// Column of the first offending cell.
        col: usize,
    },

    /// Minimum search on a matrix with no off-diagonal cell.
    #[error("matrix of size {size} has no off-diagonal cell")]
    EmptyMatrix {
        /// Size of the matrix.
        size: usize,
    },

    /// Merge requested on identical or non-live positions.
    #[error("invalid merge of positions {left} and {right}: {reason}")]
    InvalidMerge {
        /// First position.
        left: usize,
        /// Second position.
        right: usize,
        /// Why the merge was rejected.
        reason: &'static str,
    },

    /// Dendrogram node lookup or height assignment failed.
    #[error("invalid dendrogram node {node}: {reason}")]
    InvalidNode {
        /// Node id.
        node: usize,
        /// Why the node was rejected.
        reason: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("cannot create {requested} clusters from {n_items} items")]
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Invalid configuration value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },
}

impl Error {
    /// True for the construction-input family (`InvalidInput`, `DimensionMismatch`,
    /// `NotSymmetric`).
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::DimensionMismatch { .. } | Error::NotSymmetric { .. }
        )
    }

    /// True for the configuration family (`InvalidClusterCount`, `InvalidParameter`).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidClusterCount { .. } | Error::InvalidParameter { .. }
        )
    }
}
