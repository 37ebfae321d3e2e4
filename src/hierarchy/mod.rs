//! Merge trees produced by agglomerative clustering.
//!
//! A [`Dendrogram`] records the complete merge history:
//!
//! ```text
//!         6 (height=1.0)
//!        / \
//!       4   5 (height=0.7)
//!      / \ / \
//!     0  1 2  3 (leaves)
//! ```
//!
//! Key property: undo the last `m` merges to get `m + 1` clusters
//! ([`Dendrogram::extract_clusters`]).

mod dendrogram;
mod node;

pub use dendrogram::{Dendrogram, Merge};
pub use node::Node;
