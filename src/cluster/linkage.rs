//! Lance-Williams linkage updates.
//!
//! After clusters `i` and `j` merge, the distance from the merged cluster to
//! every other live cluster `k` is computed from the *old* matrix alone:
//!
//! ```text
//! d(ij, k) = αᵢ·d(i,k) + αⱼ·d(j,k) + β·d(i,j) + γ·|d(i,k) − d(j,k)|
//! ```
//!
//! | Linkage | αᵢ | αⱼ | β | γ |
//! |---------|----|----|---|---|
//! | Single | ½ | ½ | 0 | −½ |
//! | Complete | ½ | ½ | 0 | ½ |
//! | Average | nᵢ/nᵢⱼ | nⱼ/nᵢⱼ | 0 | 0 |
//! | Median | ½ | ½ | −¼ | 0 |
//! | Centroid | nᵢ/nᵢⱼ | nⱼ/nᵢⱼ | −nᵢnⱼ/nᵢⱼ² | 0 |
//! | Ward | (nᵢ+nₖ)/nᵢⱼₖ | (nⱼ+nₖ)/nᵢⱼₖ | −nₖ/nᵢⱼₖ | 0 |
//!
//! Each update is O(k) for a matrix of size k; raw vectors are never revisited.
//!
//! Median and centroid assume squared Euclidean input to be geometrically
//! meaningful, and neither is monotone: a later merge can sit lower than an
//! earlier one. Ward on half squared Euclidean distances yields the increase
//! in error sum of squares (ESS) at every step.

use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};
use crate::matrix::DissimilarityMatrix;

/// Linkage method for hierarchical clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Linkage {
    /// Single linkage: minimum distance between clusters.
    Single,
    /// Complete linkage: maximum distance between clusters.
    Complete,
    /// Average linkage (UPGMA): size-weighted mean distance.
    Average,
    /// Median linkage (WPGMC).
    Median,
    /// Centroid linkage (UPGMC).
    Centroid,
    /// Ward's method: minimize the increase in within-cluster variance.
    #[default]
    Ward,
}

impl Linkage {
    /// Distance from the merge of `i` and `j` to a third cluster `k`.
    ///
    /// `d_ik`, `d_jk`, `d_ij` are the pre-merge distances; `n_*` are cluster sizes.
    #[inline]
    pub fn merged_distance(
        &self,
        d_ik: f64,
        d_jk: f64,
        d_ij: f64,
        n_i: usize,
        n_j: usize,
        n_k: usize,
    ) -> f64 {
        let (ni, nj, nk) = (n_i as f64, n_j as f64, n_k as f64);
        match self {
            Linkage::Single => d_ik.min(d_jk),
            Linkage::Complete => d_ik.max(d_jk),
            Linkage::Average => (ni * d_ik + nj * d_jk) / (ni + nj),
            Linkage::Median => (d_ik + d_jk) / 2.0 - d_ij / 4.0,
            Linkage::Centroid => {
                let nij = ni + nj;
                (ni * d_ik + nj * d_jk) / nij - (ni * nj * d_ij) / (nij * nij)
            }
            Linkage::Ward => {
                ((ni + nk) * d_ik + (nj + nk) * d_jk - nk * d_ij) / (ni + nj + nk)
            }
        }
    }

    /// Rewrite row and column `i` so they hold distances to the merge of `i` and `j`.
    ///
    /// `sizes[p]` is the member count of the cluster at matrix position `p`.
    /// Row/column `j` is left as is; the caller removes it afterwards.
    pub fn update(
        &self,
        matrix: &mut DissimilarityMatrix,
        i: usize,
        j: usize,
        sizes: &[usize],
    ) -> Result<()> {
        let n = matrix.size();
        if i == j {
            return Err(Error::InvalidMerge {
                left: i,
                right: j,
                reason: "cannot merge a cluster with itself",
            });
        }
        if i >= n || j >= n {
            return Err(Error::InvalidMerge {
                left: i,
                right: j,
                reason: "position out of range",
            });
        }
        if sizes.len() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: sizes.len(),
            });
        }

        let cells = matrix.as_array();
        let d_ij = cells[[i, j]];
        let (n_i, n_j) = (sizes[i], sizes[j]);

        let updated: Vec<f64> = (0..n)
            .map(|k| {
                if k == i || k == j {
                    // i: diagonal, ignored by set_row. j: retired right after.
                    cells[[i, k]]
                } else {
                    self.merged_distance(cells[[i, k]], cells[[j, k]], d_ij, n_i, n_j, sizes[k])
                }
            })
            .collect();

        matrix.set_row(i, &updated)?;
        matrix.set_col(i, &updated)?;
        Ok(())
    }

    /// Lowercase name, as accepted by `FromStr`.
    pub fn name(&self) -> &'static str {
        match self {
            Linkage::Single => "single",
            Linkage::Complete => "complete",
            Linkage::Average => "average",
            Linkage::Median => "median",
            Linkage::Centroid => "centroid",
            Linkage::Ward => "ward",
        }
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Linkage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(Linkage::Single),
            "complete" => Ok(Linkage::Complete),
            "average" => Ok(Linkage::Average),
            "median" => Ok(Linkage::Median),
            "centroid" => Ok(Linkage::Centroid),
            "ward" => Ok(Linkage::Ward),
            _ => Err(Error::InvalidParameter {
                name: "linkage",
                message: "unknown linkage method",
            }),
        }
    }
}
