//! Dissimilarity matrix with an undefined diagonal.
//!
//! The matrix is the mutable state of an agglomerative run. It answers two
//! questions quickly (closest pair, adjacent closest pair), accepts in-place
//! overwrites of one row/column from a linkage update, and shrinks by one
//! row/column per merge.
//!
//! ## Invariants
//!
//! - Square and symmetric: `get(i, j) == get(j, i)` for `i != j`.
//! - Diagonal cells hold `NaN` and are never returned as a distance.
//! - Off-diagonal cells are finite and non-negative at construction.
//! - Labels, when attached, stay aligned with rows across [`DissimilarityMatrix::remove`].
//!
//! ## Tie-breaking
//!
//! [`DissimilarityMatrix::minimum_cell`] scans the upper triangle row-major and
//! only replaces the current best on a strictly smaller value, so among equal
//! cells the lexicographically smallest `(row, col)` wins.
//! [`DissimilarityMatrix::adjacent_minimum`] keeps the *last* of equal
//! adjacent cells, so the rightmost tied neighbor pair merges first. Either
//! way the merge order is reproducible.

use ndarray::{Array2, ArrayView1, Axis};

use crate::error::{Error, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Relative tolerance used when checking a pre-built matrix for symmetry.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A single matrix cell returned by the minimum searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Cell value.
    pub value: f64,
    /// Row index (always `< col`).
    pub row: usize,
    /// Column index.
    pub col: usize,
}

/// Square, symmetric matrix of pairwise dissimilarities between live clusters.
#[derive(Debug, Clone)]
pub struct DissimilarityMatrix {
    cells: Array2<f64>,
    labels: Option<Vec<String>>,
}

impl DissimilarityMatrix {
    /// Build a matrix from raw vectors and a distance function.
    ///
    /// Each unordered pair is computed once and written to both halves, so the
    /// matrix is always fully symmetric; there is no lower-triangle-only mode.
    /// With the `parallel` feature the rows are computed on the rayon pool; the
    /// result is the same.
    pub fn from_vectors<F>(vectors: &[Vec<f64>], distance: F) -> Result<Self>
    where
        F: Fn(&[f64], &[f64]) -> f64 + Sync,
    {
        let n = vectors.len();
        if n < 2 {
            return Err(Error::InvalidInput(format!(
                "need at least 2 vectors, got {n}"
            )));
        }
        let d = vectors[0].len();
        if let Some(v) = vectors.iter().find(|v| v.len() != d) {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: v.len(),
            });
        }

        let upper_row = |i: usize| -> Vec<f64> {
            ((i + 1)..n)
                .map(|j| distance(&vectors[i], &vectors[j]))
                .collect()
        };

        #[cfg(feature = "parallel")]
        let upper: Vec<Vec<f64>> = (0..n).into_par_iter().map(upper_row).collect();

        #[cfg(not(feature = "parallel"))]
        let upper: Vec<Vec<f64>> = (0..n).map(upper_row).collect();

        let mut cells = Array2::from_elem((n, n), f64::NAN);
        for (i, row) in upper.into_iter().enumerate() {
            for (offset, value) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                if !value.is_finite() || value < 0.0 {
                    return Err(Error::InvalidInput(format!(
                        "distance between vectors {i} and {j} is {value}"
                    )));
                }
                cells[[i, j]] = value;
                cells[[j, i]] = value;
            }
        }

        Ok(Self {
            cells,
            labels: None,
        })
    }

    /// Build a matrix from nested rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        if let Some(r) = rows.iter().find(|r| r.len() != n) {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: r.len(),
            });
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let cells = Array2::from_shape_vec((n, n), flat)
            .map_err(|e| Error::InvalidInput(e.to_string()))?;
        Self::from_array(cells)
    }

    /// Validate and adopt a pre-built square matrix.
    ///
    /// The diagonal may hold `NaN` or `0.0`; it is normalized to `NaN`.
    pub fn from_array(mut cells: Array2<f64>) -> Result<Self> {
        let (rows, cols) = cells.dim();
        if rows != cols {
            return Err(Error::InvalidInput(format!(
                "matrix must be square, got {rows}x{cols}"
            )));
        }
        if rows < 2 {
            return Err(Error::InvalidInput(format!(
                "need at least 2 items, got {rows}"
            )));
        }

        for i in 0..rows {
            let diag = cells[[i, i]];
            if !(diag.is_nan() || diag == 0.0) {
                return Err(Error::InvalidInput(format!(
                    "diagonal cell {i} is {diag}, expected 0 or NaN"
                )));
            }
            for j in (i + 1)..rows {
                let a = cells[[i, j]];
                let b = cells[[j, i]];
                if !a.is_finite() || !b.is_finite() || a < 0.0 || b < 0.0 {
                    return Err(Error::InvalidInput(format!(
                        "cell ({i}, {j}) is not a finite non-negative distance"
                    )));
                }
                if !approx_eq(a, b, SYMMETRY_TOLERANCE) {
                    return Err(Error::NotSymmetric { row: i, col: j });
                }
            }
        }

        cells.diag_mut().fill(f64::NAN);
        Ok(Self {
            cells,
            labels: None,
        })
    }

    /// Attach one label per row.
    pub fn with_labels<S: Into<String>>(mut self, labels: Vec<S>) -> Result<Self> {
        if labels.len() != self.size() {
            return Err(Error::InvalidInput(format!(
                "expected {} labels, got {}",
                self.size(),
                labels.len()
            )));
        }
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        Ok(self)
    }

    /// Labels aligned with the current rows, if any were attached.
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    /// Current row index of `label`.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.as_ref()?.iter().position(|l| l == label)
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.cells.nrows()
    }

    /// Value at `(row, col)`; `NaN` on the diagonal.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get([row, col]).copied()
    }

    /// View of one row.
    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.size()).then(|| self.cells.row(index))
    }

    /// Underlying storage.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.cells
    }

    /// Check symmetry of every off-diagonal pair within a relative tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let n = self.size();
        (0..n).all(|i| {
            ((i + 1)..n).all(|j| approx_eq(self.cells[[i, j]], self.cells[[j, i]], tol))
        })
    }

    /// Globally smallest off-diagonal cell.
    ///
    /// Returns the upper-triangle position, so `row < col`. Ties go to the
    /// lexicographically smallest `(row, col)`.
    pub fn minimum_cell(&self) -> Result<Cell> {
        let n = self.size();
        let mut best: Option<Cell> = None;
        for row in 0..n {
            for col in (row + 1)..n {
                let value = self.cells[[row, col]];
                if value.is_nan() {
                    continue;
                }
                if best.map_or(true, |b| value < b.value) {
                    best = Some(Cell { value, row, col });
                }
            }
        }
        best.ok_or(Error::EmptyMatrix { size: n })
    }

    /// Smallest cell among index-adjacent pairs `(i, i + 1)`.
    ///
    /// Ties go to the largest `i`: the scan runs left to right and a later
    /// equal cell replaces the current best.
    pub fn adjacent_minimum(&self) -> Result<Cell> {
        let n = self.size();
        let mut best: Option<Cell> = None;
        for row in 1..n {
            let value = self.cells[[row - 1, row]];
            if value.is_nan() {
                continue;
            }
            if best.map_or(true, |b| value <= b.value) {
                best = Some(Cell {
                    value,
                    row: row - 1,
                    col: row,
                });
            }
        }
        best.ok_or(Error::EmptyMatrix { size: n })
    }

    /// Return a new matrix with row and column `index` deleted.
    ///
    /// The receiver is left untouched. Remaining rows are renumbered
    /// contiguously; tracking which cluster each new index represents is the
    /// caller's job (see [`Dendrogram`](crate::Dendrogram)).
    pub fn remove(&self, index: usize) -> Result<Self> {
        let n = self.size();
        if index >= n {
            return Err(Error::InvalidInput(format!(
                "cannot remove index {index} from matrix of size {n}"
            )));
        }
        if n == 1 {
            return Err(Error::InvalidInput(
                "cannot remove the last row of a matrix".to_string(),
            ));
        }
        let keep: Vec<usize> = (0..n).filter(|&k| k != index).collect();
        let cells = self.cells.select(Axis(0), &keep).select(Axis(1), &keep);
        let labels = self.labels.as_ref().map(|labels| {
            keep.iter().map(|&k| labels[k].clone()).collect()
        });
        Ok(Self { cells, labels })
    }

    /// Overwrite row `index`, keeping the diagonal sentinel.
    pub fn set_row(&mut self, index: usize, values: &[f64]) -> Result<()> {
        self.check_line(index, values)?;
        for (k, &v) in values.iter().enumerate() {
            if k != index {
                self.cells[[index, k]] = v;
            }
        }
        Ok(())
    }

    /// Overwrite column `index`, keeping the diagonal sentinel.
    pub fn set_col(&mut self, index: usize, values: &[f64]) -> Result<()> {
        self.check_line(index, values)?;
        for (k, &v) in values.iter().enumerate() {
            if k != index {
                self.cells[[k, index]] = v;
            }
        }
        Ok(())
    }

    fn check_line(&self, index: usize, values: &[f64]) -> Result<()> {
        let n = self.size();
        if index >= n {
            return Err(Error::InvalidInput(format!(
                "index {index} out of range for matrix of size {n}"
            )));
        }
        if values.len() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: values.len(),
            });
        }
        Ok(())
    }
}

/// Cell-wise equality where the `NaN` sentinels compare equal.
impl PartialEq for DissimilarityMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.labels == other.labels
            && self.cells.dim() == other.cells.dim()
            && self
                .cells
                .iter()
                .zip(other.cells.iter())
                .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }
}

#[inline]
fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * 1f64.max(a.abs()).max(b.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::euclidean;

    fn line_of(xs: &[f64]) -> DissimilarityMatrix {
        let data: Vec<Vec<f64>> = xs.iter().map(|&x| vec![x]).collect();
        DissimilarityMatrix::from_vectors(&data, euclidean).unwrap()
    }

    fn line() -> DissimilarityMatrix {
        // Points on a line: 0, 1, 3, 7
        line_of(&[0.0, 1.0, 3.0, 7.0])
    }

    #[test]
    fn test_from_vectors() {
        let m = line();
        assert_eq!(m.size(), 4);
        assert_eq!(m.get(0, 3), Some(7.0));
        assert_eq!(m.get(3, 0), Some(7.0));
        assert!(m.get(2, 2).unwrap().is_nan());
        assert!(m.is_symmetric(SYMMETRY_TOLERANCE));
    }

    #[test]
    fn test_from_vectors_rejects_bad_input() {
        let one = vec![vec![1.0, 2.0]];
        assert!(matches!(
            DissimilarityMatrix::from_vectors(&one, euclidean),
            Err(Error::InvalidInput(_))
        ));

        let ragged = vec![vec![1.0, 2.0], vec![1.0]];
        assert_eq!(
            DissimilarityMatrix::from_vectors(&ragged, euclidean),
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        );

        let zeros = vec![vec![0.0, 0.0], vec![1.0, 0.0]];
        assert!(DissimilarityMatrix::from_vectors(&zeros, crate::distance::cosine).is_err());
    }

    #[test]
    fn test_from_rows_validation() {
        let ok = vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 3.0],
            vec![2.0, 3.0, 0.0],
        ];
        let m = DissimilarityMatrix::from_rows(&ok).unwrap();
        assert!(m.get(1, 1).unwrap().is_nan());

        let asym = vec![vec![0.0, 1.0], vec![2.0, 0.0]];
        assert_eq!(
            DissimilarityMatrix::from_rows(&asym),
            Err(Error::NotSymmetric { row: 0, col: 1 })
        );

        let bad_diag = vec![vec![1.0, 1.0], vec![1.0, 0.0]];
        assert!(DissimilarityMatrix::from_rows(&bad_diag).is_err());

        let not_square = vec![vec![0.0, 1.0, 2.0], vec![1.0, 0.0, 3.0]];
        assert!(DissimilarityMatrix::from_rows(&not_square)
            .unwrap_err()
            .is_invalid_input());

        let negative = vec![vec![0.0, -1.0], vec![-1.0, 0.0]];
        assert!(DissimilarityMatrix::from_rows(&negative).is_err());
    }

    #[test]
    fn test_minimum_cell() {
        let m = line();
        assert_eq!(
            m.minimum_cell().unwrap(),
            Cell {
                value: 1.0,
                row: 0,
                col: 1
            }
        );
    }

    #[test]
    fn test_minimum_cell_tie_break_is_lexicographic() {
        // (0,2), (1,2) and (1,3) all hold 1.0; (0,2) must win.
        let rows = vec![
            vec![0.0, 5.0, 1.0, 4.0],
            vec![5.0, 0.0, 1.0, 1.0],
            vec![1.0, 1.0, 0.0, 6.0],
            vec![4.0, 1.0, 6.0, 0.0],
        ];
        let m = DissimilarityMatrix::from_rows(&rows).unwrap();
        let cell = m.minimum_cell().unwrap();
        assert_eq!((cell.row, cell.col), (0, 2));

        // Same answer on every call.
        for _ in 0..5 {
            assert_eq!(m.minimum_cell().unwrap(), cell);
        }
    }

    #[test]
    fn test_adjacent_minimum() {
        // Global minimum is (0,3) but only neighbors are eligible.
        let rows = vec![
            vec![0.0, 4.0, 9.0, 1.0],
            vec![4.0, 0.0, 2.0, 9.0],
            vec![9.0, 2.0, 0.0, 3.0],
            vec![1.0, 9.0, 3.0, 0.0],
        ];
        let m = DissimilarityMatrix::from_rows(&rows).unwrap();
        let cell = m.adjacent_minimum().unwrap();
        assert_eq!((cell.value, cell.row, cell.col), (2.0, 1, 2));
    }

    #[test]
    fn test_adjacent_minimum_tie_goes_to_last_pair() {
        // Equally spaced points: every neighbor pair is 1 apart.
        let m = line_of(&[0.0, 1.0, 2.0, 3.0]);
        let cell = m.adjacent_minimum().unwrap();
        assert_eq!((cell.row, cell.col), (2, 3));

        // (1,2) and (2,3) tie at 2; (0,1) is larger.
        let rows = vec![
            vec![0.0, 4.0, 9.0, 1.0],
            vec![4.0, 0.0, 2.0, 9.0],
            vec![9.0, 2.0, 0.0, 2.0],
            vec![1.0, 9.0, 2.0, 0.0],
        ];
        let m = DissimilarityMatrix::from_rows(&rows).unwrap();
        let cell = m.adjacent_minimum().unwrap();
        assert_eq!((cell.value, cell.row, cell.col), (2.0, 2, 3));

        // The global search still prefers the lowest pair.
        let m = line_of(&[0.0, 1.0, 2.0, 3.0]);
        let cell = m.minimum_cell().unwrap();
        assert_eq!((cell.row, cell.col), (0, 1));
    }

    #[test]
    fn test_minimum_on_single_cluster_is_empty() {
        let m = line().remove(0).unwrap().remove(0).unwrap().remove(0).unwrap();
        assert_eq!(m.size(), 1);
        assert_eq!(m.minimum_cell(), Err(Error::EmptyMatrix { size: 1 }));
        assert_eq!(m.adjacent_minimum(), Err(Error::EmptyMatrix { size: 1 }));
        assert!(m.remove(0).is_err());
    }

    #[test]
    fn test_remove_is_non_destructive() {
        let m = line().with_labels(vec!["a", "b", "c", "d"]).unwrap();
        let before = m.clone();
        let r = m.remove(1).unwrap();

        assert_eq!(m, before);
        assert_eq!(r.size(), 3);
        // Old (0,2)=3 and (2,3)=4 are now (0,1) and (1,2).
        assert_eq!(r.get(0, 1), Some(3.0));
        assert_eq!(r.get(1, 2), Some(4.0));
        assert!(r.get(1, 1).unwrap().is_nan());
        assert_eq!(r.labels().unwrap(), ["a", "c", "d"]);
        assert_eq!(r.index_of("d"), Some(2));
        assert_eq!(m.index_of("d"), Some(3));
    }

    #[test]
    fn test_set_row_and_col_keep_diagonal() {
        let mut m = line();
        m.set_row(1, &[9.0, 9.0, 8.0, 7.0]).unwrap();
        m.set_col(1, &[9.0, 9.0, 8.0, 7.0]).unwrap();
        assert!(m.get(1, 1).unwrap().is_nan());
        assert_eq!(m.get(1, 3), Some(7.0));
        assert_eq!(m.get(3, 1), Some(7.0));
        assert!(m.is_symmetric(SYMMETRY_TOLERANCE));

        assert_eq!(
            m.set_row(0, &[1.0]),
            Err(Error::DimensionMismatch {
                expected: 4,
                found: 1
            })
        );
    }

    #[test]
    fn test_labels_length_checked() {
        assert!(line().with_labels(vec!["a"]).is_err());
    }
}
