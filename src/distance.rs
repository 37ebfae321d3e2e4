//! Pairwise distance functions over dense vectors.
//!
//! These feed [`DissimilarityMatrix::from_vectors`](crate::DissimilarityMatrix::from_vectors)
//! and are never consulted again once the matrix exists: every later update
//! works from the matrix alone.
//!
//! | Metric | Formula |
//! |--------|---------|
//! | Euclidean | √Σ(aᵢ − bᵢ)² |
//! | Squared Euclidean | Σ(aᵢ − bᵢ)² |
//! | Cityblock | Σ\|aᵢ − bᵢ\| |
//! | Cosine | 1 − a·b / (‖a‖‖b‖) |
//! | Canberra | Σ\|aᵢ − bᵢ\| / (\|aᵢ\| + \|bᵢ\|) |
//! | Correlation | 1 − Pearson r(a, b) |
//!
//! ## Contract
//!
//! - Slices are compared element-wise up to the shorter length; the matrix
//!   constructor rejects mismatched dimensions before calling in here.
//! - Degenerate inputs (zero vector for cosine, constant vector for
//!   correlation) return `NaN`. The matrix constructor turns that into an error.
//!
//! For Ward linkage over raw points, use half the squared Euclidean distance:
//! for two singletons that equals the increase in error sum of squares.

use core::fmt;
use core::str::FromStr;

use crate::error::Error;

/// Named distance function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    /// Straight-line distance.
    #[default]
    Euclidean,
    /// Squared straight-line distance.
    SquaredEuclidean,
    /// Manhattan / L1 distance.
    Cityblock,
    /// One minus cosine similarity.
    Cosine,
    /// Weighted L1 distance.
    Canberra,
    /// One minus the Pearson correlation coefficient.
    Correlation,
}

impl Metric {
    /// Distance between `a` and `b` under this metric.
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Metric::Euclidean => euclidean(a, b),
            Metric::SquaredEuclidean => squared_euclidean(a, b),
            Metric::Cityblock => cityblock(a, b),
            Metric::Cosine => cosine(a, b),
            Metric::Canberra => canberra(a, b),
            Metric::Correlation => correlation(a, b),
        }
    }

    /// Lowercase name, as accepted by `FromStr`.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::SquaredEuclidean => "sqeuclidean",
            Metric::Cityblock => "cityblock",
            Metric::Cosine => "cosine",
            Metric::Canberra => "canberra",
            Metric::Correlation => "correlation",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Metric::Euclidean),
            "sqeuclidean" | "squared_euclidean" => Ok(Metric::SquaredEuclidean),
            "cityblock" | "manhattan" => Ok(Metric::Cityblock),
            "cosine" => Ok(Metric::Cosine),
            "canberra" => Ok(Metric::Canberra),
            "correlation" => Ok(Metric::Correlation),
            _ => Err(Error::InvalidParameter {
                name: "metric",
                message: "unknown distance metric",
            }),
        }
    }
}

/// Euclidean distance.
#[inline]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// Squared Euclidean distance.
#[inline]
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Cityblock (L1) distance.
#[inline]
pub fn cityblock(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

/// Cosine distance: `1 - cos(a, b)`.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut na = 0.0;
    let mut nb = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    let denom = na.sqrt() * nb.sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    // Rounding can push the ratio a hair past 1.
    (1.0 - dot / denom).max(0.0)
}

/// Canberra distance. Coordinates where both values are zero contribute nothing.
pub fn canberra(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let denom = x.abs() + y.abs();
            if denom == 0.0 {
                0.0
            } else {
                (x - y).abs() / denom
            }
        })
        .sum()
}

/// Correlation distance: `1 - r` where `r` is the Pearson coefficient.
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return f64::NAN;
    }
    let mean_a = a[..n].iter().sum::<f64>() / n as f64;
    let mean_b = b[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a[..n].iter().zip(b[..n].iter()) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (1.0 - cov / denom).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_euclidean() {
        assert!((euclidean(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < EPS);
        assert!((squared_euclidean(&[0.0, 0.0], &[3.0, 4.0]) - 25.0).abs() < EPS);
    }

    #[test]
    fn test_cityblock_and_canberra() {
        assert!((cityblock(&[1.0, 2.0], &[4.0, 0.0]) - 5.0).abs() < EPS);
        // |1-3|/4 + 0 (both zero)
        assert!((canberra(&[1.0, 0.0], &[3.0, 0.0]) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_cosine() {
        assert!(cosine(&[1.0, 0.0], &[2.0, 0.0]).abs() < EPS);
        assert!((cosine(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < EPS);
        assert!(cosine(&[0.0, 0.0], &[1.0, 1.0]).is_nan());
    }

    #[test]
    fn test_correlation() {
        assert!(correlation(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).abs() < EPS);
        assert!((correlation(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) - 2.0).abs() < EPS);
        assert!(correlation(&[1.0, 1.0], &[1.0, 2.0]).is_nan());
    }

    #[test]
    fn test_metric_parse() {
        for m in [
            Metric::Euclidean,
            Metric::SquaredEuclidean,
            Metric::Cityblock,
            Metric::Cosine,
            Metric::Canberra,
            Metric::Correlation,
        ] {
            assert_eq!(m.name().parse::<Metric>().unwrap(), m);
        }
        assert!("chebyshev".parse::<Metric>().is_err());
    }
}
