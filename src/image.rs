//! Square image grids and pixel metrics.
//!
//! Masks, targets and simulated intensities are all [`Image`]s: square
//! `ndarray` matrices of `f64`. The optimizer works on flattened gene
//! vectors in row-major order; [`flatten`] and [`from_genes`] convert
//! between the two without reordering.

use crate::error::{LithoError, Result};
use ndarray::Array2;

/// A square 2D grid of real pixel values.
pub type Image = Array2<f64>;

/// Flattens an image into a row-major gene vector.
pub fn flatten(image: &Image) -> Vec<f64> {
    image.iter().copied().collect()
}

/// Reshapes a row-major gene vector into an `n × n` image.
///
/// Fails with [`LithoError::ShapeMismatch`] when `genes.len() != n * n`.
pub fn from_genes(genes: &[f64], n: usize) -> Result<Image> {
    let expected = n.saturating_mul(n);
    if genes.len() != expected {
        return Err(LithoError::ShapeMismatch {
            what: "gene vector",
            expected,
            actual: genes.len(),
        });
    }
    Array2::from_shape_vec((n, n), genes.to_vec()).map_err(|_| LithoError::ShapeMismatch {
        what: "gene vector",
        expected,
        actual: genes.len(),
    })
}

/// Checks that `image` is `n × n`.
pub fn ensure_square(image: &Image, n: usize, what: &'static str) -> Result<()> {
    if image.dim() == (n, n) {
        Ok(())
    } else {
        Err(LithoError::ShapeMismatch {
            what,
            expected: n.saturating_mul(n),
            actual: image.len(),
        })
    }
}

/// Largest pixel value, or 0 for an empty image.
pub fn max_value(image: &Image) -> f64 {
    image.iter().copied().fold(0.0_f64, f64::max)
}

/// Mean squared pixel difference. Both images must have the same shape.
pub fn mean_squared_error(a: &Image, b: &Image) -> f64 {
    debug_assert_eq!(a.dim(), b.dim());
    if a.is_empty() {
        return 0.0;
    }
    let sum: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum();
    sum / a.len() as f64
}

/// Sum of absolute pixel differences (the reported pattern error).
pub fn sum_absolute_error(a: &Image, b: &Image) -> f64 {
    debug_assert_eq!(a.dim(), b.dim());
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

/// Michelson-style contrast `(max - min) / (max + min)`.
///
/// Returns 0 for a uniform image or when `max + min` is 0.
pub fn contrast(image: &Image) -> f64 {
    let Some(&first) = image.iter().next() else {
        return 0.0;
    };
    let (lo, hi) = image
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if hi == lo || hi + lo == 0.0 {
        return 0.0;
    }
    (hi - lo) / (hi + lo)
}
