//! Square 2D discrete Fourier transforms.
//!
//! Row-column decomposition over `rustfft` plans. The inverse transform is
//! normalized by `1/(n·n)` so that `inverse(forward(x)) == x`.

use ndarray::Array2;
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Planned forward and inverse transforms for `n × n` grids.
///
/// Plans are immutable and shareable across threads.
#[derive(Clone)]
pub struct Fft2d {
    n: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl std::fmt::Debug for Fft2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fft2d").field("n", &self.n).finish()
    }
}

impl Fft2d {
    /// Plans transforms for `n × n` grids.
    pub fn new(n: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        Self {
            n,
            forward: planner.plan_fft_forward(n),
            inverse: planner.plan_fft_inverse(n),
        }
    }

    /// Forward 2D DFT, in place.
    pub fn forward(&self, data: &mut Array2<Complex64>) {
        self.apply(&*self.forward, data);
    }

    /// Inverse 2D DFT with `1/(n·n)` normalization, in place.
    pub fn inverse(&self, data: &mut Array2<Complex64>) {
        self.apply(&*self.inverse, data);
        let scale = 1.0 / (self.n * self.n) as f64;
        data.mapv_inplace(|z| z * scale);
    }

    fn apply(&self, plan: &dyn Fft<f64>, data: &mut Array2<Complex64>) {
        let n = self.n;
        debug_assert_eq!(data.dim(), (n, n));
        if n == 0 {
            return;
        }
        // rows
        let mut buf: Vec<Complex64> = data.iter().copied().collect();
        plan.process(&mut buf);
        // columns, via transpose
        let mut cols = transpose(&buf, n);
        plan.process(&mut cols);
        let back = transpose(&cols, n);
        for (dst, src) in data.iter_mut().zip(back) {
            *dst = src;
        }
    }
}

fn transpose(buf: &[Complex64], n: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); n * n];
    for r in 0..n {
        for c in 0..n {
            out[c * n + r] = buf[r * n + c];
        }
    }
    out
}

/// Moves the zero-frequency bin to the center: each axis is rolled by `n / 2`.
pub fn fftshift<T: Clone>(data: &Array2<T>) -> Array2<T> {
    let (rows, cols) = data.dim();
    roll(data, rows / 2, cols / 2)
}

/// Inverse of [`fftshift`]: each axis is rolled by `n - n / 2`.
pub fn ifftshift<T: Clone>(data: &Array2<T>) -> Array2<T> {
    let (rows, cols) = data.dim();
    roll(data, rows - rows / 2, cols - cols / 2)
}

fn roll<T: Clone>(data: &Array2<T>, dr: usize, dc: usize) -> Array2<T> {
    let (rows, cols) = data.dim();
    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let src_r = (r + rows - dr % rows.max(1)) % rows.max(1);
        let src_c = (c + cols - dc % cols.max(1)) % cols.max(1);
        data[[src_r, src_c]].clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_forward_of_constant_is_dc_spike() {
        let fft = Fft2d::new(4);
        let mut data = Array2::from_elem((4, 4), c(1.0));
        fft.forward(&mut data);
        assert!((data[[0, 0]] - c(16.0)).norm() < 1e-12);
        for ((r, col), z) in data.indexed_iter() {
            if (r, col) != (0, 0) {
                assert!(z.norm() < 1e-12, "bin ({r},{col}) = {z}");
            }
        }
    }

    #[test]
    fn test_inverse_restores_input() {
        let fft = Fft2d::new(5);
        let original = Array2::from_shape_fn((5, 5), |(r, col)| c((r * 5 + col) as f64 * 0.1));
        let mut data = original.clone();
        fft.forward(&mut data);
        fft.inverse(&mut data);
        for (a, b) in data.iter().zip(original.iter()) {
            assert!((a - b).norm() < 1e-12);
        }
    }

    #[test]
    fn test_single_tone_lands_in_expected_bin() {
        // x[r][c] = exp(2πi·c/4): all energy in column bin 1.
        let fft = Fft2d::new(4);
        let mut data = Array2::from_shape_fn((4, 4), |(_, col)| {
            Complex64::from_polar(1.0, 2.0 * std::f64::consts::PI * col as f64 / 4.0)
        });
        fft.forward(&mut data);
        assert!((data[[0, 1]].norm() - 16.0).abs() < 1e-9);
        assert!(data[[0, 0]].norm() < 1e-9);
        assert!(data[[1, 1]].norm() < 1e-9);
    }

    #[test]
    fn test_fftshift_even() {
        let a = array![[0, 1, 2, 3], [4, 5, 6, 7], [8, 9, 10, 11], [12, 13, 14, 15]];
        let shifted = fftshift(&a);
        assert_eq!(shifted[[2, 2]], 0);
        assert_eq!(
            shifted,
            array![[10, 11, 8, 9], [14, 15, 12, 13], [2, 3, 0, 1], [6, 7, 4, 5]]
        );
        assert_eq!(ifftshift(&shifted), a);
    }

    #[test]
    fn test_fftshift_odd() {
        let a = array![[0, 1, 2], [3, 4, 5], [6, 7, 8]];
        let shifted = fftshift(&a);
        // zero frequency moves to index n / 2 = 1
        assert_eq!(shifted[[1, 1]], 0);
        assert_eq!(shifted, array![[8, 6, 7], [2, 0, 1], [5, 3, 4]]);
        assert_eq!(ifftshift(&shifted), a);
    }

    #[test]
    fn test_ifftshift_odd_is_not_fftshift() {
        let a = array![[0, 1, 2], [3, 4, 5], [6, 7, 8]];
        // center element moves back to the origin
        assert_eq!(ifftshift(&a), array![[4, 5, 3], [7, 8, 6], [1, 2, 0]]);
        assert_ne!(fftshift(&fftshift(&a)), a);
    }
}
