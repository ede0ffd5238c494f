//! Optical model of the exposure system.
//!
//! Pure functions of [`Parameters`] evaluated at spatial-frequency
//! coordinates `(fx, fy)` in cycles/nm:
//!
//! - coherent transfer function `H` (Fresnel propagation phase)
//! - light-source function `J` (circular partially coherent source)
//! - pupil function `P` (diffraction-limited aperture)
//! - transmission cross-coefficient, approximated as the 1D
//!   self-convolution of `J·P` along the frequency axis
//!
//! The frequency coordinates are paired samples `(fx[k], fy[k])` of two
//! 1D axes, so every function here yields a 1D profile of the same length
//! as the axes. The simulator applies that profile along the column axis
//! of the shifted spectrum.
//!
//! None of these functions fail. A zero-radius source or pupil has no
//! support and evaluates to 0 everywhere.

use crate::params::Parameters;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Scalar optical constants extracted from [`Parameters`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpticalModel {
    /// Wavelength λ (nm).
    pub wavelength: f64,
    /// Propagation distance z (nm).
    pub distance: f64,
    /// Refractive index n.
    pub refractive_index: f64,
    /// Partial-coherence factor σ.
    pub sigma: f64,
    /// Numerical aperture NA.
    pub numerical_aperture: f64,
}

impl From<&Parameters> for OpticalModel {
    fn from(p: &Parameters) -> Self {
        Self {
            wavelength: p.wavelength,
            distance: p.distance,
            refractive_index: p.refractive_index,
            sigma: p.sigma,
            numerical_aperture: p.numerical_aperture,
        }
    }
}

impl OpticalModel {
    /// Coherent transfer function `exp(-iπ·λ·z·(fx²+fy²)/n²)`.
    ///
    /// Unit magnitude; `z = 0` gives exactly `1 + 0i`.
    pub fn transfer_function(&self, fx: f64, fy: f64) -> Complex64 {
        let n2 = self.refractive_index * self.refractive_index;
        let phase = -PI * self.wavelength * self.distance * (fx * fx + fy * fy) / n2;
        Complex64::from_polar(1.0, phase)
    }

    /// Source radius in frequency space, `σ·NA/λ`.
    pub fn source_radius(&self) -> f64 {
        self.sigma * self.numerical_aperture / self.wavelength
    }

    /// Pupil radius in frequency space, `NA/λ`.
    pub fn pupil_radius(&self) -> f64 {
        self.numerical_aperture / self.wavelength
    }

    /// Light-source function: `λ²/(π·(σ·NA)²)` inside the source disk.
    pub fn light_source(&self, fx: f64, fy: f64) -> f64 {
        let sna = self.sigma * self.numerical_aperture;
        disk(fx, fy, self.source_radius(), || {
            self.wavelength * self.wavelength / (PI * sna * sna)
        })
    }

    /// Pupil (impulse-response) function: `λ²/(π·NA²)` inside the pupil disk.
    pub fn pupil(&self, fx: f64, fy: f64) -> f64 {
        let na = self.numerical_aperture;
        disk(fx, fy, self.pupil_radius(), || {
            self.wavelength * self.wavelength / (PI * na * na)
        })
    }

    /// Transmission cross-coefficient profile over paired axes.
    ///
    /// Computes `g[k] = J(fx[k], fy[k]) · P(fx[k], fy[k])` and returns the
    /// centered ("same"-length) convolution of `g` with itself.
    pub fn tcc(&self, fx: &[f64], fy: &[f64]) -> Vec<f64> {
        debug_assert_eq!(fx.len(), fy.len());
        let g: Vec<f64> = fx
            .iter()
            .zip(fy)
            .map(|(&x, &y)| self.light_source(x, y) * self.pupil(x, y))
            .collect();
        convolve_same(&g, &g)
    }

    /// Transfer function sampled over paired axes.
    pub fn transfer_profile(&self, fx: &[f64], fy: &[f64]) -> Vec<Complex64> {
        fx.iter()
            .zip(fy)
            .map(|(&x, &y)| self.transfer_function(x, y))
            .collect()
    }

    /// Combined frequency filter `TCC[k] · H[k]` applied by the simulator.
    pub fn filter_profile(&self, fx: &[f64], fy: &[f64]) -> Vec<Complex64> {
        self.tcc(fx, fy)
            .into_iter()
            .zip(self.transfer_profile(fx, fy))
            .map(|(t, h)| h * t)
            .collect()
    }
}

fn disk(fx: f64, fy: f64, radius: f64, weight: impl FnOnce() -> f64) -> f64 {
    if radius > 0.0 && fx * fx + fy * fy <= radius * radius {
        weight()
    } else {
        0.0
    }
}

/// `n` evenly spaced frequencies spanning `[-0.5/pixel_size, 0.5/pixel_size]`.
///
/// Both endpoints are included; a single sample sits at `-0.5/pixel_size`.
pub fn frequency_axis(n: usize, pixel_size: f64) -> Vec<f64> {
    let lo = -0.5 / pixel_size;
    let hi = 0.5 / pixel_size;
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            let mut axis: Vec<f64> = (0..n).map(|i| lo + step * i as f64).collect();
            axis[n - 1] = hi;
            axis
        }
    }
}

/// Discrete linear convolution truncated to the central `max(len)` samples.
///
/// Matches the conventional "same" mode: the full convolution of length
/// `a.len() + b.len() - 1` is cropped starting at `(min(len) - 1) / 2`.
pub fn convolve_same(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let full_len = a.len() + b.len() - 1;
    let mut full = vec![0.0; full_len];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            full[i + j] += x * y;
        }
    }
    let start = (a.len().min(b.len()) - 1) / 2;
    let len = a.len().max(b.len());
    full[start..start + len].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> OpticalModel {
        OpticalModel::from(&Parameters::default())
    }

    #[test]
    fn test_frequency_axis() {
        let axis = frequency_axis(5, 10.0);
        let expected = [-0.05, -0.025, 0.0, 0.025, 0.05];
        for (a, e) in axis.iter().zip(expected) {
            assert!((a - e).abs() < 1e-15, "{axis:?}");
        }
        assert_eq!(frequency_axis(1, 10.0), vec![-0.05]);
        assert!(frequency_axis(0, 10.0).is_empty());
    }

    #[test]
    fn test_frequency_axis_symmetric() {
        let axis = frequency_axis(30, 7560.0);
        for k in 0..30 {
            assert!((axis[k] + axis[29 - k]).abs() < 1e-18);
        }
    }

    #[test]
    fn test_convolve_same_even() {
        let ones = [1.0; 4];
        assert_eq!(convolve_same(&ones, &ones), vec![2.0, 3.0, 4.0, 3.0]);
    }

    #[test]
    fn test_convolve_same_odd() {
        let got = convolve_same(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.5]);
        assert_eq!(got, vec![1.0, 2.5, 4.0]);
    }

    #[test]
    fn test_convolve_same_unequal_lengths() {
        let got = convolve_same(&[1.0, 2.0, 3.0, 4.0, 5.0], &[1.0, 1.0]);
        // full: [1, 3, 5, 7, 9, 5]; start (2 - 1) / 2 = 0
        assert_eq!(got, vec![1.0, 3.0, 5.0, 7.0, 9.0]);
    }

    #[test]
    fn test_transfer_function_unit_magnitude() {
        let m = model();
        for &(fx, fy) in &[(0.0, 0.0), (1e-5, -3e-5), (6e-5, 6e-5)] {
            assert!((m.transfer_function(fx, fy).norm() - 1.0).abs() < 1e-12);
        }
        let h = m.transfer_function(0.0, 0.0);
        assert_eq!(h, Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_transfer_function_zero_distance_is_identity() {
        let m = OpticalModel {
            distance: 0.0,
            ..model()
        };
        let h = m.transfer_function(4e-5, -2e-5);
        assert_eq!(h.re, 1.0);
        assert_eq!(h.im.abs(), 0.0);
    }

    #[test]
    fn test_light_source_disk() {
        let m = model();
        let r = m.source_radius();
        let inside = m.light_source(0.5 * r, 0.0);
        let expected = 405.0 * 405.0 / (PI * 0.25 * 0.25);
        assert!((inside - expected).abs() / expected < 1e-12);
        assert_eq!(m.light_source(r * 1.01, 0.0), 0.0);
    }

    #[test]
    fn test_pupil_disk() {
        let m = model();
        let r = m.pupil_radius();
        let expected = 405.0 * 405.0 / (PI * 0.25);
        assert!((m.pupil(0.0, 0.7 * r) - expected).abs() / expected < 1e-12);
        assert_eq!(m.pupil(r, r), 0.0);
    }

    #[test]
    fn test_zero_sigma_has_no_support() {
        let m = OpticalModel { sigma: 0.0, ..model() };
        assert_eq!(m.light_source(0.0, 0.0), 0.0);
        let axis = frequency_axis(5, 7560.0);
        assert!(m.tcc(&axis, &axis).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_tcc_inside_support_is_triangular() {
        // All default frequencies fall inside both disks, so J·P is constant
        // and the self-convolution is a cropped triangle.
        let m = model();
        let axis = frequency_axis(4, 7560.0);
        let tcc = m.tcc(&axis, &axis);
        let c = m.light_source(0.0, 0.0) * m.pupil(0.0, 0.0);
        let expected = [2.0, 3.0, 4.0, 3.0].map(|k| k * c * c);
        for (t, e) in tcc.iter().zip(expected) {
            assert!((t - e).abs() / e < 1e-12);
        }
    }

    #[test]
    fn test_filter_profile_length() {
        let m = model();
        let axis = frequency_axis(7, 7560.0);
        assert_eq!(m.filter_profile(&axis, &axis).len(), 7);
    }
}
