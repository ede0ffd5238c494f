//! Partial-coherent imaging simulation.
//!
//! [`ImagingSimulator`] maps a mask to a normalized printed-intensity
//! image:
//!
//! 1. forward 2D DFT of the mask, shifted so zero frequency is centered
//! 2. multiply by the TCC profile and the transfer function
//!    (both 1D profiles over the frequency axis, applied along columns)
//! 3. inverse shift, inverse 2D DFT, magnitude
//! 4. sanitize non-finite values, normalize by the maximum
//!
//! The simulator holds only its parameters and values derived from them
//! (FFT plans and the frequency filter); `simulate` has no side effects.

use crate::error::Result;
use crate::fft::{fftshift, ifftshift, Fft2d};
use crate::image::{self, Image};
use crate::optics::{frequency_axis, OpticalModel};
use crate::params::Parameters;
use ndarray::Array2;
use num_complex::Complex64;

/// Printed image and pattern error of one mask.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationResult {
    /// Normalized printed intensity in `[0, 1]`.
    pub intensity: Image,
    /// Thresholded intensity, values in `{0, 1}`.
    pub binary: Image,
    /// Sum of absolute differences between `binary` and the target.
    pub pattern_error: f64,
}

/// Imaging simulator for a fixed set of [`Parameters`].
#[derive(Debug, Clone)]
pub struct ImagingSimulator {
    params: Parameters,
    fft: Fft2d,
    filter: Vec<Complex64>,
}

impl ImagingSimulator {
    /// Builds a simulator, validating `params`.
    pub fn new(params: Parameters) -> Result<Self> {
        params.validate()?;
        let n = params.image_size;
        let fx = frequency_axis(n, params.pixel_size);
        let fy = frequency_axis(n, params.pixel_size);
        let filter = OpticalModel::from(&params).filter_profile(&fx, &fy);
        log::debug!(
            "imaging simulator: {n}x{n} grid, λ={} nm, NA={}, σ={}",
            params.wavelength,
            params.numerical_aperture,
            params.sigma
        );
        Ok(Self {
            fft: Fft2d::new(n),
            filter,
            params,
        })
    }

    /// Parameters this simulator was built with.
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Grid side length.
    pub fn image_size(&self) -> usize {
        self.params.image_size
    }

    /// Simulates the printed intensity of `mask`.
    ///
    /// Fails with a shape mismatch when `mask` is not `image_size × image_size`.
    /// The output lies in `[0, 1]` and contains no NaN or infinity; a mask
    /// whose image is identically zero yields an all-zero image.
    pub fn simulate(&self, mask: &Image) -> Result<Image> {
        let n = self.image_size();
        image::ensure_square(mask, n, "mask")?;

        let mut spectrum: Array2<Complex64> = mask.mapv(|v| Complex64::new(v, 0.0));
        self.fft.forward(&mut spectrum);

        let mut shifted = fftshift(&spectrum);
        for mut row in shifted.rows_mut() {
            for (z, k) in row.iter_mut().zip(&self.filter) {
                *z *= *k;
            }
        }

        let mut field = ifftshift(&shifted);
        self.fft.inverse(&mut field);

        let magnitude = field.mapv(|z| z.norm());
        Ok(normalize(sanitize(magnitude)))
    }

    /// Thresholds `image` into `{0, 1}`.
    ///
    /// Pixels strictly above the threshold become 1. The default threshold
    /// is half the image maximum. An all-zero image (or any image with
    /// threshold at or above its maximum) therefore binarizes to all zeros.
    pub fn binarize(&self, image: &Image, threshold: Option<f64>) -> Image {
        binarize(image, threshold)
    }

    /// Simulates, binarizes with the default threshold, and scores against
    /// `target` using the sum of absolute pixel differences.
    pub fn evaluate_pattern(&self, mask: &Image, target: &Image) -> Result<SimulationResult> {
        image::ensure_square(target, self.image_size(), "target")?;
        let intensity = self.simulate(mask)?;
        let binary = binarize(&intensity, None);
        let pattern_error = image::sum_absolute_error(&binary, target);
        Ok(SimulationResult {
            intensity,
            binary,
            pattern_error,
        })
    }
}

/// Thresholds `image` into `{0, 1}`; see [`ImagingSimulator::binarize`].
pub fn binarize(image: &Image, threshold: Option<f64>) -> Image {
    let t = threshold.unwrap_or_else(|| 0.5 * image::max_value(image));
    image.mapv(|v| if v > t { 1.0 } else { 0.0 })
}

/// Replaces NaN and -∞ with 0, and +∞ with the largest finite value.
fn sanitize(mut image: Image) -> Image {
    let finite_max = image
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    image.mapv_inplace(|v| {
        if v.is_nan() {
            0.0
        } else if v == f64::INFINITY {
            finite_max
        } else if v == f64::NEG_INFINITY {
            0.0
        } else {
            v
        }
    });
    image
}

/// Divides by the maximum; a non-positive maximum leaves the image as is.
fn normalize(mut image: Image) -> Image {
    let max = image::max_value(&image);
    if max > 0.0 {
        image.mapv_inplace(|v| v / max);
    }
    image
}
