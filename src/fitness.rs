//! Mask fitness against a fixed target.

use crate::error::Result;
use crate::image::{self, Image};
use crate::simulator::{binarize, ImagingSimulator};

/// Scores candidate masks by the mean squared error between their
/// binarized printed image and the target.
///
/// This is the optimizer's objective; lower is better. It is distinct from
/// the pattern error reported by
/// [`ImagingSimulator::evaluate_pattern`], which sums absolute differences.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    simulator: ImagingSimulator,
    target: Image,
}

impl FitnessEvaluator {
    /// Creates an evaluator. The target must be `image_size × image_size`.
    pub fn new(simulator: ImagingSimulator, target: Image) -> Result<Self> {
        image::ensure_square(&target, simulator.image_size(), "target")?;
        Ok(Self { simulator, target })
    }

    /// The simulator used for scoring.
    pub fn simulator(&self) -> &ImagingSimulator {
        &self.simulator
    }

    /// The target pattern.
    pub fn target(&self) -> &Image {
        &self.target
    }

    /// Evaluates a flattened gene vector.
    ///
    /// Fails with a shape mismatch unless `genes.len() == image_size²`.
    pub fn evaluate(&self, genes: &[f64]) -> Result<f64> {
        let mask = image::from_genes(genes, self.simulator.image_size())?;
        self.evaluate_mask(&mask)
    }

    /// Evaluates a mask image.
    pub fn evaluate_mask(&self, mask: &Image) -> Result<f64> {
        let printed = binarize(&self.simulator.simulate(mask)?, None);
        Ok(image::mean_squared_error(&printed, &self.target))
    }
}
