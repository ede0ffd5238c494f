//! End-to-end exposure run.
//!
//! [`LithographyPipeline::run`] simulates the initial mask, optimizes it,
//! simulates the optimized mask and reports both results side by side.
//! Callers that want progress updates pass a callback that receives
//! coarse [`Milestone`]s; the pipeline never waits on it.

use crate::error::Result;
use crate::fitness::FitnessEvaluator;
use crate::ga::{GaConfig, GenerationRecord};
use crate::image::{self, Image};
use crate::optimizer::MaskOptimizer;
use crate::params::Parameters;
use crate::simulator::{ImagingSimulator, SimulationResult};

/// Coarse progress points of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Milestone {
    /// About to simulate the initial mask.
    InitialSimulation,
    /// Initial simulation done; optimization starting.
    Optimizing,
    /// Optimization done; simulating the best mask.
    FinalSimulation,
    /// Report assembled.
    Complete,
}

impl Milestone {
    /// Approximate completed fraction of the run.
    pub fn fraction(self) -> f64 {
        match self {
            Milestone::InitialSimulation => 0.1,
            Milestone::Optimizing => 0.3,
            Milestone::FinalSimulation => 0.8,
            Milestone::Complete => 1.0,
        }
    }

    /// Human-readable label for progress displays.
    pub fn description(self) -> &'static str {
        match self {
            Milestone::InitialSimulation => "running initial simulation",
            Milestone::Optimizing => "optimizing mask",
            Milestone::FinalSimulation => "simulating optimized mask",
            Milestone::Complete => "complete",
        }
    }
}

/// Everything produced by one pipeline run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineReport {
    /// Simulation of the mask as given.
    pub initial: SimulationResult,
    /// Simulation of the optimized mask.
    pub optimized: SimulationResult,
    /// The optimized mask, values in `[0, 1]`.
    pub best_mask: Image,
    /// Optimizer objective (mean squared error) of `best_mask`.
    pub best_fitness: f64,
    /// Statistics of the initial population.
    pub initial_record: GenerationRecord,
    /// Per-generation statistics.
    pub history: Vec<GenerationRecord>,
}

/// Scalar comparison of the initial and optimized results.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportSummary {
    /// Pattern error of the mask as given.
    pub initial_pattern_error: f64,
    /// Pattern error of the optimized mask.
    pub optimized_pattern_error: f64,
    /// Relative pattern-error reduction in percent; `None` unless the
    /// initial error is positive and the optimized one is lower.
    pub improvement_percent: Option<f64>,
    /// Maximum normalized intensity before optimization.
    pub initial_peak_intensity: f64,
    /// Maximum normalized intensity after optimization.
    pub optimized_peak_intensity: f64,
    /// Contrast of the initial binary image.
    pub initial_contrast: f64,
    /// Contrast of the optimized binary image.
    pub optimized_contrast: f64,
}

impl PipelineReport {
    /// Scalar comparison of the initial and optimized simulations.
    pub fn summary(&self) -> ReportSummary {
        let pe0 = self.initial.pattern_error;
        let pe1 = self.optimized.pattern_error;
        let improvement_percent = if pe0 > 0.0 && pe1 < pe0 {
            Some((pe0 - pe1) / pe0 * 100.0)
        } else {
            None
        };
        ReportSummary {
            initial_pattern_error: pe0,
            optimized_pattern_error: pe1,
            improvement_percent,
            initial_peak_intensity: image::max_value(&self.initial.intensity),
            optimized_peak_intensity: image::max_value(&self.optimized.intensity),
            initial_contrast: image::contrast(&self.initial.binary),
            optimized_contrast: image::contrast(&self.optimized.binary),
        }
    }
}

/// Configured end-to-end run.
///
/// ```
/// use u_litho::{Image, LithographyPipeline, Parameters};
///
/// let params = Parameters::default()
///     .with_image_size(6)
///     .with_population_size(4)
///     .with_generations(1);
/// let mask = Image::from_elem((6, 6), 0.8);
/// let target = Image::ones((6, 6));
///
/// let report = LithographyPipeline::new(params)
///     .with_seed(3)
///     .run(&mask, &target, None)
///     .unwrap();
/// assert_eq!(report.history.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct LithographyPipeline {
    params: Parameters,
    ga: GaConfig,
    noise_scale: f64,
    gene_flip_probability: f64,
}

impl LithographyPipeline {
    /// GA settings are taken from `params`; tournament size 3, parallel
    /// evaluation, unseeded.
    pub fn new(params: Parameters) -> Self {
        Self {
            ga: GaConfig::from_parameters(&params),
            params,
            noise_scale: 0.02,
            gene_flip_probability: 0.02,
        }
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.ga.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.ga.parallel = parallel;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.ga.tournament_size = k;
        self
    }

    /// Sets the initialization noise scale.
    pub fn with_noise_scale(mut self, scale: f64) -> Self {
        self.noise_scale = scale;
        self
    }

    /// Sets the per-gene flip probability; values outside `[0, 1]` fail
    /// validation in [`run`](Self::run).
    pub fn with_gene_flip_probability(mut self, p: f64) -> Self {
        self.gene_flip_probability = p;
        self
    }

    /// Imaging and GA parameters of this run.
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Runs the pipeline.
    ///
    /// Shape mismatches between `mask`, `target` and `image_size`, and
    /// invalid settings, fail before any simulation. An optimization
    /// failure aborts the run.
    pub fn run(
        &self,
        mask: &Image,
        target: &Image,
        progress: Option<&dyn Fn(Milestone)>,
    ) -> Result<PipelineReport> {
        let notify = |m: Milestone| {
            log::info!("{:>3.0}% {}", m.fraction() * 100.0, m.description());
            if let Some(cb) = progress {
                cb(m);
            }
        };

        let n = self.params.image_size;
        image::ensure_square(mask, n, "mask")?;
        image::ensure_square(target, n, "target")?;

        let simulator = ImagingSimulator::new(self.params.clone())?;
        let evaluator = FitnessEvaluator::new(simulator, target.clone())?;
        let optimizer = MaskOptimizer::from_evaluator(evaluator, mask)?
            .with_noise_scale(self.noise_scale)
            .with_gene_flip_probability(self.gene_flip_probability);
        optimizer.validate()?;
        self.ga.validate()?;
        let simulator = optimizer.evaluator().simulator();

        notify(Milestone::InitialSimulation);
        let initial = simulator.evaluate_pattern(mask, target)?;

        notify(Milestone::Optimizing);
        let result = optimizer.optimize(&self.ga)?;

        notify(Milestone::FinalSimulation);
        let optimized = simulator.evaluate_pattern(&result.best_mask, target)?;

        let report = PipelineReport {
            initial,
            optimized,
            best_mask: result.best_mask,
            best_fitness: result.best_fitness,
            initial_record: result.initial,
            history: result.history,
        };
        notify(Milestone::Complete);
        Ok(report)
    }
}
