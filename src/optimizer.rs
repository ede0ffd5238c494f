//! Mask optimization by genetic algorithm.
//!
//! [`MaskOptimizer`] seeds a population with noisy copies of an initial
//! mask and evolves it with the [`crate::ga`] engine, scoring each
//! candidate with a [`FitnessEvaluator`]. All knobs arrive through
//! [`GaConfig`] and the optimizer's own fields; nothing is process-global,
//! so independent optimizations can run concurrently.

use crate::error::{LithoError, Result};
use crate::fitness::FitnessEvaluator;
use crate::ga::operators::{flip_mutation, gaussian_perturbation, two_point_crossover};
use crate::ga::{GaConfig, GaProblem, GaRunner, GenerationRecord, Individual};
use crate::image::{self, Image};
use crate::params::Parameters;
use crate::simulator::ImagingSimulator;
use rand::Rng;
use rand_distr::Normal;

/// A candidate mask as a flattened row-major gene vector in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskIndividual {
    /// Pixel transmissions, row-major.
    pub genes: Vec<f64>,
    fitness: Option<f64>,
}

impl MaskIndividual {
    /// An unevaluated individual.
    pub fn new(genes: Vec<f64>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }
}

impl Individual for MaskIndividual {
    fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    fn invalidate(&mut self) {
        self.fitness = None;
    }
}

/// Outcome of [`MaskOptimizer::optimize`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationResult {
    /// Best mask ever evaluated (hall of fame).
    pub best_mask: Image,
    /// Its mean squared error against the target.
    pub best_fitness: f64,
    /// Statistics of the initial population.
    pub initial: GenerationRecord,
    /// Statistics of each generation, in order.
    pub history: Vec<GenerationRecord>,
}

/// Evolves a mask toward a target pattern.
///
/// ```
/// use u_litho::{Image, MaskOptimizer, Parameters};
///
/// let params = Parameters::default()
///     .with_image_size(8)
///     .with_population_size(6)
///     .with_generations(2);
/// let mask = Image::from_elem((8, 8), 0.5);
/// let target = Image::ones((8, 8));
///
/// let optimizer = MaskOptimizer::new(params, &mask, target).unwrap();
/// let config = optimizer.default_config().with_seed(1);
/// let result = optimizer.optimize(&config).unwrap();
/// assert_eq!(result.best_mask.dim(), (8, 8));
/// assert_eq!(result.history.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MaskOptimizer {
    evaluator: FitnessEvaluator,
    initial_genes: Vec<f64>,

    /// Standard deviation of the per-pixel Gaussian noise used to seed the
    /// population.
    pub noise_scale: f64,

    /// Per-gene flip probability once an individual is chosen for mutation.
    pub gene_flip_probability: f64,
}

impl MaskOptimizer {
    /// Creates an optimizer for `params`.
    ///
    /// Both `initial_mask` and `target` must be `image_size × image_size`.
    pub fn new(params: Parameters, initial_mask: &Image, target: Image) -> Result<Self> {
        let simulator = ImagingSimulator::new(params)?;
        let evaluator = FitnessEvaluator::new(simulator, target)?;
        Self::from_evaluator(evaluator, initial_mask)
    }

    /// Creates an optimizer around an existing evaluator.
    pub fn from_evaluator(evaluator: FitnessEvaluator, initial_mask: &Image) -> Result<Self> {
        image::ensure_square(
            initial_mask,
            evaluator.simulator().image_size(),
            "initial mask",
        )?;
        Ok(Self {
            initial_genes: image::flatten(initial_mask),
            evaluator,
            noise_scale: 0.02,
            gene_flip_probability: 0.02,
        })
    }

    /// Sets the initialization noise scale.
    pub fn with_noise_scale(mut self, scale: f64) -> Self {
        self.noise_scale = scale;
        self
    }

    /// Sets the per-gene flip probability. Values outside `[0, 1]` are
    /// rejected by [`validate`](Self::validate).
    pub fn with_gene_flip_probability(mut self, p: f64) -> Self {
        self.gene_flip_probability = p;
        self
    }

    /// The evaluator scoring candidate masks.
    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    /// GA configuration taken from the simulator's [`Parameters`].
    pub fn default_config(&self) -> GaConfig {
        GaConfig::from_parameters(self.evaluator.simulator().params())
    }

    /// Validates the operator settings.
    pub fn validate(&self) -> Result<()> {
        if !self.noise_scale.is_finite() || self.noise_scale < 0.0 {
            return Err(LithoError::invalid(
                "noise_scale",
                format!("{} must be finite and non-negative", self.noise_scale),
            ));
        }
        if !(0.0..=1.0).contains(&self.gene_flip_probability) {
            return Err(LithoError::invalid(
                "gene_flip_probability",
                format!("{} is outside [0, 1]", self.gene_flip_probability),
            ));
        }
        Ok(())
    }

    /// Runs the optimization for `config.generations` generations.
    pub fn optimize(&self, config: &GaConfig) -> Result<OptimizationResult> {
        self.validate()?;
        let noise = Normal::new(0.0, self.noise_scale)
            .map_err(|err| LithoError::invalid("noise_scale", err.to_string()))?;
        let problem = MaskProblem {
            evaluator: &self.evaluator,
            initial_genes: &self.initial_genes,
            noise,
            gene_flip_probability: self.gene_flip_probability,
        };

        let params = self.evaluator.simulator().params();
        log::info!(
            "optimizing {n}x{n} mask ({} genes): population={}, generations={}, cx={}, mut={}",
            params.pixel_count(),
            config.population_size,
            config.generations,
            config.crossover_rate,
            config.mutation_rate,
            n = params.image_size,
        );

        let result = GaRunner::run(&problem, config)?;
        let best_mask = image::from_genes(&result.best.genes, params.image_size)?;

        log::info!(
            "optimization complete: best fitness {:.6} (initial best {:.6})",
            result.best_fitness,
            result.initial.min
        );

        Ok(OptimizationResult {
            best_mask,
            best_fitness: result.best_fitness,
            initial: result.initial,
            history: result.history,
        })
    }
}

/// [`GaProblem`] binding of one optimization run.
struct MaskProblem<'a> {
    evaluator: &'a FitnessEvaluator,
    initial_genes: &'a [f64],
    noise: Normal<f64>,
    gene_flip_probability: f64,
}

impl GaProblem for MaskProblem<'_> {
    type Individual = MaskIndividual;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> MaskIndividual {
        MaskIndividual::new(gaussian_perturbation(self.initial_genes, &self.noise, rng))
    }

    fn evaluate(&self, individual: &MaskIndividual) -> Result<f64> {
        self.evaluator.evaluate(&individual.genes)
    }

    fn crossover<R: Rng>(
        &self,
        first: &mut MaskIndividual,
        second: &mut MaskIndividual,
        rng: &mut R,
    ) {
        two_point_crossover(&mut first.genes, &mut second.genes, rng);
    }

    fn mutate<R: Rng>(&self, individual: &mut MaskIndividual, rng: &mut R) {
        flip_mutation(&mut individual.genes, self.gene_flip_probability, rng);
    }
}
