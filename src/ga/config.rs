//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.
//! It is passed explicitly to the runner; nothing is registered globally.

use crate::error::{LithoError, Result};
use crate::params::Parameters;

/// Configuration for the Genetic Algorithm.
///
/// Controls population size, generation budget, operator rates,
/// tournament size, parallelism and seeding.
///
/// # Defaults
///
/// ```
/// use u_litho::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.generations, 20);
/// assert_eq!(config.tournament_size, 3);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_litho::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(10)
///     .with_generations(5)
///     .with_crossover_rate(0.0)
///     .with_mutation_rate(0.0)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of individuals in the population.
    pub population_size: usize,

    /// Number of generations to run. There is no early stopping.
    pub generations: usize,

    /// Probability of applying crossover to each consecutive pair (0.0–1.0).
    pub crossover_rate: f64,

    /// Probability of attempting mutation on each individual (0.0–1.0).
    pub mutation_rate: f64,

    /// Number of contestants drawn (with replacement) per tournament.
    pub tournament_size: usize,

    /// Whether to evaluate individuals in parallel using rayon.
    ///
    /// Ignored when the `parallel` feature is disabled. Results are the
    /// same either way: only evaluation is parallel, all random draws
    /// happen on the calling thread.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 20,
            crossover_rate: 0.4,
            mutation_rate: 0.4,
            tournament_size: 3,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Takes population size, generation count and rates from `params`.
    pub fn from_parameters(params: &Parameters) -> Self {
        Self {
            population_size: params.population_size,
            generations: params.generations,
            crossover_rate: params.crossover_rate,
            mutation_rate: params.mutation_rate,
            ..Self::default()
        }
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(LithoError::invalid("population_size", "must be at least 1"));
        }
        if self.tournament_size == 0 {
            return Err(LithoError::invalid("tournament_size", "must be at least 1"));
        }
        for (name, rate) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(LithoError::invalid(name, format!("{rate} is outside [0, 1]")));
            }
        }
        Ok(())
    }
}
