//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → (selection → crossover → mutation →
//! evaluation) × generations.
//!
//! The best individual ever evaluated is kept in a single-slot hall of
//! fame. It is reported as the result but never re-inserted into the
//! population.

use super::config::GaConfig;
use super::selection::select_tournament;
use super::types::{GaProblem, Individual};
use crate::error::{LithoError, Result};
use crate::random::rng_from_option;
use rand::Rng;

/// Fitness statistics of one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationRecord {
    /// Generation index; 0 is the initial population.
    pub generation: usize,
    /// Lowest fitness in the population.
    pub min: f64,
    /// Mean fitness of the population.
    pub avg: f64,
    /// Highest fitness in the population.
    pub max: f64,
    /// Hall-of-fame fitness after this generation.
    pub best: f64,
}

impl GenerationRecord {
    fn from_population<I: Individual>(generation: usize, population: &[I], best: f64) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for f in population.iter().map(|ind| ind.fitness().unwrap_or(f64::INFINITY)) {
            min = min.min(f);
            max = max.max(f);
            sum += f;
        }
        let avg = sum / population.len() as f64;
        Self {
            generation,
            min,
            // summation rounding must not push the mean outside [min, max]
            avg: avg.clamp(min, max),
            max,
            best,
        }
    }
}

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual found during the entire run.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: f64,

    /// Statistics of the initial population.
    pub initial: GenerationRecord,

    /// Statistics after each generation; `history[g - 1]` is generation `g`.
    pub history: Vec<GenerationRecord>,
}

impl<I: Individual> GaResult<I> {
    /// Number of generations executed.
    pub fn generations(&self) -> usize {
        self.history.len()
    }
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &config)?;
/// println!("Best fitness: {}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    ///
    /// Fails with a configuration error if `config` is invalid, and with
    /// [`LithoError::OptimizationFailure`] if any evaluation fails or
    /// yields a non-finite fitness.
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> Result<GaResult<P::Individual>> {
        config.validate()?;

        let mut rng = rng_from_option(config.seed);
        let pop_size = config.population_size;

        // 1. Initialize population
        let mut population: Vec<P::Individual> = (0..pop_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect();

        // 2. Evaluate initial population
        evaluate_population(problem, &mut population, config.parallel, 0)?;

        // 3. Track best
        let mut best = find_best(&population).clone();
        let mut best_fitness = fitness_of(&best);
        let initial = GenerationRecord::from_population(0, &population, best_fitness);
        log_record(&initial);
        problem.on_generation(&initial);

        let mut history = Vec::with_capacity(config.generations);

        // 4. Evolutionary loop
        for gen in 1..=config.generations {
            let mut offspring =
                select_tournament(&population, pop_size, config.tournament_size, &mut rng);
            vary(problem, &mut offspring, config, &mut rng);
            evaluate_population(problem, &mut offspring, config.parallel, gen)?;

            let gen_best = find_best(&offspring);
            if fitness_of(gen_best) < best_fitness {
                best = gen_best.clone();
                best_fitness = fitness_of(&best);
            }

            population = offspring;

            let record = GenerationRecord::from_population(gen, &population, best_fitness);
            log_record(&record);
            problem.on_generation(&record);
            history.push(record);
        }

        Ok(GaResult {
            best,
            best_fitness,
            initial,
            history,
        })
    }
}

/// Crossover over consecutive pairs, then per-individual mutation.
///
/// Every touched individual is invalidated for re-evaluation.
fn vary<P: GaProblem, R: Rng>(
    problem: &P,
    offspring: &mut [P::Individual],
    config: &GaConfig,
    rng: &mut R,
) {
    for i in (1..offspring.len()).step_by(2) {
        if rng.random::<f64>() < config.crossover_rate {
            let (left, right) = offspring.split_at_mut(i);
            let first = &mut left[i - 1];
            let second = &mut right[0];
            problem.crossover(first, second, rng);
            first.invalidate();
            second.invalidate();
        }
    }

    for ind in offspring.iter_mut() {
        if rng.random::<f64>() < config.mutation_rate {
            problem.mutate(ind, rng);
            ind.invalidate();
        }
    }
}

/// Evaluate every individual whose fitness is stale.
fn evaluate_population<P: GaProblem>(
    problem: &P,
    population: &mut [P::Individual],
    parallel: bool,
    generation: usize,
) -> Result<()> {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            return population
                .par_iter_mut()
                .filter(|ind| ind.fitness().is_none())
                .try_for_each(|ind| evaluate_one(problem, ind, generation));
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    population
        .iter_mut()
        .filter(|ind| ind.fitness().is_none())
        .try_for_each(|ind| evaluate_one(problem, ind, generation))
}

fn evaluate_one<P: GaProblem>(
    problem: &P,
    ind: &mut P::Individual,
    generation: usize,
) -> Result<()> {
    let fitness = problem
        .evaluate(ind)
        .map_err(|err| LithoError::OptimizationFailure {
            generation,
            reason: err.to_string(),
        })?;
    if !fitness.is_finite() {
        return Err(LithoError::OptimizationFailure {
            generation,
            reason: format!("non-finite fitness {fitness}"),
        });
    }
    ind.set_fitness(fitness);
    Ok(())
}

/// Find the individual with the best (lowest) fitness; first one wins ties.
fn find_best<I: Individual>(population: &[I]) -> &I {
    let mut best = &population[0];
    for ind in &population[1..] {
        if fitness_of(ind) < fitness_of(best) {
            best = ind;
        }
    }
    best
}

fn fitness_of<I: Individual>(ind: &I) -> f64 {
    ind.fitness().unwrap_or(f64::INFINITY)
}

fn log_record(record: &GenerationRecord) {
    log::debug!(
        "gen {:>4}: min={:.6} avg={:.6} max={:.6} best={:.6}",
        record.generation,
        record.min,
        record.avg,
        record.max,
        record.best
    );
}

// ============================================================================
// Tests
// ============================================================================
