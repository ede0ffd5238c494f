//! Core trait definitions for the GA framework.
//!
//! The two central traits, [`Individual`] and [`GaProblem`], define the
//! contract between the evolutionary loop and the problem being solved.

use super::runner::GenerationRecord;
use crate::error::Result;
use rand::Rng;

/// A candidate solution in the GA population.
///
/// Individuals carry their own fitness value. Lower fitness is better.
/// A fitness of `None` marks an individual whose genes changed since it
/// was last evaluated; the runner evaluates exactly those.
pub trait Individual: Clone + Send + Sync {
    /// Returns the current fitness, or `None` if not yet evaluated.
    fn fitness(&self) -> Option<f64>;

    /// Stores a computed fitness.
    fn set_fitness(&mut self, fitness: f64);

    /// Marks the fitness as stale.
    fn invalidate(&mut self);
}

/// Defines a GA optimization problem.
///
/// 1. **Initialization**: How to create individuals
/// 2. **Evaluation**: How to compute fitness
/// 3. **Crossover**: How to recombine a pair in place
/// 4. **Mutation**: How to perturb an individual in place
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync` because the GA runner may evaluate
/// individuals in parallel using rayon. Evaluation must be a pure function
/// of the individual.
pub trait GaProblem: Send + Sync {
    /// The individual (solution) type for this problem.
    type Individual: Individual;

    /// Creates an initial individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Evaluates an individual and returns its fitness (lower is better).
    ///
    /// This is typically the most expensive operation. An error aborts the
    /// run with [`crate::LithoError::OptimizationFailure`].
    fn evaluate(&self, individual: &Self::Individual) -> Result<f64>;

    /// Recombines two individuals in place.
    ///
    /// The default implementation is a no-op.
    fn crossover<R: Rng>(
        &self,
        _first: &mut Self::Individual,
        _second: &mut Self::Individual,
        _rng: &mut R,
    ) {
    }

    /// Mutates an individual in place.
    ///
    /// The default implementation is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rng: &mut R) {}

    /// Called after the initial population and after every generation.
    fn on_generation(&self, _record: &GenerationRecord) {}
}
