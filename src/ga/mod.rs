//! Genetic Algorithm framework.
//!
//! A small trait-based GA engine in the style of a simple evolutionary
//! algorithm: tournament selection, pairwise crossover, per-individual
//! mutation, full generational replacement, and a single-slot hall of
//! fame. Problems plug in by implementing [`GaProblem`].
//!
//! # Core Traits
//!
//! - [`Individual`]: A candidate solution carrying an optional fitness
//! - [`GaProblem`]: Problem definition: initialization, evaluation and operators
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, rates, seed)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Best individual and per-generation statistics
//! - [`GenerationRecord`]: min/avg/max fitness of one generation
//!
//! # Submodules
//!
//! - [`operators`]: Two-point crossover, flip mutation, Gaussian initialization
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Bäck, Fogel & Michalewicz (2000), *Evolutionary Computation 1*, ch. 7

mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner, GenerationRecord};
pub use selection::{select_tournament, tournament};
pub use types::{GaProblem, Individual};
