//! Tournament selection.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::types::Individual;
use rand::Rng;

/// Picks `k` individuals uniformly with replacement and returns the index
/// of the one with the lowest fitness (first one wins ties).
///
/// Unevaluated individuals rank last.
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament<I: Individual, R: Rng>(population: &[I], k: usize, rng: &mut R) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if key(&population[idx]) < key(&population[best_idx]) {
            best_idx = idx;
        }
    }
    best_idx
}

/// Builds a mating pool of `count` clones chosen by repeated tournaments.
pub fn select_tournament<I: Individual, R: Rng>(
    population: &[I],
    count: usize,
    k: usize,
    rng: &mut R,
) -> Vec<I> {
    (0..count)
        .map(|_| population[tournament(population, k, rng)].clone())
        .collect()
}

fn key<I: Individual>(ind: &I) -> f64 {
    ind.fitness().unwrap_or(f64::INFINITY)
}
