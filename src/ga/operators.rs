//! Genetic operators for real-valued gene vectors.
//!
//! # Crossover Operators
//!
//! - [`two_point_crossover`]: exchange the segment between two cut points
//!
//! # Mutation Operators
//!
//! - [`flip_mutation`]: per-gene flip between "off" (0) and "on" (1)
//!
//! # Initialization
//!
//! - [`gaussian_perturbation`]: a base vector plus clipped Gaussian noise

use rand::Rng;
use rand_distr::{Distribution, Normal};

// ============================================================================
// Crossover operators
// ============================================================================

/// Two-point crossover, in place.
///
/// Draws cut points `1 ≤ p1 < p2 ≤ len` and swaps `a[p1..p2]` with
/// `b[p1..p2]`. The leading gene is never exchanged and the swapped
/// segment is never empty. Vectors shorter than two genes are left
/// unchanged; for unequal lengths only the common prefix takes part.
pub fn two_point_crossover<T, R: Rng>(a: &mut [T], b: &mut [T], rng: &mut R) {
    let size = a.len().min(b.len());
    if size < 2 {
        return;
    }
    let mut p1 = rng.random_range(1..=size);
    let mut p2 = rng.random_range(1..size);
    if p2 >= p1 {
        p2 += 1;
    } else {
        std::mem::swap(&mut p1, &mut p2);
    }
    a[p1..p2].swap_with_slice(&mut b[p1..p2]);
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Flip mutation: each gene independently, with `probability`, becomes
/// 1 if it was exactly 0 and 0 otherwise.
///
/// Output genes stay within `[0, 1]`.
pub fn flip_mutation<R: Rng>(genes: &mut [f64], probability: f64, rng: &mut R) {
    for gene in genes.iter_mut() {
        if rng.random::<f64>() < probability {
            *gene = if *gene == 0.0 { 1.0 } else { 0.0 };
        }
    }
}

// ============================================================================
// Initialization
// ============================================================================

/// Adds independent Gaussian noise to every gene of `base` and clips the
/// result to `[0, 1]`.
pub fn gaussian_perturbation<R: Rng>(base: &[f64], noise: &Normal<f64>, rng: &mut R) -> Vec<f64> {
    base.iter()
        .map(|&g| (g + noise.sample(rng)).clamp(0.0, 1.0))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    // ---- Two-point crossover ----

    #[test]
    fn test_two_point_swaps_one_contiguous_segment() {
        let mut rng = create_rng(42);
        for _ in 0..200 {
            let mut a: Vec<u32> = vec![0; 10];
            let mut b: Vec<u32> = vec![1; 10];
            two_point_crossover(&mut a, &mut b, &mut rng);

            let swapped: Vec<usize> = (0..10).filter(|&i| a[i] == 1).collect();
            assert!(!swapped.is_empty(), "segment must not be empty");
            assert!(swapped[0] >= 1, "first gene is never exchanged");
            for w in swapped.windows(2) {
                assert_eq!(w[1], w[0] + 1, "segment must be contiguous: {a:?}");
            }
            for i in 0..10 {
                assert_eq!(a[i] + b[i], 1, "genes must be exchanged, not copied");
            }
        }
    }

    #[test]
    fn test_two_point_reaches_last_gene() {
        let mut rng = create_rng(5);
        let mut hit_last = false;
        for _ in 0..500 {
            let mut a = [0u8; 4];
            let mut b = [1u8; 4];
            two_point_crossover(&mut a, &mut b, &mut rng);
            hit_last |= a[3] == 1;
        }
        assert!(hit_last);
    }

    #[test]
    fn test_two_point_short_vectors_unchanged() {
        let mut rng = create_rng(42);
        let mut a = [0.3];
        let mut b = [0.7];
        two_point_crossover(&mut a, &mut b, &mut rng);
        assert_eq!((a, b), ([0.3], [0.7]));

        let mut a: [f64; 0] = [];
        let mut b: [f64; 0] = [];
        two_point_crossover(&mut a, &mut b, &mut rng);
    }

    #[test]
    fn test_two_point_two_genes() {
        // Only possible cut is [1, 2): the second gene swaps.
        let mut rng = create_rng(42);
        let mut a = [0.0, 0.0];
        let mut b = [1.0, 1.0];
        two_point_crossover(&mut a, &mut b, &mut rng);
        assert_eq!(a, [0.0, 1.0]);
        assert_eq!(b, [1.0, 0.0]);
    }

    // ---- Flip mutation ----

    #[test]
    fn test_flip_probability_one() {
        let mut rng = create_rng(1);
        let mut genes = vec![0.0, 0.4, 1.0, 0.0];
        flip_mutation(&mut genes, 1.0, &mut rng);
        assert_eq!(genes, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_flip_probability_zero() {
        let mut rng = create_rng(1);
        let mut genes = vec![0.0, 0.4, 1.0];
        flip_mutation(&mut genes, 0.0, &mut rng);
        assert_eq!(genes, vec![0.0, 0.4, 1.0]);
    }

    #[test]
    fn test_flip_rate_is_roughly_probability() {
        let mut rng = create_rng(77);
        let mut genes = vec![0.5; 20_000];
        flip_mutation(&mut genes, 0.02, &mut rng);
        let flipped = genes.iter().filter(|&&g| g == 0.0).count();
        // expected 400
        assert!((250..550).contains(&flipped), "flipped {flipped}");
    }

    // ---- Gaussian perturbation ----

    #[test]
    fn test_perturbation_clipped() {
        let mut rng = create_rng(42);
        let noise = Normal::new(0.0, 0.5).unwrap();
        let base = vec![0.0, 1.0, 0.5, 0.99, 0.01];
        for _ in 0..100 {
            let genes = gaussian_perturbation(&base, &noise, &mut rng);
            assert_eq!(genes.len(), base.len());
            assert!(genes.iter().all(|g| (0.0..=1.0).contains(g)));
        }
    }

    #[test]
    fn test_perturbation_small_noise_stays_close() {
        let mut rng = create_rng(42);
        let noise = Normal::new(0.0, 0.02).unwrap();
        let base = vec![0.5; 1000];
        let genes = gaussian_perturbation(&base, &noise, &mut rng);
        let mean: f64 = genes.iter().sum::<f64>() / genes.len() as f64;
        assert!((mean - 0.5).abs() < 0.01);
        assert!(genes.iter().all(|g| (g - 0.5).abs() < 0.2));
    }

    #[test]
    fn test_perturbation_zero_noise_is_identity() {
        let mut rng = create_rng(42);
        let noise = Normal::new(0.0, 0.0).unwrap();
        let base = vec![0.1, 0.2, 0.3];
        assert_eq!(gaussian_perturbation(&base, &noise, &mut rng), base);
    }
}
