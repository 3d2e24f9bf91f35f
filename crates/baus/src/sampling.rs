//! Weighted and uniform sampling without replacement.
//!
//! `weighted_permutation` orders indices by the Efraimidis–Spirakis key
//! `ln(u) / w`, which yields the same distribution as repeatedly drawing an
//! index with probability proportional to its weight and removing it. Indices
//! with zero weight never appear.

use rand::seq::index;
use rand::Rng;

use crate::error::BausError;

/// Check that every weight is finite and non-negative.
pub fn validate_weights(weights: &[f64]) -> Result<(), BausError> {
    match weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        Some((index, &value)) => Err(BausError::InvalidProbability { index, value }),
        None => Ok(()),
    }
}

/// Random order of all positive-weight indices, drawn proportionally to weight.
pub fn weighted_permutation<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Vec<usize> {
    let mut keyed: Vec<(f64, usize)> = weights
        .iter()
        .enumerate()
        .filter(|(_, w)| w.is_finite() && **w > 0.0)
        .map(|(i, &w)| {
            // 1 - [0, 1) keeps u in (0, 1] so ln(u) stays finite.
            let u: f64 = 1.0 - rng.gen::<f64>();
            (u.ln() / w, i)
        })
        .collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    keyed.into_iter().map(|(_, i)| i).collect()
}

/// Up to `k` distinct indices drawn proportionally to weight.
pub fn weighted_sample<R: Rng + ?Sized>(weights: &[f64], k: usize, rng: &mut R) -> Vec<usize> {
    let mut order = weighted_permutation(weights, rng);
    order.truncate(k);
    order
}

/// `k` distinct indices from `0..n`, uniformly at random and in random order.
pub fn uniform_subset<R: Rng + ?Sized>(n: usize, k: usize, rng: &mut R) -> Vec<usize> {
    index::sample(rng, n, k.min(n)).into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim_rng::SimRng;

    #[test]
    fn test_permutation_skips_zero_weights() {
        let mut rng = SimRng::from_seed_u64(1);
        let order = weighted_permutation(&[0.0, 2.0, 0.0, 1.0], &mut rng.0);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 3]);
    }

    #[test]
    fn test_permutation_favours_heavy_weights() {
        let mut rng = SimRng::from_seed_u64(2);
        let mut heavy_first = 0;
        for _ in 0..2000 {
            let order = weighted_permutation(&[1.0, 9.0], &mut rng.0);
            if order[0] == 1 {
                heavy_first += 1;
            }
        }
        // Expected 90%.
        assert!(
            (1700..=1900).contains(&heavy_first),
            "heavy index first {heavy_first} times out of 2000"
        );
    }

    #[test]
    fn test_weighted_sample_is_distinct() {
        let mut rng = SimRng::from_seed_u64(3);
        let picks = weighted_sample(&[1.0; 20], 10, &mut rng.0);
        let mut dedup = picks.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), 10);
    }

    #[test]
    fn test_uniform_subset_caps_at_n() {
        let mut rng = SimRng::from_seed_u64(4);
        assert_eq!(uniform_subset(3, 10, &mut rng.0).len(), 3);
    }

    #[test]
    fn test_validate_weights_rejects_negative_and_nan() {
        assert!(validate_weights(&[1.0, 0.0, 2.5]).is_ok());
        assert_eq!(
            validate_weights(&[1.0, -0.5]),
            Err(BausError::InvalidProbability {
                index: 1,
                value: -0.5
            })
        );
        assert!(validate_weights(&[f64::NAN]).is_err());
    }
}
