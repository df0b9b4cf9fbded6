//! Roulette-wheel (fitness-proportionate) sampling over a weight vector.
//!
//! Used by the exploration branch of the ACS transition rule, where the
//! weights are the unnormalized selection probabilities of the candidates
//! still available for a position.

use rand::Rng;

/// Samples an index with probability proportional to `weights[i]`.
///
/// Negative and non-finite weights count as zero. If every weight is
/// zero, falls back to a uniform choice over all indices. Returns `None`
/// only for an empty slice.
///
/// # Complexity
/// O(n) per draw (linear scan)
pub fn spin<R: Rng>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }

    let total: f64 = weights.iter().map(|&w| clamp(w)).sum();
    if total <= 0.0 || !total.is_finite() {
        return Some(uniform(weights.len(), rng));
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (i, &w) in weights.iter().enumerate() {
        let w = clamp(w);
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = i;
        if cumulative > threshold {
            return Some(i);
        }
    }

    // floating-point fallback
    Some(last_positive)
}

/// Uniform index in `0..n`.
///
/// # Panics
/// Panics if `n == 0`.
#[inline]
pub fn uniform<R: Rng>(n: usize, rng: &mut R) -> usize {
    rng.random_range(0..n)
}

#[inline]
fn clamp(w: f64) -> f64 {
    if w.is_finite() && w > 0.0 {
        w
    } else {
        0.0
    }
}
