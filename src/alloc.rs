//! Allocation helpers (exponential weights, renormalization).
//!
//! Deterministic utilities for turning per-path losses into a probability
//! distribution in a stable way.

/// `exp(-loss_i) / Σ_j exp(-loss_j)` over `losses`.
///
/// - Uses the min-loss shift for numerical stability (the ratio is unchanged).
/// - Non-finite or degenerate inputs fall back to uniform.
/// - Returns an empty vector for empty input.
pub fn exp_weights(losses: &[f64]) -> Vec<f64> {
    if losses.is_empty() {
        return Vec::new();
    }
    let min_l = losses
        .iter()
        .copied()
        .filter(|l| l.is_finite())
        .fold(f64::INFINITY, f64::min);
    let min_l = if min_l.is_finite() { min_l } else { 0.0 };

    let mut w: Vec<f64> = Vec::with_capacity(losses.len());
    let mut denom = 0.0;
    for &l in losses {
        let x = if l.is_nan() { 0.0 } else { (-(l - min_l)).exp() };
        denom += x;
        w.push(x);
    }
    if denom <= 0.0 || !denom.is_finite() {
        return uniform(losses.len());
    }
    for x in &mut w {
        *x /= denom;
    }
    w
}

/// Scale `weights` to sum to 1, or uniform if that is impossible.
pub fn renormalize(weights: &[f64]) -> Vec<f64> {
    let sum: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
    if sum <= 0.0 || !sum.is_finite() {
        return uniform(weights.len());
    }
    weights
        .iter()
        .map(|&w| if w.is_finite() && w > 0.0 { w / sum } else { 0.0 })
        .collect()
}

pub fn uniform(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    vec![1.0 / n as f64; n]
}

/// Whether every weight equals `1/n` up to float noise.
pub fn is_uniform(weights: &[f64]) -> bool {
    let p = 1.0 / weights.len().max(1) as f64;
    weights.iter().all(|w| (w - p).abs() <= 1e-12)
}

/// Index of the largest weight; the first one wins ties.
pub fn argmax(weights: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &w) in weights.iter().enumerate() {
        match best {
            Some((_, b)) if w <= b => {}
            _ => best = Some((i, w)),
        }
    }
    best.map(|(i, _)| i)
}
