//! Exponential-weights bandit with delayed feedback.
//!
//! Keeps a probability simplex over paths. While the weights over the active
//! paths are uniform the policy draws a path uniformly at random (seeded, so
//! tests are reproducible). Otherwise it follows the argmax of the weights. The decision returns the full weight vector so callers can
//! split traffic proportionally if they want to.
//!
//! Feedback handling (learning rate, epochs, cost) lives in
//! [`crate::feedback`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::alloc::{argmax, exp_weights, is_uniform, renormalize};
use crate::{PathId, PathTable, PolicyKind, PolicyState, Selection, SelectionNote, SendContext};

/// Per-path exponential-weights state.
#[derive(Debug, Clone)]
pub struct ExpWeights {
    pub(crate) weights: PathTable<f64>,
    pub(crate) loss: PathTable<f64>,
    pub(crate) exp_loss: PathTable<f64>,
    pub(crate) cost: PathTable<f64>,
    rng: StdRng,
}

impl ExpWeights {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            weights: PathTable::new(),
            loss: PathTable::new(),
            exp_loss: PathTable::new(),
            cost: PathTable::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Grow the tables to cover `k` paths. New paths restart exploration:
    /// every weight goes back to uniform.
    pub(crate) fn ensure_paths(&mut self, k: usize) {
        if self.weights.grow_to(k, 0.0) == 0 {
            return;
        }
        self.loss.grow_to(k, 0.0);
        self.exp_loss.grow_to(k, 0.0);
        self.cost.grow_to(k, 0.0);
        let p = 1.0 / self.weights.len() as f64;
        for w in self.weights.values_mut() {
            *w = p;
        }
    }

    pub(crate) fn reset_losses(&mut self) {
        for l in self.loss.values_mut() {
            *l = 0.0;
        }
    }

    /// Replace `path`'s loss with `eta * cost / weight` and renormalize every
    /// weight as `exp(-loss_i) / Σ exp(-loss_j)`.
    pub(crate) fn reweight(&mut self, path: PathId, cost: f64, eta: f64) {
        *self.cost.entry_or(path, 0.0) = cost;
        let w = self.weights.get(path).copied().unwrap_or(0.0).max(f64::MIN_POSITIVE);
        *self.loss.entry_or(path, 0.0) = eta * cost / w;

        let losses: Vec<f64> = self.loss.values().copied().collect();
        for (el, &l) in self.exp_loss.values_mut().zip(&losses) {
            *el = (-l).exp();
        }
        let probs = exp_weights(&losses);
        for (w, p) in self.weights.values_mut().zip(probs) {
            *w = p;
        }
    }
}

pub fn select(ctx: &SendContext<'_>, state: &mut PolicyState) -> Selection {
    state.global_round += 1;
    let k = ctx.path_count();
    state.exp.ensure_paths(k);

    if k < 2 {
        state.last_used = 0;
        return Selection::one_hot(PolicyKind::MabDelay, k, 0).note(SelectionNote::SinglePath);
    }

    // Paths that went away keep their entries; renormalize over the active ones.
    let weights = renormalize(&state.exp.weights.prefix(k));
    let (chosen, note) = if is_uniform(&weights) {
        (state.exp.rng.random_range(0..k), SelectionNote::UniformDraw)
    } else {
        (argmax(&weights).unwrap_or(0), SelectionNote::WeightArgmax)
    };
    state.last_used = chosen;

    Selection {
        policy: PolicyKind::MabDelay,
        chosen,
        weights,
        reward: None,
        notes: vec![note],
    }
}
