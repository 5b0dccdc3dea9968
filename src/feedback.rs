//! Delayed feedback for the exponential-weights bandit.
//!
//! The connection reports an outcome some rounds after the decision it belongs
//! to. Each report:
//!
//! 1. records the lag `global_round - decision_round`;
//! 2. starts a new epoch (and clears every loss) once the mean lag reaches
//!    `2^epoch`, which doubles the learning rate's denominator;
//! 3. prices the path:
//!    `cost = min(rtt + lost / 10 + inflight / cwnd / 10, 1)`;
//! 4. overwrites the path's loss with `eta * cost / weight` where
//!    `eta = sqrt(ln K / 2^epoch)`, and renormalizes all weights.

use crate::{PathId, PathSnapshot, PolicyState};

/// One outcome report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feedback {
    pub path: PathId,
    /// Packets declared lost since the decision.
    pub lost: u32,
    /// Bytes in flight on `path` at report time.
    pub bytes_in_flight: u64,
    /// Global round at which the reported decision was made.
    pub decision_round: u64,
}

/// Running feedback-lag statistics and the epoch they drive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelayTracker {
    events: u64,
    lag_total: u64,
    epoch: u32,
}

impl DelayTracker {
    /// Feedback events seen so far.
    pub fn events(&self) -> u64 {
        self.events
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// `2^epoch`.
    pub fn epoch_span(&self) -> f64 {
        2f64.powi(self.epoch as i32)
    }

    pub fn mean_lag(&self) -> f64 {
        if self.events == 0 {
            return 0.0;
        }
        self.lag_total as f64 / self.events as f64
    }

    /// Record one lag. Returns `true` when a new epoch started.
    pub fn record(&mut self, lag: u64) -> bool {
        self.events += 1;
        self.lag_total = self.lag_total.saturating_add(lag);
        if self.mean_lag() >= self.epoch_span() {
            self.epoch += 1;
            return true;
        }
        false
    }

    /// Learning rate for `k` paths in the current epoch.
    pub fn eta(&self, k: usize) -> f64 {
        if k < 2 {
            return 0.0;
        }
        ((k as f64).ln() / self.epoch_span()).sqrt()
    }
}

/// Cost of `path` given a report, clamped to at most 1.
pub fn path_cost(path: &PathSnapshot, lost: u32, bytes_in_flight: u64) -> f64 {
    // A zero window counts as fully occupied.
    let occupancy = if path.cwnd == 0 {
        1.0
    } else {
        bytes_in_flight as f64 / path.cwnd as f64
    };
    let cost = path.rtt.as_secs_f64() + f64::from(lost) / 10.0 + occupancy / 10.0;
    cost.min(1.0)
}

/// Fold one report into `state`. Reports for paths outside `paths` are dropped.
pub fn apply(state: &mut PolicyState, paths: &[PathSnapshot], fb: Feedback) {
    let k = paths.len();
    let Some(snapshot) = paths.get(fb.path) else {
        tracing::trace!(path = fb.path, paths = k, "feedback for inactive path dropped");
        return;
    };
    state.exp.ensure_paths(k);

    let lag = state.global_round.saturating_sub(fb.decision_round);
    if state.delay.record(lag) {
        state.exp.reset_losses();
        tracing::debug!(
            epoch = state.delay.epoch(),
            mean_lag = state.delay.mean_lag(),
            "feedback delay grew, starting new epoch"
        );
    }

    let eta = state.delay.eta(k);
    let cost = path_cost(snapshot, fb.lost, fb.bytes_in_flight);
    state.exp.reweight(fb.path, cost, eta);

    tracing::trace!(
        path = fb.path,
        lag,
        cost,
        eta,
        weight = state.exp.weights.get(fb.path).copied().unwrap_or(0.0),
        "applied delayed feedback"
    );
}
