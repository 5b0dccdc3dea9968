//! Selection envelope for scheduler outputs.
//!
//! Every decision is returned as a [`Selection`]: the weight vector the caller
//! acts on, the chosen path, and a short list of typed notes saying why. Notes
//! are cheap to produce and make decisions easy to log or replay.

use crate::{PathId, PolicyKind};

/// Audit-friendly notes attached to a selection.
///
/// Prefer adding new variants over changing existing semantics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionNote {
    /// No active paths (or no bound connection): fallback `[1.0]`.
    NoActivePaths,

    /// Only one active path; adaptive state was not touched.
    SinglePath,

    /// Path 1 has no RTT sample yet and was chosen to measure it.
    BootstrapUnmeasured,

    /// The fast path had window available.
    FastPathAvailable { fast: PathId },

    /// The fast path was saturated; the slow path was used.
    SlowPathFallback { slow: PathId },

    /// BLEST kept the saturated fast path to avoid head-of-line blocking.
    BlestBlocking {
        x: f64,
        lambda: f64,
        headroom: f64,
    },

    /// ECF latched `waiting` and stayed on the fast path.
    EcfWaiting,

    /// UCB chose a path that had never been charged.
    ExploreUntried,

    /// UCB chose a path that looks freshly established.
    JustEstablished,

    /// UCB chose the maximum score.
    UcbMax { score: f64 },

    /// Uniform draw while the exponential weights are still uniform.
    UniformDraw,

    /// Argmax of the exponential weights.
    WeightArgmax,

    /// LocalOpt replayed bit `round` of its schedule.
    Replay { round: u32 },
}

/// A single scheduling decision.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    /// The policy that produced this decision.
    pub policy: PolicyKind,
    /// The path to send on.
    pub chosen: PathId,
    /// One entry per active path, summing to 1. One-hot for every policy
    /// except MAB-delayed, which returns its probability vector.
    pub weights: Vec<f64>,
    /// Reward published by UCB when it charged `chosen`.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub reward: Option<f64>,
    /// Why this choice happened.
    pub notes: Vec<SelectionNote>,
}

impl Selection {
    /// One-hot selection of `chosen` over `path_count` paths.
    pub fn one_hot(policy: PolicyKind, path_count: usize, chosen: PathId) -> Self {
        let mut weights = vec![0.0; path_count.max(1)];
        let chosen = chosen.min(weights.len() - 1);
        weights[chosen] = 1.0;
        Self {
            policy,
            chosen,
            weights,
            reward: None,
            notes: Vec::new(),
        }
    }

    /// The `[1.0]` sentinel returned when there is nothing to choose from.
    pub fn fallback(policy: PolicyKind) -> Self {
        Self::one_hot(policy, 1, 0).note(SelectionNote::NoActivePaths)
    }

    pub fn note(mut self, note: SelectionNote) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_reward(mut self, reward: f64) -> Self {
        self.reward = Some(reward);
        self
    }

    /// Whether `weights` is the no-paths sentinel.
    pub fn is_fallback(&self) -> bool {
        self.notes.contains(&SelectionNote::NoActivePaths)
    }

    pub fn weight_sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}
