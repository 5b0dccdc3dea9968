//! Reward telemetry.
//!
//! The UCB policy publishes the running reward of the path it charged after
//! every decision. Anything implementing [`RewardObserver`] can receive it;
//! closures work directly.

use crate::PathId;

/// One published reward.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardSample {
    pub path: PathId,
    pub reward: f64,
    /// Global round after the decision was counted.
    pub round: u64,
}

pub trait RewardObserver {
    fn on_reward(&mut self, sample: RewardSample);
}

impl<F: FnMut(RewardSample)> RewardObserver for F {
    fn on_reward(&mut self, sample: RewardSample) {
        self(sample)
    }
}

/// Keeps every sample; handy in tests and replays.
#[derive(Debug, Clone, Default)]
pub struct RewardLog {
    pub samples: Vec<RewardSample>,
}

impl RewardObserver for RewardLog {
    fn on_reward(&mut self, sample: RewardSample) {
        self.samples.push(sample);
    }
}
