//! Adaptive state retained by one scheduler across calls.

use crate::exp_delay::ExpWeights;
use crate::feedback::DelayTracker;
use crate::{PathId, PathTable, SchedulerConfig};

/// Everything a policy remembers between decisions.
///
/// One instance lives as long as the connection it schedules for. Policies
/// receive it as `&mut PolicyState`; nothing here is shared between
/// connections.
#[derive(Debug, Clone)]
pub struct PolicyState {
    pub(crate) last_used: PathId,
    pub(crate) global_round: u64,
    pub(crate) rewards: PathTable<f64>,
    pub(crate) current_reward: f64,
    pub(crate) blest_lambda: f64,
    pub(crate) ecf_waiting: bool,
    pub(crate) replay_round: u32,
    pub(crate) exp: ExpWeights,
    pub(crate) delay: DelayTracker,
    pub(crate) lost_packets: u32,
}

impl PolicyState {
    pub fn new(cfg: &SchedulerConfig) -> Self {
        Self {
            last_used: 0,
            global_round: 0,
            rewards: PathTable::new(),
            current_reward: 0.0,
            blest_lambda: cfg.blest_lambda_init,
            ecf_waiting: false,
            replay_round: 0,
            exp: ExpWeights::with_seed(cfg.seed),
            delay: DelayTracker::default(),
            lost_packets: 0,
        }
    }

    /// Most recently selected path.
    pub fn last_used(&self) -> PathId {
        self.last_used
    }

    /// Decisions made by the bandit policies so far.
    pub fn global_round(&self) -> u64 {
        self.global_round
    }

    /// Running reward estimate for `path`, if it has been seen.
    pub fn reward_estimate(&self, path: PathId) -> Option<f64> {
        self.rewards.get(path).copied()
    }

    pub fn rewards(&self) -> &PathTable<f64> {
        &self.rewards
    }

    /// Reward published by the last UCB decision.
    pub fn current_reward(&self) -> f64 {
        self.current_reward
    }

    pub fn blest_lambda(&self) -> f64 {
        self.blest_lambda
    }

    pub fn ecf_waiting(&self) -> bool {
        self.ecf_waiting
    }

    /// Position in the LocalOpt schedule, in `0..12`.
    pub fn replay_round(&self) -> u32 {
        self.replay_round
    }

    /// Exponential weights of the delayed-feedback bandit.
    pub fn weights(&self) -> &PathTable<f64> {
        &self.exp.weights
    }

    pub fn losses(&self) -> &PathTable<f64> {
        &self.exp.loss
    }

    /// `exp(-loss)` per path, as of the last feedback.
    pub fn exp_losses(&self) -> &PathTable<f64> {
        &self.exp.exp_loss
    }

    /// Last cost charged to each path by feedback.
    pub fn costs(&self) -> &PathTable<f64> {
        &self.exp.cost
    }

    pub fn epoch(&self) -> u32 {
        self.delay.epoch()
    }

    pub fn delay(&self) -> &DelayTracker {
        &self.delay
    }

    /// Last value passed to [`crate::Scheduler::set_lost_packet_count`].
    pub fn lost_packets(&self) -> u32 {
        self.lost_packets
    }
}
