//! Scheduler configuration.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Which scheduling policy a [`crate::Scheduler`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PolicyKind {
    /// Cycle through paths, ignoring performance.
    RoundRobin,
    /// Lowest RTT path with window, else the other one.
    #[default]
    MinRtt,
    /// Blocking estimation: withhold the slow path when it would cause
    /// head-of-line blocking.
    Blest,
    /// Earliest completion first, with a waiting latch.
    Ecf,
    /// Upper-confidence-bound bandit over throughput rewards.
    Mab,
    /// Exponential-weights bandit driven by delayed loss feedback.
    MabDelay,
    /// Replay a fixed 12-round bit schedule.
    LocalOpt,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 7] = [
        PolicyKind::RoundRobin,
        PolicyKind::MinRtt,
        PolicyKind::Blest,
        PolicyKind::Ecf,
        PolicyKind::Mab,
        PolicyKind::MabDelay,
        PolicyKind::LocalOpt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::RoundRobin => "round-robin",
            PolicyKind::MinRtt => "min-rtt",
            PolicyKind::Blest => "blest",
            PolicyKind::Ecf => "ecf",
            PolicyKind::Mab => "mab",
            PolicyKind::MabDelay => "mab-delay",
            PolicyKind::LocalOpt => "local-opt",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('_', "-");
        match norm.as_str() {
            "round-robin" | "rr" => Ok(PolicyKind::RoundRobin),
            "min-rtt" | "minrtt" => Ok(PolicyKind::MinRtt),
            "blest" => Ok(PolicyKind::Blest),
            "ecf" => Ok(PolicyKind::Ecf),
            "mab" | "ucb" => Ok(PolicyKind::Mab),
            "mab-delay" | "mab-delayed" => Ok(PolicyKind::MabDelay),
            "local-opt" => Ok(PolicyKind::LocalOpt),
            _ => Err(Error::UnknownPolicy(s.to_string())),
        }
    }
}

/// Number of rounds in a LocalOpt replay schedule.
pub const LOCAL_OPT_ROUNDS: u32 = 12;

/// Full configuration for a [`crate::Scheduler`].
///
/// Read once at construction. Start with [`SchedulerConfig::default()`] and
/// override fields directly or through the `with_*` methods.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerConfig {
    pub policy: PolicyKind,
    /// Divisor applied to UCB reward estimates before adding the confidence term.
    pub mab_rate: f64,
    /// Initial BLEST lambda.
    pub blest_lambda_init: f64,
    /// Amount BLEST lambda grows on every saturated-fast-path decision.
    pub blest_lambda_increment: f64,
    /// LocalOpt schedule; bit `r` picks the path for replay round `r`.
    pub local_opt_mask: u16,
    /// Seed for the MAB-delayed uniform exploration draw.
    pub seed: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::MinRtt,
            mab_rate: 100.0,
            blest_lambda_init: 1000.0,
            blest_lambda_increment: 100.0,
            local_opt_mask: 0,
            seed: 0,
        }
    }
}

impl SchedulerConfig {
    pub fn new(policy: PolicyKind) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn with_mab_rate(mut self, rate: f64) -> Self {
        self.mab_rate = rate;
        self
    }

    pub fn with_blest_lambda(mut self, init: f64, increment: f64) -> Self {
        self.blest_lambda_init = init;
        self.blest_lambda_increment = increment;
        self
    }

    pub fn with_local_opt_mask(mut self, mask: u16) -> Self {
        self.local_opt_mask = mask;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject values no policy can run with.
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.mab_rate.is_finite() && self.mab_rate > 0.0) {
            return Err(Error::InvalidMabRate(self.mab_rate));
        }
        for (name, value) in [
            ("init", self.blest_lambda_init),
            ("increment", self.blest_lambda_increment),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidBlestLambda { name, value });
            }
        }
        if u32::from(self.local_opt_mask) >= 1 << LOCAL_OPT_ROUNDS {
            return Err(Error::InvalidLocalOptMask(self.local_opt_mask));
        }
        Ok(())
    }
}
