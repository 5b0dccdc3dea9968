//! `pathmux`: path selection for multipath transport connections.
//!
//! A multipath connection has several paths (subflows) with their own RTT and
//! congestion window. On every send opportunity something has to decide which
//! path carries the next chunk. `pathmux` is that decision engine: it reads a
//! [`PathSnapshot`] per active path, runs the configured policy, and returns a
//! [`Selection`], a weight vector over the active paths (usually one-hot).
//!
//! The owning connection stays in charge of congestion control, retransmission
//! and framing. The scheduler only reads those values.
//!
//! **Policies** ([`PolicyKind`]):
//! - `RoundRobin`: cycle through paths; the fairness baseline.
//! - `MinRtt`: lowest-RTT path while it has window, else the other one.
//! - `Blest`: like `MinRtt`, but withholds the slow path when sending on it
//!   would likely cause head-of-line blocking. See [`blest`].
//! - `Ecf`: earliest completion first, with a waiting latch. See [`ecf`].
//! - `Mab`: UCB bandit over throughput rewards. See [`ucb`].
//! - `MabDelay`: exponential-weights bandit that learns from delayed loss
//!   feedback. See [`exp_delay`] and [`feedback`].
//! - `LocalOpt`: replays a fixed 12-round bit schedule. See [`local_opt`].
//!
//! `MinRtt`, `Blest` and `Ecf` rank only paths 0 and 1; additional paths get
//! zero weight.
//!
//! **Goals:**
//! - **No per-call failure**: zero paths, one path, unmeasured RTTs and empty
//!   windows all have explicit fallbacks. Bad configuration fails at
//!   construction.
//! - **Deterministic by default**: the only randomness (the `MabDelay`
//!   exploration draw) is seeded from [`SchedulerConfig::seed`].
//! - **Explainable**: every [`Selection`] carries [`SelectionNote`]s.
//!
//! **Non-goals:**
//! - No congestion control, retransmission decisions, or path management.
//! - No fairness beyond what each policy defines.
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//! use pathmux::{PathSnapshot, PolicyKind, Scheduler, SchedulerConfig, StaticConnection};
//!
//! let paths = vec![
//!     PathSnapshot { rtt: Duration::from_millis(80), cwnd: 14_600, available_window: 0, ..Default::default() },
//!     PathSnapshot { rtt: Duration::from_millis(20), cwnd: 14_600, available_window: 2_920, ..Default::default() },
//! ];
//! let mut sched = Scheduler::with_connection(
//!     SchedulerConfig::new(PolicyKind::Ecf),
//!     StaticConnection::new(paths),
//! ).unwrap();
//!
//! let s = sched.select_next();
//! assert_eq!(s.chosen, 1);
//! assert!((s.weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Feedback
//!
//! `MabDelay` learns from [`Scheduler::report_outcome`], called from the
//! connection's ack path with the round the decision was made at
//! ([`Scheduler::current_round`] before the decision). Other policies ignore
//! feedback.
//!
//! ## Logging
//!
//! Decisions are logged through `tracing` at `debug` (one event per decision)
//! and `trace` (policy internals). Install a subscriber to see them.

#![forbid(unsafe_code)]

mod error;
pub use error::Error;

mod config;
pub use config::*;

mod path;
pub use path::{Connection, PathId, PathSnapshot, SendContext};

mod table;
pub use table::PathTable;

mod selection;
pub use selection::*;

pub mod alloc;

mod state;
pub use state::PolicyState;

pub mod blest;
pub mod ecf;
pub mod exp_delay;
pub mod feedback;
pub mod local_opt;
pub mod min_rtt;
pub mod round_robin;
pub mod ucb;

pub mod policy;

mod telemetry;
pub use telemetry::*;

mod scheduler;
pub use scheduler::Scheduler;

mod harness;
pub use harness::*;

pub use exp_delay::ExpWeights;
pub use feedback::{DelayTracker, Feedback};
