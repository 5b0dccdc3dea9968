//! Scheduler facade: the one object a connection talks to.
//!
//! ```text
//! let s = scheduler.select_next();                 // before each send
//! send_on(s.chosen);                               // your code
//! scheduler.report_outcome(path, lost, inflight, round);  // on ack processing
//! ```
//!
//! All calls are synchronous and bounded. Mutating calls take `&mut self`, so
//! sharing a scheduler between threads requires wrapping it in a lock.

use crate::feedback::{self, Feedback};
use crate::telemetry::{RewardObserver, RewardSample};
use crate::{policy, Connection, Error, PathId, PolicyKind, PolicyState, SchedulerConfig};
use crate::{Selection, SendContext};

/// Path scheduler bound to one connection.
///
/// ## Lifecycle
///
/// ```rust
/// use std::time::Duration;
/// use pathmux::{PathSnapshot, PolicyKind, Scheduler, SchedulerConfig, StaticConnection};
///
/// let path = |ms: u64, avail: u64| PathSnapshot {
///     rtt: Duration::from_millis(ms),
///     cwnd: 14_600,
///     available_window: avail,
///     ..Default::default()
/// };
/// let conn = StaticConnection::new(vec![path(100, 0), path(50, 1460)]);
///
/// let mut sched = Scheduler::new(SchedulerConfig::new(PolicyKind::MinRtt)).unwrap();
/// sched.bind(conn).unwrap();
///
/// let s = sched.select_next();
/// assert_eq!(s.chosen, 1);
/// assert_eq!(s.weights, vec![0.0, 1.0]);
/// ```
pub struct Scheduler<C> {
    cfg: SchedulerConfig,
    state: PolicyState,
    conn: Option<C>,
    observer: Option<Box<dyn RewardObserver>>,
}

impl<C: Connection> Scheduler<C> {
    /// Create an unbound scheduler. Invalid configuration fails here.
    pub fn new(cfg: SchedulerConfig) -> Result<Self, Error> {
        cfg.validate()?;
        Ok(Self {
            state: PolicyState::new(&cfg),
            cfg,
            conn: None,
            observer: None,
        })
    }

    /// Create and bind in one step.
    pub fn with_connection(cfg: SchedulerConfig, conn: C) -> Result<Self, Error> {
        let mut s = Self::new(cfg)?;
        s.bind(conn)?;
        Ok(s)
    }

    /// Receive the reward published after every UCB decision.
    pub fn with_observer(mut self, observer: impl RewardObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Attach the owning connection. Only one bind is allowed.
    pub fn bind(&mut self, conn: C) -> Result<(), Error> {
        if self.conn.is_some() {
            tracing::warn!(policy = %self.cfg.policy, "scheduler bound twice");
            return Err(Error::AlreadyBound);
        }
        self.conn = Some(conn);
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.conn.is_some()
    }

    /// Decide which path carries the next chunk.
    ///
    /// Returns one weight per active path, summing to 1. With no active paths
    /// (or before [`Scheduler::bind`]) the result is the `[1.0]` fallback
    /// meaning "use path 0".
    pub fn select_next(&mut self) -> Selection {
        let Some(conn) = self.conn.as_mut() else {
            return Selection::fallback(self.cfg.policy);
        };
        let paths = conn.active_paths();
        let ctx = SendContext::from_connection(&*conn, &paths);
        let sel = policy::select(&self.cfg, &ctx, &mut self.state);

        if let Some(reward) = sel.reward {
            conn.record_path_use(sel.chosen);
            if let Some(obs) = self.observer.as_mut() {
                obs.on_reward(RewardSample {
                    path: sel.chosen,
                    reward,
                    round: self.state.global_round,
                });
            }
        }

        tracing::debug!(
            policy = %self.cfg.policy,
            chosen = sel.chosen,
            paths = paths.len(),
            round = self.state.global_round,
            "selected path"
        );
        sel
    }

    /// Report the outcome of an earlier decision made at `decision_round`.
    ///
    /// Only the delayed-feedback bandit learns from this; every other policy
    /// ignores it.
    pub fn report_outcome(
        &mut self,
        path: PathId,
        lost: u32,
        bytes_in_flight: u64,
        decision_round: u64,
    ) {
        if self.cfg.policy != PolicyKind::MabDelay {
            return;
        }
        let Some(conn) = self.conn.as_ref() else {
            return;
        };
        let paths = conn.active_paths();
        feedback::apply(
            &mut self.state,
            &paths,
            Feedback {
                path,
                lost,
                bytes_in_flight,
                decision_round,
            },
        );
    }

    /// Store an externally measured loss count. No policy reads it yet.
    pub fn set_lost_packet_count(&mut self, count: u32) {
        self.state.lost_packets = count;
    }

    /// Current global round; tag decisions with it for [`Self::report_outcome`].
    pub fn current_round(&self) -> u64 {
        self.state.global_round
    }

    /// Reward published by the last UCB decision.
    pub fn current_reward(&self) -> f64 {
        self.state.current_reward
    }

    pub fn policy_kind(&self) -> PolicyKind {
        self.cfg.policy
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.cfg
    }

    pub fn state(&self) -> &PolicyState {
        &self.state
    }

    pub fn connection(&self) -> Option<&C> {
        self.conn.as_ref()
    }

    pub fn connection_mut(&mut self) -> Option<&mut C> {
        self.conn.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::fixtures::path;
    use crate::{RewardLog, StaticConnection};
    use std::cell::RefCell;
    use std::rc::Rc;

    const MSS: u64 = 1460;

    fn two_paths() -> StaticConnection {
        StaticConnection::new(vec![path(100, 10 * MSS, 0), path(50, 10 * MSS, MSS)])
            .with_tx_available(1_000_000)
    }

    #[test]
    fn unbound_scheduler_returns_fallback() {
        let mut s: Scheduler<StaticConnection> =
            Scheduler::new(SchedulerConfig::default()).unwrap();
        let sel = s.select_next();
        assert_eq!(sel.weights, vec![1.0]);
        assert!(sel.is_fallback());
    }

    #[test]
    fn no_active_paths_returns_fallback() {
        let mut s = Scheduler::with_connection(
            SchedulerConfig::new(PolicyKind::Mab),
            StaticConnection::new(Vec::new()),
        )
        .unwrap();
        assert_eq!(s.select_next().weights, vec![1.0]);
        assert_eq!(s.current_round(), 0);
    }

    #[test]
    fn bind_twice_fails() {
        let mut s = Scheduler::new(SchedulerConfig::default()).unwrap();
        assert!(!s.is_bound());
        s.bind(two_paths()).unwrap();
        assert!(s.is_bound());
        assert_eq!(s.bind(two_paths()), Err(Error::AlreadyBound));
    }

    #[test]
    fn invalid_config_fails_at_construction() {
        let cfg = SchedulerConfig::default().with_mab_rate(-1.0);
        assert!(Scheduler::<StaticConnection>::new(cfg).is_err());
    }

    #[test]
    fn min_rtt_picks_fast_path() {
        let mut s = Scheduler::with_connection(SchedulerConfig::default(), two_paths()).unwrap();
        assert_eq!(s.select_next().chosen, 1);
        assert_eq!(s.state().last_used(), 1);
    }

    #[test]
    fn mab_charges_the_connection_and_publishes_reward() {
        let log = Rc::new(RefCell::new(RewardLog::default()));
        let sink = Rc::clone(&log);
        let mut s = Scheduler::with_connection(SchedulerConfig::new(PolicyKind::Mab), two_paths())
            .unwrap()
            .with_observer(move |r: RewardSample| sink.borrow_mut().on_reward(r));

        let first = s.select_next();
        assert_eq!(first.chosen, 0, "first untried path is explored");
        let second = s.select_next();
        assert_eq!(second.chosen, 1);

        let conn = s.connection().unwrap();
        assert_eq!(conn.paths[0].rounds_used, 1);
        assert_eq!(conn.paths[1].rounds_used, 1);
        assert_eq!(s.current_round(), 2);

        let samples = &log.borrow().samples;
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].path, 1);
        assert_eq!(samples[1].round, 2);
        assert_eq!(samples[1].reward, s.current_reward());
    }

    #[test]
    fn report_outcome_is_ignored_outside_mab_delay() {
        let mut s = Scheduler::with_connection(SchedulerConfig::new(PolicyKind::Mab), two_paths())
            .unwrap();
        s.report_outcome(0, 5, 1000, 0);
        assert_eq!(s.state().delay().events(), 0);
        assert!(s.state().weights().is_empty());
    }

    #[test]
    fn report_outcome_reweights_under_mab_delay() {
        let mut s =
            Scheduler::with_connection(SchedulerConfig::new(PolicyKind::MabDelay), two_paths())
                .unwrap();
        let round = s.current_round();
        s.select_next();
        s.report_outcome(0, 4, 10 * MSS, round);
        let sel = s.select_next();
        assert_eq!(sel.chosen, 1);
        assert!(sel.weights[1] > sel.weights[0]);
        assert!((sel.weight_sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn borrowed_connection_stays_with_the_caller() {
        let mut conn = two_paths();
        {
            let cfg = SchedulerConfig::new(PolicyKind::Mab).with_mab_rate(10.0);
            let mut s = Scheduler::with_connection(cfg, &mut conn).unwrap();
            assert_eq!(s.policy_kind(), PolicyKind::Mab);
            assert_eq!(s.config().mab_rate, 10.0);
            s.select_next();
        }
        assert_eq!(conn.paths[0].rounds_used, 1);
    }

    #[test]
    fn lost_packet_count_is_stored() {
        let mut s = Scheduler::with_connection(SchedulerConfig::default(), two_paths()).unwrap();
        s.set_lost_packet_count(9);
        assert_eq!(s.state().lost_packets(), 9);
        assert_eq!(s.select_next().chosen, 1);
    }
}
