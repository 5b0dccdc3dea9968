//! Path snapshots and the connection seam.
//!
//! The scheduler never owns congestion-control state. It reads a
//! [`PathSnapshot`] per active path from whatever implements [`Connection`],
//! decides, and hands the decision back.

use std::time::Duration;

/// Index of a path among the connection's active paths.
///
/// Weight vectors returned by the scheduler are positional: entry `i` belongs
/// to the path with index `i`.
pub type PathId = usize;

/// Read-only view of one path at the moment of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathSnapshot {
    /// Latest RTT sample. Zero means the path has never been measured.
    pub rtt: Duration,
    /// RTT variance estimate.
    pub rtt_var: Duration,
    /// Congestion window in bytes.
    pub cwnd: u64,
    /// Bytes the path can accept right now. Zero means saturated.
    pub available_window: u64,
    /// Unacknowledged bytes on this path.
    pub bytes_in_flight: u64,
    /// How many times the UCB policy has charged this path.
    pub rounds_used: u64,
}

impl PathSnapshot {
    /// Whether an RTT sample has ever been taken on this path.
    pub fn is_measured(&self) -> bool {
        !self.rtt.is_zero()
    }

    /// Whether the path can take more data right now.
    pub fn has_window(&self) -> bool {
        self.available_window > 0
    }

    /// `cwnd / rtt` in bytes per second, or 0 for an unmeasured path.
    pub fn throughput(&self) -> f64 {
        if self.rtt.is_zero() {
            return 0.0;
        }
        self.cwnd as f64 / self.rtt.as_secs_f64()
    }
}

/// What the scheduler needs from the owning connection.
///
/// Implemented by the transport. [`crate::StaticConnection`] is an in-memory
/// implementation for tests and offline replays.
pub trait Connection {
    /// Snapshots of the currently active paths, in path-index order.
    fn active_paths(&self) -> Vec<PathSnapshot>;

    /// Maximum segment size in bytes.
    fn segment_size(&self) -> u32;

    /// Total bytes the connection may still send.
    fn tx_available(&self) -> u64;

    /// Bytes queued in the send buffer.
    fn bytes_in_buffer(&self) -> u64;

    /// Charge one round to `path`; reflected in later `rounds_used` values.
    fn record_path_use(&mut self, path: PathId);
}

impl<T: Connection + ?Sized> Connection for &mut T {
    fn active_paths(&self) -> Vec<PathSnapshot> {
        (**self).active_paths()
    }
    fn segment_size(&self) -> u32 {
        (**self).segment_size()
    }
    fn tx_available(&self) -> u64 {
        (**self).tx_available()
    }
    fn bytes_in_buffer(&self) -> u64 {
        (**self).bytes_in_buffer()
    }
    fn record_path_use(&mut self, path: PathId) {
        (**self).record_path_use(path)
    }
}

/// Everything a policy may read for one decision.
#[derive(Debug, Clone, Copy)]
pub struct SendContext<'a> {
    pub paths: &'a [PathSnapshot],
    pub segment_size: u32,
    pub tx_available: u64,
    pub bytes_in_buffer: u64,
}

impl<'a> SendContext<'a> {
    pub fn new(paths: &'a [PathSnapshot]) -> Self {
        Self {
            paths,
            segment_size: 1460,
            tx_available: 0,
            bytes_in_buffer: 0,
        }
    }

    pub fn from_connection<C: Connection + ?Sized>(conn: &C, paths: &'a [PathSnapshot]) -> Self {
        Self {
            paths,
            segment_size: conn.segment_size(),
            tx_available: conn.tx_available(),
            bytes_in_buffer: conn.bytes_in_buffer(),
        }
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Bootstrap rule shared by the two-path policies: a second path without
    /// an RTT sample must be tried before it can be ranked.
    pub(crate) fn second_path_unmeasured(&self) -> bool {
        self.paths.get(1).is_some_and(|p| !p.is_measured())
    }

    /// Rounds needed to drain the send buffer through `path`: `1 + k / cwnd`.
    pub(crate) fn drain_rounds(&self, path: &PathSnapshot) -> f64 {
        1.0 + (self.bytes_in_buffer / path.cwnd.max(1)) as f64
    }
}

/// How to break an exact RTT tie between path 0 and path 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RttTie {
    /// Equal RTTs rank path 1 as fast.
    PreferSecond,
    /// Equal RTTs rank path 0 as fast.
    PreferFirst,
}

/// Fast/slow split of the first two paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FastSlow {
    pub fast: PathId,
    pub slow: PathId,
}

impl FastSlow {
    pub(crate) fn classify(paths: &[PathSnapshot], tie: RttTie) -> Self {
        let (r0, r1) = (paths[0].rtt, paths[1].rtt);
        let path0_slow = match tie {
            RttTie::PreferSecond => r0 >= r1,
            RttTie::PreferFirst => r0 > r1,
        };
        if path0_slow {
            Self { fast: 1, slow: 0 }
        } else {
            Self { fast: 0, slow: 1 }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn rtt_ms(ms: u64) -> PathSnapshot {
        PathSnapshot {
            rtt: Duration::from_millis(ms),
            ..Default::default()
        }
    }

    #[test]
    fn classify_orders_by_rtt() {
        let paths = [rtt_ms(100), rtt_ms(50)];
        let fs = FastSlow::classify(&paths, RttTie::PreferFirst);
        assert_eq!(fs, FastSlow { fast: 1, slow: 0 });
        let paths = [rtt_ms(20), rtt_ms(50)];
        let fs = FastSlow::classify(&paths, RttTie::PreferSecond);
        assert_eq!(fs, FastSlow { fast: 0, slow: 1 });
    }

    #[test]
    fn classify_tie_rules() {
        let paths = [rtt_ms(30), rtt_ms(30)];
        assert_eq!(FastSlow::classify(&paths, RttTie::PreferSecond).fast, 1);
        assert_eq!(FastSlow::classify(&paths, RttTie::PreferFirst).fast, 0);
    }

    #[test]
    fn drain_rounds_uses_whole_windows() {
        let p = PathSnapshot {
            cwnd: 1000,
            ..Default::default()
        };
        let mut ctx = SendContext::new(std::slice::from_ref(&p));
        ctx.bytes_in_buffer = 2500;
        assert_eq!(ctx.drain_rounds(&p), 3.0);
        let zero = PathSnapshot::default();
        assert!(ctx.drain_rounds(&zero).is_finite());
    }

    #[test]
    fn unmeasured_path_has_zero_throughput() {
        let p = PathSnapshot {
            cwnd: 14_600,
            ..Default::default()
        };
        assert_eq!(p.throughput(), 0.0);
        assert!(!p.is_measured());
    }
}
