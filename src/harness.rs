//! In-memory connection for tests, benches and offline replays.
//!
//! [`StaticConnection`] holds path snapshots directly and applies the small
//! amount of bookkeeping a real transport would (window consumption on send,
//! release on ack, per-path usage counts), so a [`crate::Scheduler`] can be
//! driven without a socket.

use std::time::Duration;

use crate::{Connection, PathId, PathSnapshot, Scheduler};

/// Scripted connection whose paths are plain data.
#[derive(Debug, Clone, Default)]
pub struct StaticConnection {
    pub paths: Vec<PathSnapshot>,
    pub segment_size: u32,
    pub tx_available: u64,
    pub bytes_in_buffer: u64,
}

impl StaticConnection {
    pub fn new(paths: Vec<PathSnapshot>) -> Self {
        Self {
            paths,
            segment_size: 1460,
            tx_available: 0,
            bytes_in_buffer: 0,
        }
    }

    pub fn with_segment_size(mut self, mss: u32) -> Self {
        self.segment_size = mss;
        self
    }

    pub fn with_tx_available(mut self, bytes: u64) -> Self {
        self.tx_available = bytes;
        self
    }

    pub fn with_buffered(mut self, bytes: u64) -> Self {
        self.bytes_in_buffer = bytes;
        self
    }

    pub fn path_mut(&mut self, path: PathId) -> Option<&mut PathSnapshot> {
        self.paths.get_mut(path)
    }

    /// Put `bytes` on `path`: consumes window, adds to flight, drains buffer.
    pub fn send(&mut self, path: PathId, bytes: u64) {
        let Some(p) = self.paths.get_mut(path) else {
            return;
        };
        p.available_window = p.available_window.saturating_sub(bytes);
        p.bytes_in_flight = p.bytes_in_flight.saturating_add(bytes);
        self.bytes_in_buffer = self.bytes_in_buffer.saturating_sub(bytes);
        self.tx_available = self.tx_available.saturating_sub(bytes);
    }

    /// Acknowledge `bytes` on `path` with a fresh RTT sample.
    pub fn ack(&mut self, path: PathId, bytes: u64, rtt: Duration) {
        let Some(p) = self.paths.get_mut(path) else {
            return;
        };
        let acked = bytes.min(p.bytes_in_flight);
        p.bytes_in_flight -= acked;
        p.available_window = p.cwnd.saturating_sub(p.bytes_in_flight);
        p.rtt = rtt;
    }
}

impl Connection for StaticConnection {
    fn active_paths(&self) -> Vec<PathSnapshot> {
        self.paths.clone()
    }

    fn segment_size(&self) -> u32 {
        self.segment_size
    }

    fn tx_available(&self) -> u64 {
        self.tx_available
    }

    fn bytes_in_buffer(&self) -> u64 {
        self.bytes_in_buffer
    }

    fn record_path_use(&mut self, path: PathId) {
        if let Some(p) = self.paths.get_mut(path) {
            p.rounds_used = p.rounds_used.saturating_add(1);
        }
    }
}

/// Run `rounds` decisions and return the chosen path of each.
pub fn run_rounds<C: Connection>(sched: &mut Scheduler<C>, rounds: usize) -> Vec<PathId> {
    (0..rounds).map(|_| sched.select_next().chosen).collect()
}
