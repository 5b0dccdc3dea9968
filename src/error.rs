use thiserror::Error;

/// Errors surfaced at construction and binding time.
///
/// Selection and feedback never fail: every degenerate input has an explicit
/// fallback branch inside the policies.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unknown scheduling policy: {0}")]
    UnknownPolicy(String),

    #[error("mab rate must be finite and > 0, got {0}")]
    InvalidMabRate(f64),

    #[error("blest lambda {name} must be finite and >= 0, got {value}")]
    InvalidBlestLambda { name: &'static str, value: f64 },

    #[error("local-opt mask must fit in 12 bits, got {0:#x}")]
    InvalidLocalOptMask(u16),

    #[error("scheduler is already bound to a connection")]
    AlreadyBound,
}
