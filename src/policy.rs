//! Dispatch from [`PolicyKind`] to the policy implementations.
//!
//! The set of policies is closed and known at compile time, so dispatch is a
//! plain `match` rather than a trait object. Every policy has the same shape:
//! read a [`SendContext`], update [`PolicyState`], return a [`Selection`].

use crate::{blest, ecf, exp_delay, local_opt, min_rtt, round_robin, ucb};
use crate::{PolicyKind, PolicyState, SchedulerConfig, Selection, SendContext};

/// Run the policy named by `cfg.policy`.
///
/// With no active paths this returns the `[1.0]` fallback without touching
/// `state`.
pub fn select(cfg: &SchedulerConfig, ctx: &SendContext<'_>, state: &mut PolicyState) -> Selection {
    if ctx.paths.is_empty() {
        return Selection::fallback(cfg.policy);
    }
    match cfg.policy {
        PolicyKind::RoundRobin => round_robin::select(ctx, state),
        PolicyKind::MinRtt => min_rtt::select(ctx, state),
        PolicyKind::Blest => blest::select(ctx, state, cfg),
        PolicyKind::Ecf => ecf::select(ctx, state),
        PolicyKind::Mab => ucb::select(ctx, state, cfg),
        PolicyKind::MabDelay => exp_delay::select(ctx, state),
        PolicyKind::LocalOpt => local_opt::select(ctx, state, cfg),
    }
}
