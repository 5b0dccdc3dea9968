//! Deterministic replay of a fixed 12-round schedule.
//!
//! Bit `r` of the configured mask (least significant bit first) names the path
//! for replay round `r`. Useful for reproducing a known-good or known-bad
//! sequence of choices on two paths.

use crate::config::LOCAL_OPT_ROUNDS;
use crate::{PolicyKind, PolicyState, SchedulerConfig, Selection, SelectionNote, SendContext};

/// Path named by bit `round` of `mask`.
pub fn scheduled_path(mask: u16, round: u32) -> usize {
    usize::from((mask >> (round % LOCAL_OPT_ROUNDS)) & 1 == 1)
}

pub fn select(ctx: &SendContext<'_>, state: &mut PolicyState, cfg: &SchedulerConfig) -> Selection {
    let k = ctx.path_count();
    if k < 2 {
        state.last_used = 0;
        return Selection::one_hot(PolicyKind::LocalOpt, k, 0).note(SelectionNote::SinglePath);
    }

    let round = state.replay_round;
    let chosen = scheduled_path(cfg.local_opt_mask, round);
    state.replay_round = (round + 1) % LOCAL_OPT_ROUNDS;
    state.last_used = chosen;
    Selection::one_hot(PolicyKind::LocalOpt, k, chosen).note(SelectionNote::Replay { round })
}
