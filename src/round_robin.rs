//! Round-robin: the baseline policy.

use crate::{PolicyKind, PolicyState, Selection, SelectionNote, SendContext};

/// Advance to the next path index, wrapping. Availability is not checked.
pub fn select(ctx: &SendContext<'_>, state: &mut PolicyState) -> Selection {
    let k = ctx.path_count();
    if k <= 1 {
        state.last_used = 0;
        return Selection::one_hot(PolicyKind::RoundRobin, k, 0).note(SelectionNote::SinglePath);
    }
    state.last_used = (state.last_used + 1) % k;
    Selection::one_hot(PolicyKind::RoundRobin, k, state.last_used)
}
