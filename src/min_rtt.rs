//! Lowest-RTT-first.

use crate::path::{FastSlow, RttTie};
use crate::{PolicyKind, PolicyState, Selection, SelectionNote, SendContext};

/// Prefer the lower-RTT path while it has window; otherwise use the other.
///
/// Only paths 0 and 1 are ranked. Equal RTTs rank path 1 as fast.
pub fn select(ctx: &SendContext<'_>, state: &mut PolicyState) -> Selection {
    let k = ctx.path_count();
    if k <= 1 {
        state.last_used = 0;
        return Selection::one_hot(PolicyKind::MinRtt, k, 0).note(SelectionNote::SinglePath);
    }
    if ctx.second_path_unmeasured() {
        state.last_used = 1;
        return Selection::one_hot(PolicyKind::MinRtt, k, 1)
            .note(SelectionNote::BootstrapUnmeasured);
    }

    let FastSlow { fast, slow } = FastSlow::classify(ctx.paths, RttTie::PreferSecond);
    let (chosen, note) = if ctx.paths[fast].has_window() {
        (fast, SelectionNote::FastPathAvailable { fast })
    } else {
        (slow, SelectionNote::SlowPathFallback { slow })
    };
    state.last_used = chosen;
    Selection::one_hot(PolicyKind::MinRtt, k, chosen).note(note)
}
