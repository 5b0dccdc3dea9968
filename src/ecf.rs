//! ECF: earliest completion first.
//!
//! With the fast path saturated, compare the time to drain the send buffer
//! through the fast path against using the slow path now. A `waiting` latch
//! adds hysteresis: once the policy has chosen to wait for the fast path, the
//! slow path has to look twice as good before it is used again.

use crate::path::{FastSlow, RttTie};
use crate::{PolicyKind, PolicyState, Selection, SelectionNote, SendContext};

pub fn select(ctx: &SendContext<'_>, state: &mut PolicyState) -> Selection {
    let k = ctx.path_count();
    if k <= 1 {
        state.last_used = 0;
        return Selection::one_hot(PolicyKind::Ecf, k, 0).note(SelectionNote::SinglePath);
    }
    if ctx.second_path_unmeasured() {
        state.last_used = 1;
        return Selection::one_hot(PolicyKind::Ecf, k, 1).note(SelectionNote::BootstrapUnmeasured);
    }

    let FastSlow { fast, slow } = FastSlow::classify(ctx.paths, RttTie::PreferFirst);
    let (fp, sp) = (&ctx.paths[fast], &ctx.paths[slow]);
    if fp.has_window() {
        state.last_used = fast;
        return Selection::one_hot(PolicyKind::Ecf, k, fast)
            .note(SelectionNote::FastPathAvailable { fast });
    }

    let rtt_f = fp.rtt.as_secs_f64();
    let rtt_s = sp.rtt.as_secs_f64();
    let n = ctx.drain_rounds(fp);
    let delta = fp.rtt_var.max(sp.rtt_var).as_secs_f64();
    let waiting = if state.ecf_waiting { 1.0 } else { 0.0 };

    let (chosen, note) = if n * rtt_f < (1.0 + waiting) * (rtt_s + delta) {
        let slow_rounds = (ctx.bytes_in_buffer / sp.cwnd.max(1)) as f64;
        if slow_rounds * rtt_s >= 2.0 * rtt_f + delta {
            state.ecf_waiting = true;
            (fast, SelectionNote::EcfWaiting)
        } else {
            state.ecf_waiting = false;
            (slow, SelectionNote::SlowPathFallback { slow })
        }
    } else {
        state.ecf_waiting = false;
        (slow, SelectionNote::SlowPathFallback { slow })
    };

    tracing::trace!(
        fast,
        slow,
        n,
        delta,
        waiting = state.ecf_waiting,
        chosen,
        "ECF completion estimate"
    );

    state.last_used = chosen;
    Selection::one_hot(PolicyKind::Ecf, k, chosen).note(note)
}
