//! UCB bandit over per-path throughput rewards.
//!
//! Each decision observes an instantaneous reward for every active path
//! (`cwnd / rtt`, divided by the rounds needed to drain the send buffer when
//! the path is saturated), folds it into a running mean weighted by how often
//! the path has been charged, and picks the path with the best
//! upper-confidence score:
//!
//! ```text
//!   score(p) = estimate(p) / mab_rate + sqrt(2 ln(delta) / rounds_used(p))
//!   delta    = 1 + r * ln(r)^2            (r = global round, delta = 1 at r = 0)
//! ```
//!
//! A path that has never been charged has an unbounded confidence term, so it
//! is always explored before any charged path.

use crate::{PathId, PathSnapshot, PolicyKind, PolicyState, SchedulerConfig, Selection};
use crate::{SelectionNote, SendContext};

/// Reward observed for `path` at this decision.
pub(crate) fn observed_reward(ctx: &SendContext<'_>, path: &PathSnapshot) -> f64 {
    if !path.is_measured() || path.cwnd == 0 {
        return 0.0;
    }
    if path.has_window() {
        path.throughput()
    } else {
        path.throughput() / ctx.drain_rounds(path)
    }
}

/// Exploration width `delta = 1 + r ln(r)^2`.
pub(crate) fn exploration_delta(global_round: u64) -> f64 {
    if global_round == 0 {
        return 1.0;
    }
    let r = global_round as f64;
    let ln = r.ln();
    1.0 + r * ln * ln
}

pub fn select(ctx: &SendContext<'_>, state: &mut PolicyState, cfg: &SchedulerConfig) -> Selection {
    let k = ctx.path_count();
    if k < 2 {
        state.last_used = 0;
        return Selection::one_hot(PolicyKind::Mab, k, 0).note(SelectionNote::SinglePath);
    }

    let delta = exploration_delta(state.global_round);
    let mut untried: Option<PathId> = None;
    let mut fresh: Option<PathId> = None;
    let mut best: Option<(PathId, f64)> = None;

    for (pid, p) in ctx.paths.iter().enumerate() {
        let reward = observed_reward(ctx, p);
        let n = p.rounds_used as f64;
        let est = state.rewards.entry_or(pid, 0.0);
        *est = (*est * n + reward) / (n + 1.0);
        let est = *est;

        if p.rounds_used == 0 {
            untried.get_or_insert(pid);
            continue;
        }
        let confidence = (2.0 * delta.ln() / n).sqrt();
        let score = est / cfg.mab_rate + confidence;
        tracing::trace!(path = pid, reward, est, confidence, score, "UCB score");

        if est == 0.0 && confidence == 1.0 {
            fresh.get_or_insert(pid);
        }
        // Ties go to the higher path index.
        match best {
            Some((_, b)) if score < b => {}
            _ => best = Some((pid, score)),
        }
    }

    let (chosen, note) = match (untried, fresh, best) {
        (Some(p), _, _) => (p, SelectionNote::ExploreUntried),
        (None, Some(p), _) => (p, SelectionNote::JustEstablished),
        (None, None, Some((p, score))) => (p, SelectionNote::UcbMax { score }),
        (None, None, None) => (0, SelectionNote::SinglePath),
    };

    state.last_used = chosen;
    state.global_round += 1;
    state.current_reward = state.rewards.get(chosen).copied().unwrap_or(0.0);

    Selection::one_hot(PolicyKind::Mab, k, chosen)
        .with_reward(state.current_reward)
        .note(note)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::fixtures::path;
    use proptest::prelude::*;

    const MSS: u64 = 1460;

    fn charged(mut p: PathSnapshot, rounds: u64) -> PathSnapshot {
        p.rounds_used = rounds;
        p
    }

    fn cfg() -> SchedulerConfig {
        SchedulerConfig::new(PolicyKind::Mab)
    }

    #[test]
    fn exploration_delta_grows_with_rounds() {
        assert_eq!(exploration_delta(0), 1.0);
        assert_eq!(exploration_delta(1), 1.0);
        assert!(exploration_delta(10) > exploration_delta(3));
    }

    #[test]
    fn saturated_path_reward_is_penalized() {
        let open = path(10, 10 * MSS, MSS);
        let full = path(10, 10 * MSS, 0);
        let mut ctx = SendContext::new(&[]);
        ctx.bytes_in_buffer = 20 * MSS;
        let r_open = observed_reward(&ctx, &open);
        let r_full = observed_reward(&ctx, &full);
        assert!((r_open - 1_460_000.0).abs() < 1e-6);
        assert!((r_full - r_open / 3.0).abs() < 1e-6);
        assert_eq!(observed_reward(&ctx, &path(0, 10 * MSS, MSS)), 0.0);
    }

    #[test]
    fn untried_path_is_explored_first() {
        let paths = [charged(path(5, 100 * MSS, MSS), 50), path(500, MSS, 0)];
        let mut st = PolicyState::new(&cfg());
        st.global_round = 50;
        let s = select(&SendContext::new(&paths), &mut st, &cfg());
        assert_eq!(s.chosen, 1);
        assert_eq!(s.notes, vec![SelectionNote::ExploreUntried]);
    }

    #[test]
    fn higher_reward_wins_at_equal_confidence() {
        let paths = [
            charged(path(10, 10 * MSS, MSS), 3),
            charged(path(40, 10 * MSS, MSS), 3),
        ];
        let mut st = PolicyState::new(&cfg());
        st.global_round = 6;
        let s = select(&SendContext::new(&paths), &mut st, &cfg());
        assert_eq!(s.chosen, 0);
        assert!(matches!(s.notes[0], SelectionNote::UcbMax { .. }));
    }

    #[test]
    fn estimate_is_a_usage_weighted_mean() {
        let paths = [charged(path(10, 10 * MSS, MSS), 1), charged(path(10, 10 * MSS, MSS), 1)];
        let mut st = PolicyState::new(&cfg());
        *st.rewards.entry_or(0, 0.0) = 460_000.0;
        select(&SendContext::new(&paths), &mut st, &cfg());
        let est = st.reward_estimate(0).unwrap();
        assert!((est - (460_000.0 + 1_460_000.0) / 2.0).abs() < 1e-6);
    }

    #[test]
    fn decision_advances_round_and_publishes_reward() {
        let paths = [charged(path(10, 10 * MSS, MSS), 2), charged(path(20, 10 * MSS, MSS), 2)];
        let mut st = PolicyState::new(&cfg());
        st.global_round = 4;
        let s = select(&SendContext::new(&paths), &mut st, &cfg());
        assert_eq!(st.global_round(), 5);
        assert_eq!(s.reward, Some(st.current_reward()));
        assert_eq!(st.current_reward(), st.reward_estimate(s.chosen).unwrap());
    }

    #[test]
    fn single_path_leaves_state_alone() {
        let paths = [path(10, 10 * MSS, MSS)];
        let mut st = PolicyState::new(&cfg());
        let s = select(&SendContext::new(&paths), &mut st, &cfg());
        assert_eq!(s.weights, vec![1.0]);
        assert_eq!(s.reward, None);
        assert_eq!(st.global_round(), 0);
        assert!(st.rewards().is_empty());
    }

    proptest! {
        #[test]
        fn untried_path_always_beats_charged_paths(
            n_paths in 2usize..6,
            untried in 0usize..6,
            rtts in proptest::collection::vec(1u64..1000, 6),
            cwnds in proptest::collection::vec(1u64..1_000_000, 6),
            avail in proptest::collection::vec(0u64..10_000, 6),
            rounds in proptest::collection::vec(1u64..10_000, 6),
            global_round in 0u64..100_000,
            prior in proptest::collection::vec(0.0f64..1.0e9, 6),
        ) {
            let untried = untried % n_paths;
            let paths: Vec<PathSnapshot> = (0..n_paths)
                .map(|i| {
                    let r = if i == untried { 0 } else { rounds[i] };
                    charged(path(rtts[i], cwnds[i], avail[i]), r)
                })
                .collect();
            let mut st = PolicyState::new(&cfg());
            st.global_round = global_round;
            for (i, &p) in prior.iter().enumerate().take(n_paths) {
                *st.rewards.entry_or(i, 0.0) = p;
            }
            let s = select(&SendContext::new(&paths), &mut st, &cfg());
            prop_assert_eq!(s.chosen, untried);
            prop_assert_eq!(s.weights.len(), n_paths);
            prop_assert!((s.weight_sum() - 1.0).abs() < 1e-12);
        }
    }
}
