use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pathmux::{PathSnapshot, PolicyKind, Scheduler, SchedulerConfig, StaticConnection};
use std::hint::black_box;
use std::time::Duration;

const MSS: u64 = 1460;

fn paths(n: usize) -> Vec<PathSnapshot> {
    (0..n)
        .map(|i| PathSnapshot {
            rtt: Duration::from_millis(20 + 15 * i as u64),
            rtt_var: Duration::from_millis(2),
            cwnd: 10 * MSS,
            // Every other path saturated so the fallback branches run too.
            available_window: if i % 2 == 0 { 0 } else { 4 * MSS },
            bytes_in_flight: 6 * MSS,
            rounds_used: 0,
        })
        .collect()
}

fn bench_select(c: &mut Criterion) {
    let rounds = 1024usize;
    let mut group = c.benchmark_group("select_next");

    for kind in PolicyKind::ALL {
        for n in [2usize, 8] {
            group.bench_with_input(BenchmarkId::new(kind.as_str(), n), &n, |b, &n| {
                b.iter(|| {
                    let conn = StaticConnection::new(paths(n))
                        .with_buffered(64 * MSS)
                        .with_tx_available(1 << 24);
                    let mut s =
                        Scheduler::with_connection(SchedulerConfig::new(kind), conn).unwrap();
                    for i in 0..rounds {
                        let sel = s.select_next();
                        if kind == PolicyKind::MabDelay && i % 4 == 3 {
                            let round = s.current_round().saturating_sub(2);
                            s.report_outcome(sel.chosen, (i % 3) as u32, 6 * MSS, round);
                        }
                        black_box(sel);
                    }
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_select);
criterion_main!(benches);
