//! Record hot-path benchmark
//!
//! Instrumentation call sites pay for `begin` + `end` on every measured call,
//! so this tracks the cost of a single locked registry update.
//!
//! # Run Instructions
//!
//! ```bash
//! cargo bench --bench record_overhead
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use perf_tracer::{CallSiteKey, PerfTracer, Timestamp, TracerConfig};
use std::sync::Arc;
use std::thread;

fn unbounded_tracer() -> PerfTracer {
    PerfTracer::new(&TracerConfig {
        max_events: u64::MAX,
        ..TracerConfig::default()
    })
}

/// Benchmark: begin + end on an existing entry
fn bench_begin_end_existing_key(c: &mut Criterion) {
    let tracer = unbounded_tracer();
    let key = CallSiteKey::new("do_sys_open");
    tracer.record(key, 1);

    let mut t = 0u64;
    c.bench_function("begin_end_existing_key", |b| {
        b.iter(|| {
            let token = tracer.begin_at(black_box(key), Timestamp::from_nanos(t));
            tracer.end_at(token, Timestamp::from_nanos(t + 100));
            t += 1;
        });
    });
}

/// Benchmark: record with varying numbers of distinct call sites
fn bench_record_distinct_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_distinct_keys");

    for keys in [1usize, 64, 1024, 16384] {
        let tracer = unbounded_tracer();
        let names: Vec<CallSiteKey> = (0..keys)
            .map(|i| CallSiteKey::new(&format!("call_site_{}", i)))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(keys), &names, |b, names| {
            let mut i = 0usize;
            b.iter(|| {
                tracer.record(black_box(names[i % names.len()]), 100);
                i += 1;
            });
        });
    }

    group.finish();
}

/// Benchmark: dropped events once the budget is spent
fn bench_record_budget_exhausted(c: &mut Criterion) {
    let tracer = PerfTracer::new(&TracerConfig {
        max_events: 1,
        ..TracerConfig::default()
    });
    let key = CallSiteKey::new("silent");
    tracer.record(key, 1);

    c.bench_function("record_budget_exhausted", |b| {
        b.iter(|| tracer.record(black_box(key), 100));
    });
}

/// Benchmark: four threads contending on one key
fn bench_record_contended(c: &mut Criterion) {
    c.bench_function("record_contended_4_threads", |b| {
        b.iter_custom(|iters| {
            let tracer = Arc::new(unbounded_tracer());
            let key = CallSiteKey::new("contended");
            let start = std::time::Instant::now();

            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let tracer = tracer.clone();
                    thread::spawn(move || {
                        for _ in 0..iters {
                            tracer.record(key, 100);
                        }
                    })
                })
                .collect();
            for handle in handles {
                let _ = handle.join();
            }

            start.elapsed()
        });
    });
}

/// Benchmark: full snapshot of a populated registry
fn bench_snapshot(c: &mut Criterion) {
    let tracer = unbounded_tracer();
    for i in 0..1000 {
        tracer.record(CallSiteKey::new(&format!("site_{}", i)), i);
    }

    c.bench_function("snapshot_report_1000_sites", |b| {
        b.iter(|| black_box(tracer.snapshot_report()));
    });
}

criterion_group!(
    benches,
    bench_begin_end_existing_key,
    bench_record_distinct_keys,
    bench_record_budget_exhausted,
    bench_record_contended,
    bench_snapshot
);
criterion_main!(benches);
