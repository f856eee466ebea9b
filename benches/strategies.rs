//! Criterion benchmarks of every copy strategy across the buffer-size sweep.
//!
//! These complement the built-in harness with Criterion's own statistics.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use copy_bench::{BufferSizes, Strategy};

#[path = "common.rs"]
pub mod common;
use self::common::{SOURCE_LEN, create_bench_group, create_files, standard_criterion_config};

/// Benchmark loop strategies at each buffer size.
fn bench_loop_strategies(c: &mut Criterion) {
    let files = create_files(SOURCE_LEN);

    for strategy in Strategy::ALL.into_iter().filter(|s| s.uses_buffer()) {
        let mut group = create_bench_group(c, &format!("copy/{strategy}"));
        group.throughput(Throughput::Bytes(SOURCE_LEN as u64));

        for size in BufferSizes::default().iter() {
            group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
                b.iter(|| {
                    black_box(
                        strategy
                            .copy(&files.source, &files.target, Some(size))
                            .expect("copy"),
                    )
                });
            });
        }

        group.finish();
    }
}

/// Benchmark whole-range kernel transfers.
fn bench_transfer_strategies(c: &mut Criterion) {
    let files = create_files(SOURCE_LEN);
    let mut group = create_bench_group(c, "copy/transfer");
    group.throughput(Throughput::Bytes(SOURCE_LEN as u64));

    for strategy in Strategy::ALL.into_iter().filter(|s| !s.uses_buffer()) {
        group.bench_function(strategy.to_string(), |b| {
            b.iter(|| {
                black_box(
                    strategy
                        .copy(&files.source, &files.target, None)
                        .expect("copy"),
                )
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = standard_criterion_config();
    targets = bench_loop_strategies, bench_transfer_strategies
}

criterion_main!(benches);
