//! Basic benchmarks for the `bucket_pool` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::iter;
use std::time::Instant;

use alloc_tracker::Allocator;
use bucket_pool::Bucket;
use criterion::{Criterion, criterion_group, criterion_main};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

type TestItem = usize;
const TEST_VALUE: TestItem = 1024;

fn entrypoint(c: &mut Criterion) {
    let allocs = alloc_tracker::Session::new();

    let mut group = c.benchmark_group("bucket_basic");

    let allocs_op = allocs.operation("build_empty");
    group.bench_function("build_empty", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(Bucket::<TestItem>::new()));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("insert_first");
    group.bench_function("insert_first", |b| {
        b.iter_custom(|iters| {
            let mut buckets = iter::repeat_with(Bucket::<TestItem>::new)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for bucket in &mut buckets {
                _ = black_box(bucket.insert(black_box(TEST_VALUE)));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("get_one");
    group.bench_function("get_one", |b| {
        b.iter_custom(|iters| {
            let mut bucket = Bucket::<TestItem>::new();
            let handle = bucket.insert(TEST_VALUE);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                _ = black_box(bucket.get(handle));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("erase_one");
    group.bench_function("erase_one", |b| {
        b.iter_custom(|iters| {
            let mut buckets = iter::repeat_with(Bucket::<TestItem>::new)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let handles = buckets
                .iter_mut()
                .map(|bucket| bucket.insert(TEST_VALUE))
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for (bucket, handle) in buckets.iter_mut().zip(handles) {
                _ = bucket.erase(handle);
            }

            start.elapsed()
        });
    });

    group.finish();

    let mut group = c.benchmark_group("bucket_slow");

    let allocs_op = allocs.operation("insert_10k");
    group.bench_function("insert_10k", |b| {
        b.iter_custom(|iters| {
            let mut buckets = iter::repeat_with(Bucket::<TestItem>::new)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for bucket in &mut buckets {
                for _ in 0..10_000 {
                    _ = black_box(bucket.insert(black_box(TEST_VALUE)));
                }
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("iterate_10k_half_erased");
    group.bench_function("iterate_10k_half_erased", |b| {
        b.iter_custom(|iters| {
            let mut bucket = Bucket::<TestItem>::new();

            let handles = iter::repeat_with(|| bucket.insert(TEST_VALUE))
                .take(10_000)
                .collect::<Vec<_>>();

            for handle in handles.iter().step_by(2) {
                _ = bucket.erase(*handle);
            }

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                _ = black_box(bucket.iter().sum::<TestItem>());
            }

            start.elapsed()
        });
    });

    group.finish();

    allocs.print_to_stdout();
}
