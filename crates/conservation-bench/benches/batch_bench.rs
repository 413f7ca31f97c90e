//! Batch-layer dispatch benchmarks: per-descriptor throughput at the
//! `optimal_batch_size` heuristic's own recommended counts.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::Rng;

use conservation_core::batch::{self, CheckDescriptor};

fn bench_check_batch(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let mut group = c.benchmark_group("batch_check");

    for &buffer_size in &[64usize, 1024, 16 * 1024] {
        let count = batch::optimal_batch_size(buffer_size);
        let buffers: Vec<Vec<u8>> = (0..count)
            .map(|_| (0..buffer_size).map(|_| rng.r#gen::<u8>()).collect())
            .collect();
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(
            BenchmarkId::new("optimal_count", buffer_size),
            &buffers,
            |b, buffers| {
                b.iter(|| {
                    let mut descriptors: Vec<CheckDescriptor<'_>> = buffers
                        .iter()
                        .map(|buf| CheckDescriptor::new(buf.as_slice()))
                        .collect();
                    let (log, _) = batch::check_batch(black_box(&mut descriptors));
                    black_box(log);
                });
            },
        );
    }
    group.finish();
}

fn bench_optimal_batch_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimal_batch_size");
    for &buffer_size in &[32usize, 512, 8192, 1 << 20] {
        group.bench_with_input(
            BenchmarkId::from_parameter(buffer_size),
            &buffer_size,
            |b, &size| {
                b.iter(|| black_box(batch::optimal_batch_size(black_box(size))));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_check_batch, bench_optimal_batch_size);
criterion_main!(benches);
