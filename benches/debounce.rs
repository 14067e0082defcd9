//! Benchmarks for the button debouncer.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use blockswitch::debounce::Debouncer;

/// Press/release cycles with a few bounces at every edge.
fn generate_samples(cycles: usize) -> Vec<bool> {
    let press = [true, false, true, true, false, true, true, true, true, true];
    let release = [false, true, false, false, true, false, false, false, false, false];

    (0..cycles)
        .flat_map(|_| press.iter().chain(release.iter()).copied())
        .collect()
}

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("debouncer_sample");

    for threshold in &[1u8, 3, 8] {
        let samples = generate_samples(1000);

        group.bench_with_input(
            BenchmarkId::new("bouncy_cycles", threshold),
            &samples,
            |b, samples| {
                b.iter(|| {
                    let mut debouncer = Debouncer::new(*threshold);
                    for &sample in samples {
                        black_box(debouncer.sample(black_box(sample)));
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_sample);
criterion_main!(benches);
