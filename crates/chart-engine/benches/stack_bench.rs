use chart_engine::{max_stacked_total, stack, Series};
use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

fn gen_layers(layers: usize, n: usize) -> Vec<Series> {
    let t0 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    (0..layers)
        .map(|l| {
            // odd layers skip every third sample so the timestamp union differs from each series
            let points = (0..n)
                .filter(|i| l % 2 == 0 || i % 3 != 0)
                .map(|i| (t0 + Duration::hours(i as i64), 5.0 + ((i + l) as f64 * 0.05).cos().abs() * 20.0));
            Series::from_pairs(format!("layer{l}"), points)
        })
        .collect()
}

fn bench_stack(c: &mut Criterion) {
    let mut group = c.benchmark_group("stack");
    for &(layers, n) in &[(3usize, 1_000usize), (10, 10_000), (25, 20_000)] {
        let data = gen_layers(layers, n);
        group.bench_with_input(BenchmarkId::from_parameter(format!("l{layers}_n{n}")), &data, |b, d| {
            b.iter_batched(
                || d.clone(),
                |d| {
                    let frames = stack(&d);
                    black_box(max_stacked_total(&frames));
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stack);
criterion_main!(benches);
