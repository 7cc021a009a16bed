use chart_engine::nearest::{nearest_point, query};
use chart_engine::{Series, Timestamp};
use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn gen_series(id: &str, n: usize) -> Series {
    let t0 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    Series::from_pairs(id, (0..n).map(|i| (t0 + Duration::minutes(i as i64), (i as f64 * 0.01).sin() * 10.0)))
}

fn probes(n: usize) -> Vec<Timestamp> {
    let t0 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    // spread over the whole span plus a little either side
    (0..256).map(|i| t0 + Duration::seconds(((i * n * 67) / 256) as i64 - 600)).collect()
}

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest");
    for &n in &[1_000usize, 100_000, 1_000_000] {
        let s = gen_series("s", n);
        let xs = probes(n);
        group.bench_with_input(BenchmarkId::from_parameter(format!("n{n}")), &xs, |b, xs| {
            b.iter(|| {
                for x in xs {
                    let _ = black_box(nearest_point(&s, *x));
                }
            });
        });
    }
    group.finish();

    let many: Vec<Series> = (0..10).map(|i| gen_series(&format!("s{i}"), 10_000)).collect();
    let x = probes(10_000)[128];
    c.bench_function("query_10x10k", |b| b.iter(|| black_box(query(&many, x))));
}

criterion_group!(benches, bench_nearest);
criterion_main!(benches);
