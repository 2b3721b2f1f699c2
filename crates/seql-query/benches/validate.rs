//! Validator benchmarks.
//!
//! Measures validation throughput over wide and deep filter trees.


use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use seql_query::validate;

fn bench_validate_full_query(c: &mut Criterion) {
    let query = datagen::gen_query(16);

    c.bench_function("validate_full_query", |b| {
        b.iter(|| validate(black_box(&query)).unwrap());
    });
}

fn bench_validate_wide_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_wide_filter");
    for width in [8, 64, 256] {
        let query = seql_query::Query {
            filter: Some(datagen::gen_wide_filter(width)),
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(width), &query, |b, q| {
            b.iter(|| validate(black_box(q)).unwrap());
        });
    }
    group.finish();
}

fn bench_validate_deep_filter(c: &mut Criterion) {
    let query = seql_query::Query {
        filter: Some(datagen::gen_deep_filter(6, 3)),
        ..Default::default()
    };

    c.bench_function("validate_deep_filter", |b| {
        b.iter(|| validate(black_box(&query)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_validate_full_query,
    bench_validate_wide_filters,
    bench_validate_deep_filter
);
criterion_main!(benches);
