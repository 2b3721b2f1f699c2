//! Translator benchmarks.
//!
//! Measures DSL-emission throughput over wide and deep filter trees.

mod datagen;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use seql_opensearch::{translate, translate_filter};

fn bench_translate_full_query(c: &mut Criterion) {
    let query = datagen::gen_query(16);

    c.bench_function("translate_full_query", |b| {
        b.iter(|| {
            let body = translate(black_box(&query)).unwrap();
            black_box(body);
        });
    });
}

fn bench_translate_wide_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate_wide_filter");
    for width in [8, 64, 256] {
        let filter = datagen::gen_wide_filter(width);
        group.bench_with_input(BenchmarkId::from_parameter(width), &filter, |b, f| {
            b.iter(|| {
                let clause = translate_filter(black_box(f)).unwrap();
                black_box(clause);
            });
        });
    }
    group.finish();
}

fn bench_translate_deep_filter(c: &mut Criterion) {
    let filter = datagen::gen_deep_filter(6, 3);

    c.bench_function("translate_deep_filter", |b| {
        b.iter(|| {
            let clause = translate_filter(black_box(&filter)).unwrap();
            black_box(clause);
        });
    });
}

criterion_group!(
    benches,
    bench_translate_full_query,
    bench_translate_wide_filters,
    bench_translate_deep_filter
);
criterion_main!(benches);
