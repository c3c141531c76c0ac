//! Benchmarks for schema inference and schema text rendering
//!
//! Run with: cargo bench

use clone_seed::inference::{InferenceConfig, SchemaInferrer, merge};
use clone_seed::models::{Column, ColumnType, Sample, Table};
use clone_seed::seed::{render_schema, sanitize_schema};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};

/// Generate paginated product samples for benchmarking
fn generate_samples(count: usize) -> Vec<Sample> {
    (0..count)
        .map(|i| {
            let items: Vec<Value> = (0..20)
                .map(|j| {
                    json!({
                        "id": i * 20 + j,
                        "name": format!("Product {}", j),
                        "price": if j % 3 == 0 { json!(9.99) } else { json!(10) },
                        "category_id": j % 5,
                        "tags": ["a", "b"],
                        "discontinued": j % 7 == 0,
                        "note": if j % 2 == 0 { Value::Null } else { json!("ok") }
                    })
                })
                .collect();
            let path = if i % 2 == 0 { "/api/products" } else { "/api/v1/products" };
            Sample::ok(path, json!({"data": items, "total": 20, "page": i}))
        })
        .collect()
}

/// Benchmark folding samples into a snapshot
fn bench_schema_inference(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_inference");

    for count in [10, 100, 500].iter() {
        let samples = generate_samples(*count);
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(
            BenchmarkId::new("fold_samples", count),
            &samples,
            |b, samples| {
                b.iter(|| {
                    let mut inferrer = SchemaInferrer::with_config(InferenceConfig::default());
                    inferrer.add_samples(samples);
                    black_box(inferrer.finalize())
                });
            },
        );
    }

    group.finish();
}

/// Benchmark table merging
fn bench_table_merge(c: &mut Criterion) {
    let left = Table::with_columns(
        "items",
        (0..50)
            .map(|i| Column::new(format!("c{}", i), ColumnType::Integer))
            .collect(),
    );
    let right = Table::with_columns(
        "items",
        (25..75)
            .map(|i| Column::new(format!("c{}", i), ColumnType::Real))
            .collect(),
    );

    c.bench_function("merge_tables", |b| {
        b.iter(|| black_box(merge(&left, &right)));
    });
}

/// Benchmark schema text rendering and sanitization
fn bench_schema_text(c: &mut Criterion) {
    let mut inferrer = SchemaInferrer::new();
    inferrer.add_samples(&generate_samples(10));
    let snapshot = inferrer.finalize();
    let dirty = "CREATE TABLE t (a INTEGER CHECK (a > 0), CONSTRAINT c CHECK (a < 100), b TEXT);\n"
        .repeat(50);

    let mut group = c.benchmark_group("schema_text");
    group.bench_function("render", |b| b.iter(|| black_box(render_schema(&snapshot))));
    group.bench_function("sanitize", |b| b.iter(|| black_box(sanitize_schema(&dirty))));
    group.finish();
}

criterion_group!(
    benches,
    bench_schema_inference,
    bench_table_merge,
    bench_schema_text
);
criterion_main!(benches);
