// Validation throughput over a conditional configuration schema.
// Run with: cargo bench -p trellis-schema

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};
use trellis_schema::prelude::*;

fn config_schema() -> Schema {
    object()
        .field(
            "option",
            enumeration(["uri", "config"]).with_default("uri"),
        )
        .field(
            "uri",
            string()
                .pattern(r"^redis://([\w.-]+)(?::(\d+))?(?:/(\d+))?$")
                .with_default("redis://localhost:6379/0")
                .depends_on([DependencyRule::equals("option", "uri")]),
        )
        .field(
            "config",
            object()
                .field("host", string().min_length(1).with_default("localhost"))
                .field("port", number().range(1.0, 65535.0).with_default(6379))
                .field("password", password().optional())
                .field("db", number().range(0.0, 15.0).with_default(0))
                .depends_on([DependencyRule::equals("option", "config")]),
        )
        .field("tags", array(string().min_length(2)).optional())
        .build()
        .expect("benchmark schema builds")
}

fn bench_valid_input(c: &mut Criterion) {
    let schema = config_schema();
    let input = json!({
        "option": "config",
        "config": {"host": "cache.internal", "port": 6380, "db": 2},
        "tags": ["primary", "eu"]
    });
    c.bench_function("validate_valid_config", |b| {
        b.iter(|| black_box(schema.safe_parse(black_box(&input))));
    });
}

fn bench_invalid_input(c: &mut Criterion) {
    let schema = config_schema();
    let input = json!({
        "option": "config",
        "config": {"host": "", "port": 0, "db": 99},
        "tags": ["x", "y", "z"]
    });
    c.bench_function("validate_invalid_config", |b| {
        b.iter(|| black_box(schema.safe_parse(black_box(&input))));
    });
}

fn bench_array_sizes(c: &mut Criterion) {
    let schema = array(number().range(0.0, 1000.0)).build().expect("schema builds");
    let mut group = c.benchmark_group("validate_array");
    for size in [10usize, 100, 1000] {
        let input = Value::Array((0..size).map(|i| json!(i % 1000)).collect());
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| black_box(schema.safe_parse(input)));
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_config_schema", |b| {
        b.iter(|| black_box(config_schema()));
    });
}

criterion_group!(
    benches,
    bench_valid_input,
    bench_invalid_input,
    bench_array_sizes,
    bench_build
);
criterion_main!(benches);
