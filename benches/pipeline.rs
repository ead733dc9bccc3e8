use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::Serialize;
use structured_yaml::{encode, process, render, validate, Schema};

#[derive(Serialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Clone)]
struct NestedData {
    id: u32,
    metadata: Metadata,
    tags: Vec<String>,
}

#[derive(Serialize, Clone)]
struct Metadata {
    created: String,
    updated: String,
    version: u32,
}

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

fn product_schema() -> Schema {
    Schema::sequence(
        Schema::mapping()
            .required("sku", Schema::string().min_length(1))
            .required("name", Schema::string())
            .required("price", Schema::number().non_negative())
            .required("quantity", Schema::integer().non_negative()),
    )
}

fn benchmark_process_simple(c: &mut Criterion) {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    };

    c.bench_function("process_simple_struct", |b| {
        b.iter(|| process(black_box(&user), None))
    });
}

fn benchmark_process_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_array");
    let schema = product_schema();

    for size in [10, 50, 100, 500].iter() {
        let data = products(*size);

        group.bench_with_input(BenchmarkId::new("no_schema", size), &data, |b, data| {
            b.iter(|| process(black_box(data), None))
        });
        group.bench_with_input(BenchmarkId::new("schema", size), &data, |b, data| {
            b.iter(|| process(black_box(data), Some(&schema)))
        });
    }
    group.finish();
}

fn benchmark_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let data = products(100);
    let value = encode(&data).unwrap();
    let schema = product_schema();

    group.bench_function("encode", |b| b.iter(|| encode(black_box(&data))));
    group.bench_function("validate", |b| {
        b.iter(|| validate(black_box(&value), Some(&schema)))
    });
    group.bench_function("render", |b| b.iter(|| render(black_box(&value))));
    group.finish();
}

fn benchmark_process_nested(c: &mut Criterion) {
    let data = NestedData {
        id: 42,
        metadata: Metadata {
            created: "2023-01-01T00:00:00Z".to_string(),
            updated: "2023-12-31T23:59:59Z".to_string(),
            version: 3,
        },
        tags: vec![
            "important".to_string(),
            "verified".to_string(),
            "production".to_string(),
        ],
    };

    c.bench_function("process_nested_struct", |b| {
        b.iter(|| process(black_box(&data), None))
    });
}

fn benchmark_string_quoting(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_strings");

    let plain = "This is a medium length string with some content";
    let quoted = "key: value # with \"quotes\" and\na line break";

    group.bench_function("plain", |b| b.iter(|| process(black_box(&plain), None)));
    group.bench_function("quoted", |b| b.iter(|| process(black_box(&quoted), None)));
    group.finish();
}

criterion_group!(
    benches,
    benchmark_process_simple,
    benchmark_process_array,
    benchmark_stages,
    benchmark_process_nested,
    benchmark_string_quoting
);
criterion_main!(benches);
