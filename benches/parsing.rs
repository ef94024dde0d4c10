use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ron_notation::stream::parse_chunks;
use ron_notation::{parse, parse_with_options, ParserOptions, StreamParser};

fn unguarded() -> ParserOptions {
    ParserOptions::new().with_loop_guard(None)
}

fn product_list(size: usize) -> String {
    let items: Vec<String> = (0..size)
        .map(|i| {
            format!(
                r#"Product(sku: "SKU{}", price: {}, quantity: 0x{:x}, tags: ["a", "b"], discount: None)"#,
                i,
                9.99 + i as f64,
                i
            )
        })
        .collect();
    format!("[{}]", items.join(",\n"))
}

fn field_tree(depth: usize) -> String {
    let mut text = String::from(r#"(leaf: "value \"quoted\" \\ end")"#);
    for level in 0..depth {
        text = format!(r#"(name: "level {}", note: "text", child: {})"#, level, text);
    }
    text
}

fn benchmark_parse_simple(c: &mut Criterion) {
    let text = r#"User(id: 123, name: "Alice", email: "alice@example.com", active: true)"#;

    c.bench_function("parse_simple_struct", |b| b.iter(|| parse(black_box(text))));
}

fn benchmark_parse_numbers(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_numbers");

    for (name, text) in [
        ("decimal", "1234567"),
        ("float", "-3.14159e-2"),
        ("hex", "0xDEADbeef"),
        ("binary", "0b1011001110001111"),
    ] {
        group.bench_function(name, |b| b.iter(|| parse(black_box(text))));
    }
    group.finish();
}

fn benchmark_parse_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_array");
    let options = unguarded();

    for size in [10, 50, 100, 500].iter() {
        let text = product_list(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| parse_with_options(black_box(text), &options))
        });
    }
    group.finish();
}

fn benchmark_parse_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_strings");

    let quoted = r#""This is a string with \"escapes\"\n and a tab\t inside""#;
    let raw = r##"r#"raw strings keep \backslashes\ and "quotes" as written"#"##;

    group.bench_function("quoted", |b| b.iter(|| parse(black_box(quoted))));
    group.bench_function("raw", |b| b.iter(|| parse(black_box(raw))));
    group.finish();
}

fn benchmark_stream_vs_combinator(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_vs_combinator");
    let options = unguarded();

    for depth in [4, 16, 64].iter() {
        let text = field_tree(*depth);

        group.bench_with_input(BenchmarkId::new("combinator", depth), &text, |b, text| {
            b.iter(|| parse_with_options(black_box(text), &options))
        });
        group.bench_with_input(BenchmarkId::new("stream", depth), &text, |b, text| {
            b.iter(|| parse_chunks([black_box(text.as_bytes())]))
        });
    }
    group.finish();
}

fn benchmark_stream_chunk_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_chunk_size");
    let text = field_tree(32);

    for size in [1, 16, 256, 4096].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, size| {
            b.iter(|| {
                let mut parser = StreamParser::new();
                for chunk in text.as_bytes().chunks(*size) {
                    parser.feed(black_box(chunk)).unwrap();
                }
                parser.finish().unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_parse_simple,
    benchmark_parse_numbers,
    benchmark_parse_array,
    benchmark_parse_strings,
    benchmark_stream_vs_combinator,
    benchmark_stream_chunk_sizes
);
criterion_main!(benches);
