//! Benchmarks for the export parser, the address validator and CSV rendering

use conncheck::{
    export::{self, ExportRow},
    probe::{address, classify},
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

/// Log text with `blocks` repetitions of the three line shapes
fn sample_log(blocks: usize) -> String {
    let mut text = String::new();
    for i in 0..blocks {
        let octet = i % 256;
        text.push_str(&format!("10.0.0.{} → Ping exitoso: el host respondió.\n", octet));
        text.push_str(&format!("Host: host{}.example\n", i));
        text.push_str("Servicio: SSH | Puerto: 22 | Resultado: Puerto 22 abierto (conexión posible).\n");
        text.push_str(&format!("URL: https://site{}.example\n", i));
        text.push_str("Método: HTTPS | Código: 200 | Detalle: Éxito: el sitio respondió correctamente.\n");
    }
    text
}

fn bench_export_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_parse");

    for blocks in [10, 100, 1000] {
        let text = sample_log(blocks);
        group.bench_with_input(BenchmarkId::from_parameter(blocks), &text, |b, text| {
            b.iter(|| export::parse(black_box(text)))
        });
    }

    group.finish();
}

fn bench_address_validation(c: &mut Criterion) {
    let inputs = [
        "8.8.8.8",
        "256.1.1.1",
        "www.example.com",
        "12345",
        "localhost",
        "https://example.com/path",
        "a..b",
    ];

    c.bench_function("address_validate", |b| {
        b.iter(|| {
            for input in inputs {
                black_box(address::validate(black_box(input)));
            }
        })
    });
}

fn bench_classifier(c: &mut Criterion) {
    c.bench_function("classify_status_range", |b| {
        b.iter(|| {
            for code in 0u16..700 {
                black_box(classify(black_box(code)));
            }
        })
    });
}

fn bench_csv_rendering(c: &mut Criterion) {
    let rows: Vec<ExportRow> = export::parse(&sample_log(200));

    c.bench_function("csv_render_600_rows", |b| {
        b.iter(|| export::to_csv_string(black_box(&rows)))
    });
}

criterion_group!(
    benches,
    bench_export_parser,
    bench_address_validation,
    bench_classifier,
    bench_csv_rendering
);
criterion_main!(benches);
