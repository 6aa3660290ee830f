//! Template rendering throughput benchmarks
//!
//! Measures rendering of the bundled agenda template with a growing number of
//! agenda rows, with and without an embedded logo, plus the table strip pass.
//!
//! Run benchmarks: `cargo bench --bench render_throughput`

use agenda_docx::{TemplateRenderer, default_template_package, strip_package};
use agenda_types::{AgendaItem, AgendaRecord, Attendee, LogoImage};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use image::{ImageFormat, RgbImage};
use std::hint::black_box;
use std::io::Cursor;

/// A record with `items` agenda rows and a handful of attendees.
fn generate_record(items: usize) -> AgendaRecord {
    let attendee = |i: usize| Attendee {
        name: format!("Attendee {i}"),
        role: "Engineer".to_string(),
    };
    AgendaRecord {
        customer: "Acme".to_string(),
        date: "2024-01-01".to_string(),
        title: "Quarterly review".to_string(),
        summary: "Review of the quarter with the Acme team".to_string(),
        primaries: (0..2).map(attendee).collect(),
        supporting: (2..6).map(attendee).collect(),
        agenda_items: (0..items)
            .map(|i| AgendaItem {
                time: format!("{:02}:00", 8 + i % 10),
                owner: format!("Attendee {}", i % 6),
                topic: format!("Topic {i}"),
                description: format!("Discussion of item {i}"),
            })
            .collect(),
        ..AgendaRecord::default()
    }
}

fn logo() -> LogoImage {
    let mut bytes = Cursor::new(Vec::new());
    RgbImage::from_pixel(400, 200, image::Rgb([20, 60, 160]))
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("Failed to encode logo");
    LogoImage::new("logo.png", bytes.into_inner())
}

/// Benchmark rendering with varying agenda sizes
fn benchmark_render_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_rows");
    let renderer = TemplateRenderer::new();

    for count in [1, 10, 100, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        let record = generate_record(count);

        group.bench_with_input(BenchmarkId::new("items", count), &record, |b, record| {
            b.iter(|| {
                renderer
                    .render_package(default_template_package(), black_box(record), None)
                    .expect("Failed to render template")
            });
        });
    }

    group.finish();
}

/// Benchmark the cost of embedding a logo
fn benchmark_logo_embedding(c: &mut Criterion) {
    let mut group = c.benchmark_group("logo_embedding");
    let renderer = TemplateRenderer::new();
    let record = generate_record(10);
    let logo = logo();

    group.bench_function("without_logo", |b| {
        b.iter(|| {
            renderer
                .render_package(default_template_package(), black_box(&record), None)
                .expect("Failed to render template")
        });
    });
    group.bench_function("with_logo", |b| {
        b.iter(|| {
            renderer
                .render_package(default_template_package(), black_box(&record), Some(&logo))
                .expect("Failed to render template")
        });
    });

    group.finish();
}

/// Benchmark stripping the agenda table of a rendered document
fn benchmark_table_strip(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_strip");
    let renderer = TemplateRenderer::new();

    for count in [10, 100, 1000] {
        let rendered = renderer
            .render_package(default_template_package(), &generate_record(count), None)
            .expect("Failed to render template");

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("items", count), &rendered, |b, rendered| {
            b.iter(|| {
                let mut package = rendered.clone();
                strip_package(black_box(&mut package)).expect("Failed to strip table")
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_render_rows,
    benchmark_logo_embedding,
    benchmark_table_strip
);
criterion_main!(benches);
