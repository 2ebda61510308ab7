//! # Scoring Benchmarks
//!
//! Performance benchmarks for zscore-core hot paths.
//!
//! Run with: `cargo bench -p zscore-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use zscore_core::{Page, PageNode, apply_colors, classify, percentile};

/// Evenly spaced scores across the charted range.
fn score_grid(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| -3.0 + 6.0 * i as f64 / size.max(1) as f64)
        .collect()
}

/// A flat page of score cells, half of them unparsable.
fn create_report_page(size: usize) -> Page {
    let nodes = (0..size)
        .map(|i| {
            let text = if i % 2 == 0 {
                format!("{:.2}", -3.0 + 6.0 * i as f64 / size.max(1) as f64)
            } else {
                "N/A".to_string()
            };
            PageNode::new("td").with_class("z-score-value").with_text(text)
        })
        .collect();
    Page::new(nodes)
}

fn bench_classify(c: &mut Criterion) {
    let scores = score_grid(1000);
    c.bench_function("classify_1000", |b| {
        b.iter(|| {
            for &score in &scores {
                black_box(classify(black_box(score)));
            }
        });
    });
}

fn bench_percentile(c: &mut Criterion) {
    let scores = score_grid(1000);
    c.bench_function("percentile_1000", |b| {
        b.iter(|| {
            for &score in &scores {
                black_box(percentile(black_box(score)));
            }
        });
    });
}

fn bench_decorate(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_colors");

    for size in [10, 100, 1000] {
        let page = create_report_page(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &page, |b, page| {
            b.iter(|| {
                let mut page = page.clone();
                black_box(apply_colors(&mut page));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_percentile, bench_decorate);
criterion_main!(benches);
