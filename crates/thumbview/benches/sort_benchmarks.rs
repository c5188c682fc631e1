//! Benchmarks for row sorting and sorted insertion.
//!
//! Run with: `cargo bench --bench sort_benchmarks`
//! Results are saved to `target/criterion/` with HTML reports.

use chrono::{Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use thumbview::FsEntry;
use thumbview::listing::{Row, RowIdAllocator, SortOrder, SortSpec, sort_rows, sorted_insert_position};

/// Builds rows with mixed names, sizes, and dates. Every tenth row is a directory.
fn setup_rows(count: usize) -> Vec<Row> {
    let extensions = ["txt", "pdf", "jpg", "png", "rs", "zip", "md", "json"];
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let ids = RowIdAllocator::new();

    (0..count)
        .map(|i| {
            let modified = Some(base + Duration::minutes((i * 7919 % 100_000) as i64));
            let entry = if i % 10 == 0 {
                FsEntry::directory(format!("/bench/dir{}", i), modified)
            } else {
                let ext = extensions[i % extensions.len()];
                FsEntry::file(
                    format!("/bench/file{}.{}", (i * 31) % count, ext),
                    Some((i * 4099 % 1_000_000) as u64),
                    modified,
                )
            };
            Row::placeholder(ids.allocate(), &entry)
        })
        .collect()
}

fn bench_sort_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_rows");

    for count in [100, 1_000, 10_000] {
        let rows = setup_rows(count);
        for (label, column) in [("name", 0), ("size", 1), ("type", 2), ("date", 3)] {
            let spec = SortSpec::for_column(column, SortOrder::Ascending);
            group.bench_with_input(BenchmarkId::new(label, count), &rows, |b, rows| {
                b.iter(|| {
                    let mut rows = rows.clone();
                    sort_rows(&mut rows, &spec);
                    black_box(rows)
                })
            });
        }
    }

    group.finish();
}

/// Inserting rows one by one the way the view does while a directory populates.
fn bench_sorted_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorted_insert");

    for count in [100, 1_000, 5_000] {
        let rows = setup_rows(count);
        let spec = SortSpec::by_name();
        group.bench_with_input(BenchmarkId::new("by_name", count), &rows, |b, rows| {
            b.iter(|| {
                let mut shown: Vec<Row> = Vec::with_capacity(rows.len());
                for row in rows {
                    let position = sorted_insert_position(&shown, row, &spec);
                    shown.insert(position, row.clone());
                }
                black_box(shown)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sort_rows, bench_sorted_insert);
criterion_main!(benches);
