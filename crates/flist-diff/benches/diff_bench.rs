//! Benchmarks for snapshot reconciliation.
//!
//! Performance budgets:
//! - Unchanged 1k-row snapshot: < 50us
//! - Single append to 1k rows: < 60us
//! - Full reverse of 1k rows: < 250us
//!
//! Run with: cargo bench -p flist-diff --bench diff_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use flist_core::{Row, Section, Snapshot, Visual};
use flist_diff::{diff_rows, diff_snapshots};
use std::hint::black_box;

#[derive(Clone)]
struct Nil;

impl Visual for Nil {
    fn same_visual(&self, _other: &Self) -> bool {
        true
    }
}

fn rows(ids: impl IntoIterator<Item = usize>, version: &str) -> Vec<Row<Nil>> {
    ids.into_iter()
        .map(|i| Row::new(format!("row-{i}"), "cell").content_version(version))
        .collect()
}

fn snapshot(sections: usize, per_section: usize, version: &str) -> Snapshot<Nil> {
    (0..sections)
        .map(|s| {
            Section::new(format!("section-{s}"))
                .rows(rows(s * per_section..(s + 1) * per_section, version))
        })
        .collect()
}

// =============================================================================
// Row reconciler
// =============================================================================

fn bench_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff/rows");

    for n in [100usize, 1_000, 10_000] {
        let old = rows(0..n, "v1");

        let same = rows(0..n, "v1");
        group.bench_with_input(BenchmarkId::new("unchanged", n), &n, |b, _| {
            b.iter(|| black_box(diff_rows(black_box(&old), black_box(&same))))
        });

        let appended = rows(0..n + 1, "v1");
        group.bench_with_input(BenchmarkId::new("append_one", n), &n, |b, _| {
            b.iter(|| black_box(diff_rows(black_box(&old), black_box(&appended))))
        });

        let prepended = rows(std::iter::once(n).chain(0..n), "v1");
        group.bench_with_input(BenchmarkId::new("prepend_one", n), &n, |b, _| {
            b.iter(|| black_box(diff_rows(black_box(&old), black_box(&prepended))))
        });

        let reversed = rows((0..n).rev(), "v1");
        group.bench_with_input(BenchmarkId::new("reverse", n), &n, |b, _| {
            b.iter(|| black_box(diff_rows(black_box(&old), black_box(&reversed))))
        });

        let bumped = rows(0..n, "v2");
        group.bench_with_input(BenchmarkId::new("all_reloads", n), &n, |b, _| {
            b.iter(|| black_box(diff_rows(black_box(&old), black_box(&bumped))))
        });
    }

    group.finish();
}

// =============================================================================
// Full snapshots
// =============================================================================

fn bench_snapshots(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff/snapshot");

    let old = snapshot(20, 50, "v1");
    let same = snapshot(20, 50, "v1");
    group.bench_function("20x50_unchanged", |b| {
        b.iter(|| black_box(diff_snapshots(old.sections(), black_box(same.sections()))))
    });

    let mut shifted: Vec<_> = snapshot(20, 50, "v1").into_sections();
    shifted.rotate_left(1);
    let shifted = Snapshot::new(shifted);
    group.bench_function("20x50_section_rotate", |b| {
        b.iter(|| black_box(diff_snapshots(old.sections(), black_box(shifted.sections()))))
    });

    let bumped = snapshot(20, 50, "v2");
    group.bench_function("20x50_content_bump", |b| {
        b.iter(|| black_box(diff_snapshots(old.sections(), black_box(bumped.sections()))))
    });

    group.finish();
}

criterion_group!(benches, bench_rows, bench_snapshots);
criterion_main!(benches);
