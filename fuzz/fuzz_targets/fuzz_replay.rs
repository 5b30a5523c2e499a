#![no_main]

use arbitrary::Arbitrary;
use flist_core::IndexPath;
use flist_diff::{EditBatch, replay};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzBatch {
    old_rows: Vec<u8>,
    new_rows: Vec<u8>,
    section_inserts: Vec<u8>,
    section_deletes: Vec<u8>,
    section_reloads: Vec<u8>,
    section_moves: Vec<(u8, u8)>,
    row_moves: Vec<((u8, u8), (u8, u8))>,
    row_inserts: Vec<(u8, u8)>,
    row_deletes: Vec<(u8, u8)>,
}

fn path((section, row): (u8, u8)) -> IndexPath {
    IndexPath::new(usize::from(section % 8), usize::from(row % 16))
}

fn counts(rows: &[u8]) -> Vec<usize> {
    rows.iter().take(8).map(|n| usize::from(n % 16)).collect()
}

// Arbitrary batches must be accepted or rejected, never panic.
fuzz_target!(|input: FuzzBatch| {
    let small = |v: &u8| usize::from(v % 8);
    let mut batch = EditBatch::default();
    batch.section_inserts.extend(input.section_inserts.iter().map(small));
    batch.section_deletes.extend(input.section_deletes.iter().map(small));
    batch.section_reloads.extend(input.section_reloads.iter().map(small));
    batch.section_moves = input
        .section_moves
        .iter()
        .map(|(from, to)| (small(from), small(to)))
        .collect();
    batch.row_moves = input
        .row_moves
        .iter()
        .map(|&(from, to)| (path(from), path(to)))
        .collect();
    batch.row_inserts = input.row_inserts.iter().copied().map(path).collect();
    batch.row_deletes = input.row_deletes.iter().copied().map(path).collect();

    let old_rows = counts(&input.old_rows);
    let new_rows = counts(&input.new_rows);
    if let Ok(sections) = replay(&old_rows, &new_rows, &batch) {
        assert_eq!(sections.len(), new_rows.len());
        for (section, &expected) in sections.iter().zip(&new_rows) {
            assert_eq!(section.rows.len(), expected);
        }
    }
});
