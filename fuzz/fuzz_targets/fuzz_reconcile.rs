#![no_main]

use arbitrary::Arbitrary;
use flist_core::{HeaderFooter, Row, Section, Snapshot, Visual};
use flist_diff::{diff_snapshots, replay_outline};
use libfuzzer_sys::fuzz_target;

#[derive(Clone)]
struct Nil;

impl Visual for Nil {
    fn same_visual(&self, _other: &Self) -> bool {
        true
    }
}

// Small id alphabets so duplicates and overlaps are common.
#[derive(Arbitrary, Debug)]
struct FuzzRow {
    id: u8,
    version: Option<u8>,
}

#[derive(Arbitrary, Debug)]
struct FuzzSection {
    id: u8,
    spinner: bool,
    rows: Vec<FuzzRow>,
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    old: Vec<FuzzSection>,
    new: Vec<FuzzSection>,
}

fn build(sections: &[FuzzSection]) -> Snapshot<Nil> {
    sections
        .iter()
        .take(8)
        .map(|section| {
            let header = if section.spinner {
                HeaderFooter::Spinner
            } else {
                HeaderFooter::margin(0.0)
            };
            Section::new(format!("s{}", section.id % 6))
                .header(header)
                .rows(section.rows.iter().take(32).map(|row| {
                    let built = Row::new(format!("r{}", row.id % 12), "cell");
                    match row.version {
                        Some(v) => built.content_version(format!("{}", v % 3)),
                        None => built,
                    }
                }))
        })
        .collect()
}

fuzz_target!(|input: FuzzInput| {
    let old = build(&input.old);
    let new = build(&input.new);

    let batch = diff_snapshots(old.sections(), new.sections());
    let replayed = replay_outline(&old.outline(), &new.outline(), &batch)
        .expect("diff produced a batch the surface cannot apply");
    assert_eq!(replayed, new.outline());

    assert!(diff_snapshots(new.sections(), new.sections()).is_empty());
});
