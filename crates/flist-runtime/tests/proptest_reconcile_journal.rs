//! Property-based invariants of what a reconciliation pass tells the surface.
//!
//! For any pair of snapshots (unique identities per collection), with every
//! old row bound to a visual:
//!
//! 1. A transaction is opened iff the batch has structural edits, and then
//!    exactly once.
//! 2. Primitives inside the transaction follow the fixed order.
//! 3. Content rebinds happen before the transaction, once per reload.
//! 4. Pagination callbacks only fire after row deletes and before the
//!    transaction closes.
//! 5. The retained snapshot is the new one afterwards.

#![forbid(unsafe_code)]

mod support;

use flist_core::{IndexPath, Section, Snapshot};
use flist_runtime::{Reconciler, SectionsDataSource};
use proptest::prelude::*;
use support::{FakeCell, RecordingSource, RecordingSurface, entries, journal, row};

#[derive(Debug, Clone)]
struct SectionPlan {
    id: String,
    paginating: bool,
    rows: Vec<(String, u8)>,
}

fn build(plans: &[SectionPlan]) -> Vec<Section<FakeCell>> {
    plans
        .iter()
        .map(|plan| {
            Section::new(plan.id.as_str())
                .paginating(plan.paginating)
                .rows(plan.rows.iter().map(|(id, v)| row(id, &v.to_string())))
        })
        .collect()
}

/// Position of a journal entry in the transaction order.
fn rank(entry: &str) -> Option<usize> {
    [
        "insert_sections",
        "delete_sections",
        "reload_sections",
        "move_section",
        "move_row",
        "insert_rows",
        "delete_rows",
    ]
    .iter()
    .position(|primitive| entry.starts_with(primitive))
}

// ── Strategies ──────────────────────────────────────────────────────────

fn unique_ids(prefix: &'static str, pool: usize) -> impl Strategy<Value = Vec<String>> {
    let all: Vec<String> = (0..pool).map(|i| format!("{prefix}{i}")).collect();
    proptest::sample::subsequence(all, 0..=pool).prop_shuffle()
}

fn rows() -> impl Strategy<Value = Vec<(String, u8)>> {
    unique_ids("r", 9).prop_flat_map(|ids| {
        let n = ids.len();
        (Just(ids), proptest::collection::vec(0u8..2, n))
            .prop_map(|(ids, versions)| ids.into_iter().zip(versions).collect())
    })
}

fn snapshot_plan() -> impl Strategy<Value = Vec<SectionPlan>> {
    unique_ids("s", 4).prop_flat_map(|ids| {
        let n = ids.len();
        (Just(ids), proptest::collection::vec((any::<bool>(), rows()), n)).prop_map(
            |(ids, bodies)| {
                ids.into_iter()
                    .zip(bodies)
                    .map(|(id, (paginating, rows))| SectionPlan {
                        id,
                        paginating,
                        rows,
                    })
                    .collect()
            },
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn pass_journal_is_well_formed(old in snapshot_plan(), new in snapshot_plan()) {
        let journal = journal();
        let source = RecordingSource::new(&journal);
        let data_source: &dyn SectionsDataSource<FakeCell> = source.as_ref();
        let mut surface = RecordingSurface::new(&journal);
        let mut reconciler = Reconciler::default();

        let old = Snapshot::new(build(&old));
        for (s, section) in old.sections().iter().enumerate() {
            for r in 0..section.row_count() {
                surface.bind_at(IndexPath::new(s, r));
            }
        }
        reconciler.reconcile(&mut surface, old, Some(data_source));
        journal.borrow_mut().clear();

        let new = Snapshot::new(build(&new));
        let expected_outline = new.outline();
        let report = reconciler.reconcile(&mut surface, new, Some(data_source));
        let log = entries(&journal);

        // 1. One transaction iff structural.
        let begins = log.iter().filter(|e| *e == "begin").count();
        let ends = log.iter().filter(|e| *e == "end").count();
        prop_assert_eq!(report.transaction, report.batch.has_structural_edits());
        prop_assert_eq!(begins, usize::from(report.transaction));
        prop_assert_eq!(ends, begins);

        let begin = log.iter().position(|e| e == "begin").unwrap_or(log.len());
        let end = log.iter().position(|e| e == "end").unwrap_or(log.len());
        prop_assert!(begin <= end);

        // 2. Fixed primitive order.
        let ranks: Vec<usize> = log[begin..end].iter().filter_map(|e| rank(e)).collect();
        prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "out of order: {:?}", log);
        prop_assert!(log[..begin].iter().all(|e| rank(e).is_none()));

        // 3. Rebinds precede the transaction.
        let binds = log.iter().filter(|e| e.starts_with("bind ")).count();
        let binds_before = log[..begin].iter().filter(|e| e.starts_with("bind ")).count();
        prop_assert_eq!(binds, binds_before);
        prop_assert_eq!(report.rebound, report.batch.content_reloads.len());
        prop_assert_eq!(binds, report.rebound);

        // 4. Pagination after row deletes only.
        let fired: Vec<usize> = log
            .iter()
            .enumerate()
            .filter(|(_, e)| *e == "bottom_reached")
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(fired.len(), report.bottom_reached);
        if let Some(&first) = fired.first() {
            let deletes = log.iter().position(|e| e.starts_with("delete_rows"));
            prop_assert!(deletes.is_some_and(|d| d < first));
            prop_assert!(fired.iter().all(|&i| i < end));
        }

        // 5. Committed.
        prop_assert_eq!(reconciler.snapshot().outline(), expected_outline);
    }
}
