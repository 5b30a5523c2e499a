#![forbid(unsafe_code)]

//! JSON-lines batch traces.
//!
//! One record per line:
//! - header (`event="trace_header"`)
//! - one `event="batch"` per animated pass, one `event="reload_data"` per
//!   full reload
//! - summary (`event="trace_summary"`)
//!
//! Every batch line carries an FNV-1a checksum of the applied outline and a
//! running chain over all passes, so two runs of the same script can be
//! compared line by line.

use std::io::{self, Write};

use flist_core::{Outline, Snapshot};
use flist_diff::EditBatch;
use flist_runtime::ReconcileReport;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum TraceRecord<'a> {
    TraceHeader {
        run_id: &'a str,
        seed: Option<u64>,
    },
    Batch {
        pass: u64,
        noop: bool,
        transaction: bool,
        rebound: usize,
        bottom_reached: usize,
        outline_checksum: u64,
        checksum_chain: u64,
        batch: &'a EditBatch,
    },
    ReloadData {
        sections: usize,
        rows: usize,
        outline_checksum: u64,
    },
    TraceSummary {
        passes: u64,
        noop_passes: u64,
        final_checksum_chain: u64,
    },
}

/// Writes batch traces to any [`Write`] sink.
pub struct TraceRecorder<W: Write> {
    writer: W,
    flush_on_write: bool,
    passes: u64,
    noop_passes: u64,
    checksum_chain: u64,
    finished: bool,
}

impl TraceRecorder<Vec<u8>> {
    /// A recorder that keeps the trace in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Vec::new())
    }

    /// The recorded lines so far.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        std::str::from_utf8(&self.writer)
            .map(|text| text.lines().collect())
            .unwrap_or_default()
    }
}

impl<W: Write> TraceRecorder<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            flush_on_write: false,
            passes: 0,
            noop_passes: 0,
            checksum_chain: 0,
            finished: false,
        }
    }

    /// Flush after every line.
    #[must_use]
    pub fn with_flush_on_write(mut self, enabled: bool) -> Self {
        self.flush_on_write = enabled;
        self
    }

    pub fn write_header(&mut self, run_id: &str, seed: Option<u64>) -> io::Result<()> {
        self.write_record(&TraceRecord::TraceHeader { run_id, seed })
    }

    /// Record an animated pass and the snapshot it left applied.
    pub fn record_pass<V>(
        &mut self,
        report: &ReconcileReport,
        applied: &Snapshot<V>,
    ) -> io::Result<()> {
        let outline_checksum = outline_checksum(&applied.outline());
        self.checksum_chain = fnv1a64_pair(self.checksum_chain, outline_checksum);
        self.passes = self.passes.saturating_add(1);
        if report.is_noop() {
            self.noop_passes = self.noop_passes.saturating_add(1);
        }
        let record = TraceRecord::Batch {
            pass: report.pass,
            noop: report.is_noop(),
            transaction: report.transaction,
            rebound: report.rebound,
            bottom_reached: report.bottom_reached,
            outline_checksum,
            checksum_chain: self.checksum_chain,
            batch: &report.batch,
        };
        self.write_record(&record)
    }

    /// Record a full, non-diffed reload.
    pub fn record_reload<V>(&mut self, applied: &Snapshot<V>) -> io::Result<()> {
        self.write_record(&TraceRecord::ReloadData {
            sections: applied.section_count(),
            rows: applied.total_rows(),
            outline_checksum: outline_checksum(&applied.outline()),
        })
    }

    /// Write the summary line. Idempotent.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.write_record(&TraceRecord::TraceSummary {
            passes: self.passes,
            noop_passes: self.noop_passes,
            final_checksum_chain: self.checksum_chain,
        })?;
        self.finished = true;
        self.writer.flush()
    }

    #[must_use]
    pub fn checksum_chain(&self) -> u64 {
        self.checksum_chain
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record(&mut self, record: &TraceRecord<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        if self.flush_on_write {
            self.writer.flush()?;
        }
        Ok(())
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a64_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn fnv1a64_pair(prev: u64, next: u64) -> u64 {
    let hash = fnv1a64_bytes(FNV_OFFSET, &prev.to_le_bytes());
    fnv1a64_bytes(hash, &next.to_le_bytes())
}

/// Order-sensitive checksum of section and row identities.
#[must_use]
pub fn outline_checksum(outline: &Outline) -> u64 {
    let mut hash = FNV_OFFSET;
    for (section, rows) in outline {
        hash = fnv1a64_bytes(hash, b"S");
        hash = fnv1a64_bytes(hash, section.as_str().as_bytes());
        for row in rows {
            hash = fnv1a64_bytes(hash, b"R");
            hash = fnv1a64_bytes(hash, row.as_str().as_bytes());
        }
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use flist_core::ItemId;

    fn outline(plan: &[(&str, &[&str])]) -> Outline {
        plan.iter()
            .map(|(s, rows)| {
                (
                    ItemId::from(*s),
                    rows.iter().map(|r| ItemId::from(*r)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn checksum_is_order_sensitive() {
        let a = outline(&[("s", &["a", "b"])]);
        let b = outline(&[("s", &["b", "a"])]);
        assert_ne!(outline_checksum(&a), outline_checksum(&b));
        assert_eq!(outline_checksum(&a), outline_checksum(&a.clone()));
    }

    #[test]
    fn checksum_separates_rows_from_sections() {
        let a = outline(&[("s", &["t"])]);
        let b = outline(&[("s", &[]), ("t", &[])]);
        assert_ne!(outline_checksum(&a), outline_checksum(&b));
    }

    #[test]
    fn header_and_summary_lines() {
        let mut recorder = TraceRecorder::in_memory();
        recorder.write_header("run-1", Some(7)).unwrap();
        recorder.finish().unwrap();
        recorder.finish().unwrap();

        let lines = recorder.lines();
        assert_eq!(lines.len(), 2);
        let header: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(header["event"], "trace_header");
        assert_eq!(header["seed"], 7);
        let summary: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(summary["event"], "trace_summary");
        assert_eq!(summary["passes"], 0);
    }
}
