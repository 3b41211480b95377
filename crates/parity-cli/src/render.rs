//! Text and JSON rendering of comparison reports

use chrono::{DateTime, Utc};
use parity_core::{ComparisonReport, HeaderCheck, PairDiff, RowCountMismatch};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

/// Label to show for a column: its configured display name, else the column itself
pub fn display_name<'a>(column: &'a str, names: &'a BTreeMap<String, String>) -> &'a str {
    names.get(column).map(String::as_str).unwrap_or(column)
}

/// A report as written to disk or printed with `--format json`
#[derive(Debug, Serialize)]
pub struct ReportFile<'a> {
    /// When the comparison ran
    pub generated_at: DateTime<Utc>,
    pub baseline: PathBuf,
    pub candidate: PathBuf,
    /// Schema validation per side, when a schema was given and understood
    pub schema: Option<SchemaOutcome>,
    /// Verdict after schema validation is taken into account
    pub passed: bool,
    pub report: &'a ComparisonReport,
}

/// Header check results for both logs
#[derive(Debug, Clone, Serialize)]
pub struct SchemaOutcome {
    pub baseline: HeaderCheck,
    pub candidate: HeaderCheck,
}

impl SchemaOutcome {
    pub fn matches(&self) -> bool {
        self.baseline.matches() && self.candidate.matches()
    }
}

enum Detail<'a> {
    Rows(&'a RowCountMismatch),
    Fields(&'a PairDiff),
}

/// Interleave both detail lists by key; row-count records go first on ties
fn details(report: &ComparisonReport) -> Vec<Detail<'_>> {
    let mut rows = report.rowcount_mismatches.iter().peekable();
    let mut fields = report.pair_diffs.iter().peekable();
    let mut out = Vec::with_capacity(report.detail_count());

    loop {
        let take_rows = match (rows.peek(), fields.peek()) {
            (Some(r), Some(f)) => r.key <= f.key,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        if take_rows {
            out.extend(rows.next().map(Detail::Rows));
        } else {
            out.extend(fields.next().map(Detail::Fields));
        }
    }
    out
}

/// Write the human-readable report: detail lines, then the summary block
pub fn write_text<W: Write>(
    out: &mut W,
    report: &ComparisonReport,
    display_names: &BTreeMap<String, String>,
    passed: bool,
) -> io::Result<()> {
    for detail in details(report) {
        match detail {
            Detail::Rows(mismatch) => {
                for row in &mismatch.missing_in_candidate {
                    writeln!(out, "[MISS] Missing in candidate key={} base_row={}", mismatch.key, row)?;
                }
                for row in &mismatch.extra_in_candidate {
                    writeln!(out, "[MISS] Extra in candidate only key={} cand_row={}", mismatch.key, row)?;
                }
            }
            Detail::Fields(pair) => {
                writeln!(
                    out,
                    "[DIFF] key={} base_row={} cand_row={}",
                    pair.key, pair.baseline_row, pair.candidate_row
                )?;
                for diff in &pair.diffs {
                    writeln!(
                        out,
                        "  - {}: base={} cand={} ({})",
                        display_name(&diff.column, display_names),
                        diff.baseline,
                        diff.candidate,
                        diff.reason
                    )?;
                }
            }
        }
    }

    if report.omitted_details > 0 {
        writeln!(out, "... ({} more records not shown)", report.omitted_details)?;
    }

    let s = &report.summary;
    writeln!(out)?;
    writeln!(out, "=== SUMMARY ===")?;
    writeln!(out, "Baseline rows: {} | Candidate rows: {}", s.baseline_rows, s.candidate_rows)?;
    writeln!(out, "Aligned pairs: {}", s.aligned_pairs)?;
    writeln!(
        out,
        "Missing in candidate: {} | Extra in candidate: {}",
        s.missing_in_candidate, s.extra_in_candidate
    )?;
    writeln!(out, "Row pairs with diffs: {}", s.mismatched_pairs)?;
    writeln!(out, "RESULT: {}", if passed { "PASS" } else { "FAIL" })?;
    Ok(())
}

/// Write a report file as pretty JSON
pub fn write_json<W: Write>(out: &mut W, file: &ReportFile<'_>) -> parity_core::Result<()> {
    serde_json::to_writer_pretty(&mut *out, file)?;
    writeln!(out)?;
    Ok(())
}
