//! Comparison report and the aggregator that builds it
//!
//! A [`ReportBuilder`] accumulates counters and capped detail records while
//! key groups are processed. [`ReportBuilder::finish`] consumes it and
//! returns the read-only [`ComparisonReport`] with its verdict.

use crate::align::{AlignmentGroup, Key, Slot};
use crate::compare::FieldDiff;
use crate::table::Row;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Overall outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

/// Run counters. These are exact even when detail records are capped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Rows read from the baseline log
    pub baseline_rows: usize,
    /// Rows read from the candidate log
    pub candidate_rows: usize,
    /// Baseline/candidate pairs that were compared
    pub aligned_pairs: usize,
    /// Aligned pairs with at least one field diff
    pub mismatched_pairs: usize,
    /// Baseline rows with no candidate counterpart
    pub missing_in_candidate: usize,
    /// Candidate rows with no baseline counterpart
    pub extra_in_candidate: usize,
    /// Keys whose row counts differ between sides
    pub rowcount_mismatch_keys: usize,
}

/// A key whose group sizes differ between the two logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowCountMismatch {
    pub key: Key,
    pub baseline_count: usize,
    pub candidate_count: usize,
    /// Row numbers of baseline rows left without a partner
    pub missing_in_candidate: Vec<usize>,
    /// Row numbers of candidate rows left without a partner
    pub extra_in_candidate: Vec<usize>,
}

/// Field diffs for one aligned pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairDiff {
    pub key: Key,
    pub baseline_row: usize,
    pub candidate_row: usize,
    pub diffs: Vec<FieldDiff>,
}

/// Finished outcome of one comparison run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub summary: Summary,
    /// Row-count mismatches in key order (capped)
    pub rowcount_mismatches: Vec<RowCountMismatch>,
    /// Mismatching pairs in key order (capped)
    pub pair_diffs: Vec<PairDiff>,
    /// Detail records dropped because of the cap
    pub omitted_details: usize,
    /// Whether row-count mismatches alone fail the run
    pub strict_rows: bool,
    pub verdict: Verdict,
}

impl ComparisonReport {
    pub fn passed(&self) -> bool {
        self.verdict.is_pass()
    }

    /// Number of detail records kept
    pub fn detail_count(&self) -> usize {
        self.rowcount_mismatches.len() + self.pair_diffs.len()
    }
}

/// Accumulates results while key groups are processed
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    summary: Summary,
    rowcount_mismatches: Vec<RowCountMismatch>,
    pair_diffs: Vec<PairDiff>,
    omitted_details: usize,
    max_diffs: usize,
    strict_rows: bool,
}

impl ReportBuilder {
    /// Start a report for logs of the given sizes
    pub fn new(baseline_rows: usize, candidate_rows: usize, max_diffs: usize, strict_rows: bool) -> Self {
        Self {
            summary: Summary {
                baseline_rows,
                candidate_rows,
                ..Default::default()
            },
            rowcount_mismatches: Vec::new(),
            pair_diffs: Vec::new(),
            omitted_details: 0,
            max_diffs,
            strict_rows,
        }
    }

    fn has_room(&self) -> bool {
        self.rowcount_mismatches.len() + self.pair_diffs.len() < self.max_diffs
    }

    /// Record a key group whose sides hold different numbers of rows.
    ///
    /// `slots` is the group's pairing; its one-sided slots name the rows
    /// left without a partner. Groups with matching counts are ignored.
    pub fn record_row_count(&mut self, group: &AlignmentGroup<'_>, slots: &[Slot<'_>]) {
        if group.counts_match() {
            return;
        }

        let mut missing = Vec::new();
        let mut extra = Vec::new();
        for slot in slots {
            match slot {
                Slot::BaselineOnly(row) => missing.push(row.number),
                Slot::CandidateOnly(row) => extra.push(row.number),
                Slot::Equivalent(..) | Slot::Paired(..) => {}
            }
        }

        debug!(
            key = %group.key,
            baseline = group.baseline.len(),
            candidate = group.candidate.len(),
            "row count mismatch"
        );

        self.summary.rowcount_mismatch_keys += 1;
        self.summary.missing_in_candidate += missing.len();
        self.summary.extra_in_candidate += extra.len();

        if self.has_room() {
            self.rowcount_mismatches.push(RowCountMismatch {
                key: group.key.clone(),
                baseline_count: group.baseline.len(),
                candidate_count: group.candidate.len(),
                missing_in_candidate: missing,
                extra_in_candidate: extra,
            });
        } else {
            self.omitted_details += 1;
        }
    }

    /// Record one compared pair and whatever diffs it produced
    pub fn record_pair(&mut self, key: &Key, baseline: &Row, candidate: &Row, diffs: Vec<FieldDiff>) {
        self.summary.aligned_pairs += 1;
        if diffs.is_empty() {
            return;
        }

        debug!(
            key = %key,
            baseline_row = baseline.number,
            candidate_row = candidate.number,
            fields = diffs.len(),
            "field mismatch"
        );

        self.summary.mismatched_pairs += 1;
        if self.has_room() {
            self.pair_diffs.push(PairDiff {
                key: key.clone(),
                baseline_row: baseline.number,
                candidate_row: candidate.number,
                diffs,
            });
        } else {
            self.omitted_details += 1;
        }
    }

    /// Close the report and decide the verdict
    pub fn finish(self) -> ComparisonReport {
        let rows_fail = self.strict_rows && self.summary.rowcount_mismatch_keys > 0;
        let fields_fail = self.summary.mismatched_pairs > 0;
        let verdict = if rows_fail || fields_fail {
            Verdict::Fail
        } else {
            Verdict::Pass
        };

        ComparisonReport {
            summary: self.summary,
            rowcount_mismatches: self.rowcount_mismatches,
            pair_diffs: self.pair_diffs,
            omitted_details: self.omitted_details,
            strict_rows: self.strict_rows,
            verdict,
        }
    }
}
