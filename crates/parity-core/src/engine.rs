//! One comparison run: validate, align, compare, aggregate

use crate::align::{align, Slot};
use crate::compare::RowComparator;
use crate::config::CompareConfig;
use crate::error::{ConfigError, Result};
use crate::parser::read_log;
use crate::report::{ComparisonReport, ReportBuilder};
use crate::table::{LogTable, Side};
use std::path::Path;
use tracing::info;

/// Compare a candidate log against a baseline log.
///
/// Fails only on configuration problems, which are all detected before the
/// first row pair is compared. Every key column must be present in both
/// headers.
pub fn compare_logs(
    baseline: &LogTable,
    candidate: &LogTable,
    config: &CompareConfig,
) -> Result<ComparisonReport> {
    config.validate()?;
    check_key_columns(baseline, Side::Baseline, &config.key_columns)?;
    check_key_columns(candidate, Side::Candidate, &config.key_columns)?;

    let comparator = RowComparator::from_config(config)?;
    let index = align(&baseline.rows, &candidate.rows, &config.key_columns)?;

    let mut builder = ReportBuilder::new(
        baseline.row_count(),
        candidate.row_count(),
        config.max_diffs,
        config.strict_rows,
    );

    for group in index.groups() {
        // Matching is quadratic in the group size; identical rows skip the
        // field-by-field compare.
        let slots =
            group.match_slots(|b, c| b.same_values(c) || comparator.compare(b, c).is_empty());
        builder.record_row_count(group, &slots);

        for slot in &slots {
            match *slot {
                Slot::Equivalent(b, c) => builder.record_pair(&group.key, b, c, Vec::new()),
                Slot::Paired(b, c) => {
                    let diffs = comparator.compare(b, c);
                    builder.record_pair(&group.key, b, c, diffs);
                }
                Slot::BaselineOnly(_) | Slot::CandidateOnly(_) => {}
            }
        }
    }

    let report = builder.finish();
    info!(
        keys = index.key_count(),
        aligned_pairs = report.summary.aligned_pairs,
        mismatched_pairs = report.summary.mismatched_pairs,
        missing_in_candidate = report.summary.missing_in_candidate,
        extra_in_candidate = report.summary.extra_in_candidate,
        verdict = %report.verdict,
        "comparison finished"
    );

    Ok(report)
}

/// Read two log files and compare them
pub fn compare_files<P: AsRef<Path>, Q: AsRef<Path>>(
    baseline: P,
    candidate: Q,
    config: &CompareConfig,
) -> Result<ComparisonReport> {
    let baseline = read_log(baseline)?;
    let candidate = read_log(candidate)?;
    compare_logs(&baseline, &candidate, config)
}

fn check_key_columns(
    table: &LogTable,
    side: Side,
    key_columns: &[String],
) -> std::result::Result<(), ConfigError> {
    match key_columns.iter().find(|col| !table.has_column(col)) {
        Some(col) => Err(ConfigError::KeyColumnMissing {
            column: col.clone(),
            side: side.to_string(),
        }),
        None => Ok(()),
    }
}
