//! Field-by-field comparison of an aligned row pair

use crate::classify::{ColumnClass, ColumnClassifier};
use crate::config::{CompareConfig, Tolerances};
use crate::error::ConfigError;
use crate::table::Row;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Half-open float range that converts to `i64` without saturating
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Why a field was flagged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffReason {
    /// The candidate row has no such column
    MissingColumn,
    /// Identifier values differ, or at least one is not an integer
    IntMismatch,
    /// Both values are numbers but differ by more than the tolerance
    OutOfTolerance { class: ColumnClass, tolerance: f64 },
    /// At least one value does not parse as a number
    NotNumeric { class: ColumnClass, tolerance: f64 },
    /// At least one value is NaN
    NotANumber { class: ColumnClass, tolerance: f64 },
    /// Generic values differ as strings
    StringMismatch,
    /// Generic values are both numbers but not equal
    NumberMismatch,
}

impl fmt::Display for DiffReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffReason::MissingColumn => write!(f, "missing col in candidate"),
            DiffReason::IntMismatch => write!(f, "int mismatch"),
            DiffReason::OutOfTolerance { class, tolerance } => {
                write!(f, "{} tol={}", class, tolerance)
            }
            DiffReason::NotNumeric { class, tolerance } => {
                write!(f, "{} not numeric, tol={}", class, tolerance)
            }
            DiffReason::NotANumber { class, tolerance } => {
                write!(f, "{} NaN, tol={}", class, tolerance)
            }
            DiffReason::StringMismatch => write!(f, "string mismatch"),
            DiffReason::NumberMismatch => write!(f, "number mismatch"),
        }
    }
}

/// One field of one aligned pair that disagrees beyond tolerance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDiff {
    /// Column name
    pub column: String,
    /// Raw baseline value
    pub baseline: String,
    /// Raw candidate value (empty when the column is missing)
    pub candidate: String,
    /// Why the values were judged different
    pub reason: DiffReason,
}

/// Compares aligned rows using per-class rules
#[derive(Debug, Clone)]
pub struct RowComparator {
    classifier: ColumnClassifier,
    tolerances: Tolerances,
    ignore: BTreeSet<String>,
}

impl RowComparator {
    /// Create a comparator from its parts
    pub fn new(
        classifier: ColumnClassifier,
        tolerances: Tolerances,
        ignore: BTreeSet<String>,
    ) -> Self {
        Self {
            classifier,
            tolerances,
            ignore,
        }
    }

    /// Create a comparator from a run configuration
    pub fn from_config(config: &CompareConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.classifier()?,
            config.tolerances(),
            config.ignore_columns.clone(),
        ))
    }

    /// Diff every non-ignored baseline column against the candidate row.
    ///
    /// Diffs come back in baseline column order. Columns only the candidate
    /// has are not looked at.
    pub fn compare(&self, baseline: &Row, candidate: &Row) -> Vec<FieldDiff> {
        let mut diffs = Vec::new();

        for (column, b) in baseline.iter() {
            if self.ignore.contains(column) {
                continue;
            }

            let Some(c) = candidate.get(column) else {
                diffs.push(FieldDiff {
                    column: column.to_string(),
                    baseline: b.to_string(),
                    candidate: String::new(),
                    reason: DiffReason::MissingColumn,
                });
                continue;
            };

            let class = self.classifier.classify(column);
            if let Some(reason) = compare_values(class, b, c, &self.tolerances) {
                diffs.push(FieldDiff {
                    column: column.to_string(),
                    baseline: b.to_string(),
                    candidate: c.to_string(),
                    reason,
                });
            }
        }

        diffs
    }
}

/// Compare two raw values under a column class.
///
/// Byte-identical values always match, so a log compared with itself is
/// clean even where a cell is malformed.
pub fn compare_values(
    class: ColumnClass,
    baseline: &str,
    candidate: &str,
    tolerances: &Tolerances,
) -> Option<DiffReason> {
    if baseline == candidate {
        return None;
    }

    match class {
        ColumnClass::Identifier => match (parse_int(baseline), parse_int(candidate)) {
            (Some(b), Some(c)) if b == c => None,
            _ => Some(DiffReason::IntMismatch),
        },
        ColumnClass::Price | ColumnClass::Money | ColumnClass::Lots => {
            let tolerance = tolerances.for_class(class).unwrap_or_default();
            match (parse_float(baseline), parse_float(candidate)) {
                (Some(b), Some(c)) if b.is_nan() || c.is_nan() => {
                    Some(DiffReason::NotANumber { class, tolerance })
                }
                (Some(b), Some(c)) if exceeds_tolerance(b, c, tolerance) => {
                    Some(DiffReason::OutOfTolerance { class, tolerance })
                }
                (Some(_), Some(_)) => None,
                _ => Some(DiffReason::NotNumeric { class, tolerance }),
            }
        }
        ColumnClass::Generic => match (parse_float(baseline), parse_float(candidate)) {
            (Some(b), Some(c)) if b == c => None,
            (Some(_), Some(_)) => Some(DiffReason::NumberMismatch),
            _ => Some(DiffReason::StringMismatch),
        },
    }
}

/// Whether `b` and `c` differ by more than `tolerance`.
///
/// A difference of exactly the tolerance is accepted even when decimal
/// inputs leave it a few ulps above the tolerance after parsing.
fn exceeds_tolerance(b: f64, c: f64, tolerance: f64) -> bool {
    let slack = f64::EPSILON * b.abs().max(c.abs());
    (b - c).abs() - tolerance > slack
}

/// Parse a float, ignoring surrounding whitespace. Empty is not a number.
pub fn parse_float(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok()
}

/// Parse an integer, falling back to a truncated float (`"3.0"` → 3).
///
/// Floats outside the `i64` range are unparsable rather than saturated.
pub fn parse_int(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(i) = value.parse::<i64>() {
        return Some(i);
    }
    value
        .parse::<f64>()
        .ok()
        .map(f64::trunc)
        .filter(|f| (I64_LOWER..I64_UPPER).contains(f))
        .map(|f| f as i64)
}
