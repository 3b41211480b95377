//! parity-core: Core library for checking that a candidate event log
//! reproduces a baseline log
//!
//! This library provides functionality to:
//! - Read instrumented CSV logs into rows keyed by column name
//! - Validate log headers against an expected schema
//! - Align rows of both logs by a composite key
//! - Diff aligned rows field by field with per-class numeric tolerances
//! - Aggregate the results into a report with a PASS/FAIL verdict

pub mod align;
pub mod classify;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod report;
pub mod schema;
pub mod table;

pub use align::{align, AlignmentGroup, AlignmentIndex, Key, Slot};
pub use classify::{ColumnClass, ColumnClassifier};
pub use compare::{compare_values, DiffReason, FieldDiff, RowComparator};
pub use config::{split_columns, CompareConfig, Tolerances};
pub use engine::{compare_files, compare_logs};
pub use error::{ConfigError, Error, Result};
pub use parser::{duplicate_columns, read_log, read_log_str};
pub use report::{ComparisonReport, PairDiff, ReportBuilder, RowCountMismatch, Summary, Verdict};
pub use schema::{check_header, load_schema, HeaderCheck};
pub use table::{LogTable, Row, Side};
