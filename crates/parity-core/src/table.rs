//! Row model for parsed event logs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One side of a comparison run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Baseline,
    Candidate,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Baseline => write!(f, "baseline"),
            Side::Candidate => write!(f, "candidate"),
        }
    }
}

/// A parsed log: its header and every data row, in file order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogTable {
    /// Column names as they appear in the header
    pub header: Vec<String>,
    /// Data rows
    pub rows: Vec<Row>,
    /// Source file path
    pub source_path: PathBuf,
}

impl LogTable {
    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the header contains a column
    pub fn has_column(&self, name: &str) -> bool {
        self.header.iter().any(|c| c == name)
    }
}

/// A single log row: column name to raw string value, in header order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Data row number (1-based, header excluded)
    pub number: usize,
    /// Raw field values keyed by column name
    pub fields: IndexMap<String, String>,
}

impl Row {
    /// Zip a header with a record's values
    pub fn from_values<R, S>(number: usize, header: &[String], values: R) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = values.into_iter();
        let fields = header
            .iter()
            .map(|name| {
                let value = values.next().map(Into::into).unwrap_or_default();
                (name.clone(), value)
            })
            .collect();

        Self { number, fields }
    }

    /// Get a raw value by column name
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Whether both rows hold the same raw value under every column
    pub fn same_values(&self, other: &Row) -> bool {
        self.fields == other.fields
    }

    /// Iterate over (column, value) pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_row_from_values_pads_short_records() {
        let row = Row::from_values(3, &header(&["a", "b", "c"]), vec!["1"]);

        assert_eq!(row.number, 3);
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("b"), Some(""));
        assert_eq!(row.get("c"), Some(""));
    }

    #[test]
    fn test_row_from_values_truncates_long_records() {
        let row = Row::from_values(1, &header(&["a"]), vec!["1", "2", "3"]);

        assert_eq!(row.fields.len(), 1);
        assert_eq!(row.get("a"), Some("1"));
    }

    #[test]
    fn test_row_preserves_header_order() {
        let row = Row::from_values(1, &header(&["z", "a", "m"]), vec!["1", "2", "3"]);
        let cols: Vec<&str> = row.iter().map(|(c, _)| c).collect();

        assert_eq!(cols, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_same_values_ignores_row_number() {
        let cols = header(&["a", "b"]);
        let first = Row::from_values(1, &cols, vec!["1", "x"]);
        let second = Row::from_values(7, &cols, vec!["1", "x"]);
        let other = Row::from_values(2, &cols, vec!["1", "y"]);

        assert!(first.same_values(&second));
        assert!(!first.same_values(&other));
    }
}
