//! Expected-header loading and header validation
//!
//! Two schema sources are understood:
//! - plain column lists, one or more columns per line separated by `,` or
//!   `;`, with `#` comments and blank lines skipped
//! - Markdown schema documents, scanned for the `;`-separated header line

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Columns a Markdown header line must contain to be recognised
const MARKDOWN_HEADER_MARKERS: [&str; 4] = ["timestamp", "event", "symbol", "period"];

/// Load the expected column list from a schema file.
///
/// Returns `None` when the file holds no recognisable header.
pub fn load_schema<P: AsRef<Path>>(path: P) -> Result<Option<Vec<String>>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let is_markdown = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"));

    if is_markdown {
        return Ok(extract_markdown_header(&text));
    }

    let columns = parse_schema(&text);
    Ok(if columns.is_empty() { None } else { Some(columns) })
}

/// Parse a plain column-list schema
pub fn parse_schema(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.trim_matches('`').split([',', ';']))
        .map(str::trim)
        .filter(|col| !col.is_empty())
        .map(str::to_string)
        .collect()
}

/// Find the log header inside a Markdown schema document
pub fn extract_markdown_header(text: &str) -> Option<Vec<String>> {
    text.lines()
        .filter(|line| line.contains(';'))
        .map(|line| {
            line.trim()
                .trim_matches('`')
                .split(';')
                .map(|c| c.trim().to_string())
                .collect::<Vec<String>>()
        })
        .find(|cols| {
            MARKDOWN_HEADER_MARKERS
                .iter()
                .all(|marker| cols.iter().any(|c| c == marker))
        })
}

/// Outcome of checking a log header against the schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCheck {
    /// Schema columns the header lacks
    pub missing: Vec<String>,
    /// Header columns the schema does not list
    pub unexpected: Vec<String>,
    /// Same columns, different order
    pub reordered: bool,
}

impl HeaderCheck {
    pub fn matches(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty() && !self.reordered
    }
}

/// Compare a header (whitespace-trimmed) with the expected columns
pub fn check_header(header: &[String], expected: &[String]) -> HeaderCheck {
    let actual: Vec<&str> = header.iter().map(|h| h.trim()).collect();
    let actual_set: HashSet<&str> = actual.iter().copied().collect();
    let expected_set: HashSet<&str> = expected.iter().map(String::as_str).collect();

    let missing = expected
        .iter()
        .filter(|c| !actual_set.contains(c.as_str()))
        .cloned()
        .collect::<Vec<_>>();
    let unexpected = actual
        .iter()
        .filter(|c| !expected_set.contains(*c))
        .map(|c| c.to_string())
        .collect::<Vec<_>>();

    let reordered = missing.is_empty()
        && unexpected.is_empty()
        && actual.iter().copied().ne(expected.iter().map(String::as_str));

    HeaderCheck {
        missing,
        unexpected,
        reordered,
    }
}
