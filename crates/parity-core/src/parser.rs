//! CSV reader for instrumented event logs

use crate::error::{Error, Result};
use crate::table::{LogTable, Row};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Delimiters the logger is known to emit, in order of preference
const DELIMITERS: [u8; 3] = [b';', b',', b'\t'];

/// Read a log file into a LogTable
pub fn read_log<P: AsRef<Path>>(path: P) -> Result<LogTable> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_content(&content, path.to_path_buf())
}

/// Read a log from a string (useful for testing)
pub fn read_log_str(content: &str, source_name: &str) -> Result<LogTable> {
    parse_content(content, PathBuf::from(source_name))
}

/// Pick the delimiter used by the header line.
///
/// The most frequent candidate wins; ties go to the earlier entry in
/// [`DELIMITERS`], so `;` beats `,` beats tab.
pub fn sniff_delimiter(content: &str) -> u8 {
    let header_line = content.lines().next().unwrap_or_default();

    let mut best = DELIMITERS[1];
    let mut best_count = 0;
    for &delim in &DELIMITERS {
        let count = header_line.bytes().filter(|&b| b == delim).count();
        if count > best_count {
            best = delim;
            best_count = count;
        }
    }
    best
}

/// Column names that occur more than once in a header, in first-seen order
pub fn duplicate_columns(header: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for column in header {
        if !seen.insert(column.as_str()) && !duplicates.contains(&column.as_str()) {
            duplicates.push(column.as_str());
        }
    }
    duplicates
}

fn parse_content(content: &str, path: PathBuf) -> Result<LogTable> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let delimiter = sniff_delimiter(content);
    let shown = (delimiter as char).escape_default().to_string();
    debug!(path = %path.display(), delimiter = %shown, "reading log");

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // Allow varying number of fields
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let headers = csv_reader.headers().map_err(|e| Error::Csv {
        path: path.clone(),
        source: e,
    })?;

    let header: Vec<String> = headers.iter().map(str::to_string).collect();

    if header.is_empty() || header.iter().all(|c| c.is_empty()) {
        return Err(Error::CsvParse {
            path,
            message: "no columns found in CSV".to_string(),
        });
    }

    for column in duplicate_columns(&header) {
        warn!(
            "column '{}' appears more than once in {}, only its last value is compared",
            column,
            path.display()
        );
    }

    let mut rows = Vec::new();
    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            path: path.clone(),
            source: e,
        })?;

        if record.len() > header.len() {
            warn!(
                "row {} in {} has more cells than columns, truncating",
                row_idx + 1,
                path.display()
            );
        }

        rows.push(Row::from_values(row_idx + 1, &header, record.iter()));
    }

    Ok(LogTable {
        header,
        rows,
        source_path: path,
    })
}
