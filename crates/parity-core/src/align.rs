//! Keyed row alignment between a baseline and a candidate log

use crate::error::ConfigError;
use crate::table::Row;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Composite alignment key: one value per key column, in key-column order.
///
/// Ordering is lexicographic on the components, which gives every run the
/// same key visiting order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Key(pub Vec<String>);

impl Key {
    /// Build a key from a row. A column the row lacks contributes an empty string.
    pub fn from_row(row: &Row, key_columns: &[String]) -> Self {
        Key(key_columns
            .iter()
            .map(|col| row.get(col).unwrap_or_default().to_string())
            .collect())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// All rows sharing one key, per side, in file order
#[derive(Debug, Clone)]
pub struct AlignmentGroup<'a> {
    pub key: Key,
    pub baseline: Vec<&'a Row>,
    pub candidate: Vec<&'a Row>,
}

/// One pairing decision inside a group
#[derive(Debug, Clone, Copy)]
pub enum Slot<'a> {
    /// Rows already known to be equivalent
    Equivalent(&'a Row, &'a Row),
    /// Rows paired by position, still to be diffed
    Paired(&'a Row, &'a Row),
    /// Only the baseline has a row here
    BaselineOnly(&'a Row),
    /// Only the candidate has a row here
    CandidateOnly(&'a Row),
}

impl<'a> AlignmentGroup<'a> {
    fn new(key: Key) -> Self {
        Self {
            key,
            baseline: Vec::new(),
            candidate: Vec::new(),
        }
    }

    /// Whether both sides hold the same number of rows
    pub fn counts_match(&self) -> bool {
        self.baseline.len() == self.candidate.len()
    }

    /// Number of positions: the larger of the two side counts
    pub fn len(&self) -> usize {
        self.baseline.len().max(self.candidate.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pair rows regardless of their order within the group.
    ///
    /// Each baseline row, in file order, first takes the earliest unused
    /// candidate row that `equivalent` accepts. Rows left over on both sides
    /// are then paired by position among themselves, and whatever remains is
    /// unmatched. Pairs come back in baseline order, followed by the
    /// unmatched rows of each side.
    pub fn match_slots<F>(&self, mut equivalent: F) -> Vec<Slot<'a>>
    where
        F: FnMut(&Row, &Row) -> bool,
    {
        let mut partner: Vec<Option<usize>> = vec![None; self.baseline.len()];
        let mut taken = vec![false; self.candidate.len()];

        for (bi, &b) in self.baseline.iter().enumerate() {
            let found = (0..self.candidate.len())
                .find(|&ci| !taken[ci] && equivalent(b, self.candidate[ci]));
            if let Some(ci) = found {
                taken[ci] = true;
                partner[bi] = Some(ci);
            }
        }

        let leftover_b: Vec<usize> = (0..self.baseline.len())
            .filter(|&bi| partner[bi].is_none())
            .collect();
        let leftover_c: Vec<usize> = (0..self.candidate.len()).filter(|&ci| !taken[ci]).collect();

        let mut positional: Vec<Option<usize>> = vec![None; self.baseline.len()];
        for (&bi, &ci) in leftover_b.iter().zip(&leftover_c) {
            positional[bi] = Some(ci);
        }

        let mut slots = Vec::with_capacity(self.len());
        for (bi, &b) in self.baseline.iter().enumerate() {
            if let Some(ci) = partner[bi] {
                slots.push(Slot::Equivalent(b, self.candidate[ci]));
            } else if let Some(ci) = positional[bi] {
                slots.push(Slot::Paired(b, self.candidate[ci]));
            }
        }

        let paired = leftover_b.len().min(leftover_c.len());
        for &bi in &leftover_b[paired..] {
            slots.push(Slot::BaselineOnly(self.baseline[bi]));
        }
        for &ci in &leftover_c[paired..] {
            slots.push(Slot::CandidateOnly(self.candidate[ci]));
        }
        slots
    }
}

/// Rows of both logs grouped by key, iterated in sorted key order
#[derive(Debug, Clone, Default)]
pub struct AlignmentIndex<'a> {
    groups: BTreeMap<Key, AlignmentGroup<'a>>,
}

impl<'a> AlignmentIndex<'a> {
    /// Number of distinct keys across both sides
    pub fn key_count(&self) -> usize {
        self.groups.len()
    }

    /// Look up the group for a key
    pub fn group(&self, key: &Key) -> Option<&AlignmentGroup<'a>> {
        self.groups.get(key)
    }

    /// Groups in ascending key order
    pub fn groups(&self) -> impl Iterator<Item = &AlignmentGroup<'a>> {
        self.groups.values()
    }
}

/// Group baseline and candidate rows by their key columns.
///
/// Every row lands in exactly one group. Within a group, rows keep the order
/// they had in their own log.
pub fn align<'a>(
    baseline: &'a [Row],
    candidate: &'a [Row],
    key_columns: &[String],
) -> Result<AlignmentIndex<'a>, ConfigError> {
    if key_columns.is_empty() {
        return Err(ConfigError::EmptyKeyColumns);
    }

    let mut groups: BTreeMap<Key, AlignmentGroup<'a>> = BTreeMap::new();

    for row in baseline {
        let key = Key::from_row(row, key_columns);
        groups
            .entry(key.clone())
            .or_insert_with(|| AlignmentGroup::new(key))
            .baseline
            .push(row);
    }

    for row in candidate {
        let key = Key::from_row(row, key_columns);
        groups
            .entry(key.clone())
            .or_insert_with(|| AlignmentGroup::new(key))
            .candidate
            .push(row);
    }

    Ok(AlignmentIndex { groups })
}
