//! Comparison run configuration

use crate::classify::{ColumnClass, ColumnClassifier};
use crate::error::{ConfigError, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Default alignment key
pub const DEFAULT_KEY_COLUMNS: &[&str] = &["timestamp", "event", "ticket", "op"];

/// Everything that shapes one comparison run.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Columns whose values form the alignment key, in order
    pub key_columns: Vec<String>,
    /// Columns never compared
    pub ignore_columns: BTreeSet<String>,
    /// Absolute tolerance for price columns
    pub tolerance_price: f64,
    /// Absolute tolerance for money columns
    pub tolerance_money: f64,
    /// Absolute tolerance for lot-size columns
    pub tolerance_lots: f64,
    /// Cap on retained detail records
    pub max_diffs: usize,
    /// Fail the run when any key has a different row count per side
    pub strict_rows: bool,
    /// Column name → class name, overriding the built-in sets
    pub column_classes: BTreeMap<String, String>,
    /// Column name → label used when rendering
    pub display_names: BTreeMap<String, String>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            key_columns: DEFAULT_KEY_COLUMNS.iter().map(|c| c.to_string()).collect(),
            ignore_columns: BTreeSet::new(),
            tolerance_price: 1e-6,
            tolerance_money: 0.01,
            tolerance_lots: 1e-8,
            max_diffs: 50,
            strict_rows: false,
            column_classes: BTreeMap::new(),
            display_names: BTreeMap::new(),
        }
    }
}

impl CompareConfig {
    /// Load a config file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the config to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check the config before any comparison runs
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.key_columns.is_empty() {
            return Err(ConfigError::EmptyKeyColumns);
        }

        let tolerances = self.tolerances();
        for class in [ColumnClass::Price, ColumnClass::Money, ColumnClass::Lots] {
            let value = tolerances.for_class(class).unwrap_or_default();
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteTolerance {
                    class: class.to_string(),
                });
            }
            if value < 0.0 {
                return Err(ConfigError::NegativeTolerance {
                    class: class.to_string(),
                    value,
                });
            }
        }

        // Surfaces unknown class names
        self.classifier()?;
        Ok(())
    }

    /// The per-class tolerances
    pub fn tolerances(&self) -> Tolerances {
        Tolerances {
            price: self.tolerance_price,
            money: self.tolerance_money,
            lots: self.tolerance_lots,
        }
    }

    /// Build the column classifier: built-in sets plus this config's overrides
    pub fn classifier(&self) -> std::result::Result<ColumnClassifier, ConfigError> {
        let mut classifier = ColumnClassifier::with_defaults();
        classifier.apply_overrides(&self.column_classes)?;
        Ok(classifier)
    }
}

/// Absolute tolerances for the float-compared column classes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    pub price: f64,
    pub money: f64,
    pub lots: f64,
}

impl Tolerances {
    /// Tolerance for a class, or None for classes compared exactly
    pub fn for_class(&self, class: ColumnClass) -> Option<f64> {
        match class {
            ColumnClass::Price => Some(self.price),
            ColumnClass::Money => Some(self.money),
            ColumnClass::Lots => Some(self.lots),
            ColumnClass::Identifier | ColumnClass::Generic => None,
        }
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        CompareConfig::default().tolerances()
    }
}

/// Split a comma-separated column list, dropping blanks
pub fn split_columns(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
