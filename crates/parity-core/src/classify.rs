//! Column classification: which comparison rule applies to which column

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Integer identifiers the logger writes (matched case-sensitively)
pub const DEFAULT_IDENTIFIER_COLUMNS: &[&str] = &[
    "ticket", "magic", "period", "op", "slip", "result", "error", "spread",
];

/// Price-like columns
pub const DEFAULT_PRICE_COLUMNS: &[&str] = &[
    "price",
    "open_price",
    "close_price",
    "sl",
    "tp",
    "bid",
    "ask",
    "vwap",
    "basket_tp",
];

/// Account-currency columns
pub const DEFAULT_MONEY_COLUMNS: &[&str] = &[
    "profit",
    "commission",
    "swap",
    "balance",
    "equity",
    "floating_pl",
    "closed_pl_today",
];

/// Position-size columns
pub const DEFAULT_LOTS_COLUMNS: &[&str] = &["lots", "volume"];

/// Comparison semantics of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnClass {
    /// Integer identifier, compared exactly after integer parsing
    Identifier,
    /// Price, compared with the price tolerance
    Price,
    /// Money amount, compared with the money tolerance
    Money,
    /// Lot size, compared with the lots tolerance
    Lots,
    /// Anything else: string equality, or numeric equality when both sides are numbers
    Generic,
}

impl ColumnClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnClass::Identifier => "identifier",
            ColumnClass::Price => "price",
            ColumnClass::Money => "money",
            ColumnClass::Lots => "lots",
            ColumnClass::Generic => "generic",
        }
    }
}

impl fmt::Display for ColumnClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identifier" | "int" | "integer" => Ok(ColumnClass::Identifier),
            "price" => Ok(ColumnClass::Price),
            "money" => Ok(ColumnClass::Money),
            "lots" => Ok(ColumnClass::Lots),
            "generic" | "string" => Ok(ColumnClass::Generic),
            other => Err(other.to_string()),
        }
    }
}

/// Maps column names to a [`ColumnClass`].
///
/// Identifier membership is exact; price, money and lots membership ignore
/// ASCII case. Explicit overrides win over every set.
#[derive(Debug, Clone, Default)]
pub struct ColumnClassifier {
    identifiers: HashSet<String>,
    prices: HashSet<String>,
    money: HashSet<String>,
    lots: HashSet<String>,
    overrides: BTreeMap<String, ColumnClass>,
}

impl ColumnClassifier {
    /// A classifier with no known columns; everything is generic
    pub fn empty() -> Self {
        Self::default()
    }

    /// A classifier seeded with the logger's known column sets
    pub fn with_defaults() -> Self {
        let mut classifier = Self::empty();
        for name in DEFAULT_IDENTIFIER_COLUMNS {
            classifier.add(name, ColumnClass::Identifier);
        }
        for name in DEFAULT_PRICE_COLUMNS {
            classifier.add(name, ColumnClass::Price);
        }
        for name in DEFAULT_MONEY_COLUMNS {
            classifier.add(name, ColumnClass::Money);
        }
        for name in DEFAULT_LOTS_COLUMNS {
            classifier.add(name, ColumnClass::Lots);
        }
        classifier
    }

    /// Add a column to one of the known sets
    pub fn add(&mut self, column: &str, class: ColumnClass) {
        match class {
            ColumnClass::Identifier => {
                self.identifiers.insert(column.to_string());
            }
            ColumnClass::Price => {
                self.prices.insert(column.to_ascii_lowercase());
            }
            ColumnClass::Money => {
                self.money.insert(column.to_ascii_lowercase());
            }
            ColumnClass::Lots => {
                self.lots.insert(column.to_ascii_lowercase());
            }
            // Generic is the fallback; an explicit generic needs an override
            ColumnClass::Generic => {
                self.overrides.insert(column.to_string(), ColumnClass::Generic);
            }
        }
    }

    /// Force a column's class regardless of the known sets
    pub fn set_override(&mut self, column: &str, class: ColumnClass) {
        self.overrides.insert(column.to_string(), class);
    }

    /// Apply name → class-name overrides, rejecting unknown class names
    pub fn apply_overrides(
        &mut self,
        overrides: &BTreeMap<String, String>,
    ) -> Result<(), ConfigError> {
        for (column, class_name) in overrides {
            let class = class_name
                .parse::<ColumnClass>()
                .map_err(|class| ConfigError::UnknownColumnClass {
                    column: column.clone(),
                    class,
                })?;
            self.set_override(column, class);
        }
        Ok(())
    }

    /// Classify a column name
    pub fn classify(&self, column: &str) -> ColumnClass {
        if let Some(class) = self.overrides.get(column) {
            return *class;
        }
        if self.identifiers.contains(column) {
            return ColumnClass::Identifier;
        }

        let lower = column.to_ascii_lowercase();
        if self.prices.contains(&lower) {
            ColumnClass::Price
        } else if self.money.contains(&lower) {
            ColumnClass::Money
        } else if self.lots.contains(&lower) {
            ColumnClass::Lots
        } else {
            ColumnClass::Generic
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sets() {
        let c = ColumnClassifier::with_defaults();

        assert_eq!(c.classify("ticket"), ColumnClass::Identifier);
        assert_eq!(c.classify("magic"), ColumnClass::Identifier);
        assert_eq!(c.classify("price"), ColumnClass::Price);
        assert_eq!(c.classify("vwap"), ColumnClass::Price);
        assert_eq!(c.classify("floating_pl"), ColumnClass::Money);
        assert_eq!(c.classify("lots"), ColumnClass::Lots);
        assert_eq!(c.classify("symbol"), ColumnClass::Generic);
    }

    #[test]
    fn test_identifier_is_case_sensitive() {
        let c = ColumnClassifier::with_defaults();

        assert_eq!(c.classify("Ticket"), ColumnClass::Generic);
        assert_eq!(c.classify("TICKET"), ColumnClass::Generic);
    }

    #[test]
    fn test_numeric_sets_ignore_case() {
        let c = ColumnClassifier::with_defaults();

        assert_eq!(c.classify("Price"), ColumnClass::Price);
        assert_eq!(c.classify("BID"), ColumnClass::Price);
        assert_eq!(c.classify("Equity"), ColumnClass::Money);
        assert_eq!(c.classify("Volume"), ColumnClass::Lots);
    }

    #[test]
    fn test_caller_can_extend_sets() {
        let mut c = ColumnClassifier::empty();
        assert_eq!(c.classify("mid"), ColumnClass::Generic);

        c.add("Mid", ColumnClass::Price);
        assert_eq!(c.classify("mid"), ColumnClass::Price);
    }

    #[test]
    fn test_overrides_win() {
        let mut c = ColumnClassifier::with_defaults();
        let mut overrides = BTreeMap::new();
        overrides.insert("spread".to_string(), "price".to_string());
        overrides.insert("lots".to_string(), "generic".to_string());
        c.apply_overrides(&overrides).unwrap();

        assert_eq!(c.classify("spread"), ColumnClass::Price);
        assert_eq!(c.classify("lots"), ColumnClass::Generic);
    }

    #[test]
    fn test_unknown_override_class_is_rejected() {
        let mut c = ColumnClassifier::with_defaults();
        let mut overrides = BTreeMap::new();
        overrides.insert("spread".to_string(), "pips".to_string());

        let err = c.apply_overrides(&overrides).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownColumnClass {
                column: "spread".to_string(),
                class: "pips".to_string(),
            }
        );
    }

    #[test]
    fn test_class_names_parse() {
        assert_eq!("Money".parse::<ColumnClass>(), Ok(ColumnClass::Money));
        assert_eq!("int".parse::<ColumnClass>(), Ok(ColumnClass::Identifier));
        assert!("nope".parse::<ColumnClass>().is_err());
    }
}
