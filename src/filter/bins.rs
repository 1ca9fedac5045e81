//! Named range-bucket sets for numeric filters (depth, mud weight).

use serde::{Deserialize, Serialize};

use super::{FilterCriterion, FilterError, ALL};
use crate::dataset::columns;

/// One contiguous bucket: `[low, high)`, unbounded above when `high` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub label: String,
    pub low: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    /// Other labels that select this bin
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl Bin {
    pub fn new(label: &str, low: f64, high: Option<f64>) -> Self {
        Self {
            label: label.to_string(),
            low,
            high,
            aliases: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn answers_to(&self, label: &str) -> bool {
        self.label == label || self.aliases.iter().any(|a| a == label)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && self.high.map_or(true, |h| value < h)
    }
}

/// A named partition of one numeric column into contiguous bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinSet {
    pub name: String,
    pub column: String,
    pub bins: Vec<Bin>,
}

impl BinSet {
    /// Measured-depth buckets in feet.
    pub fn depth() -> Self {
        Self {
            name: "depth".to_string(),
            column: columns::MD_DEPTH.to_string(),
            bins: vec![
                Bin::new("<5000 ft", 0.0, Some(5000.0)),
                Bin::new("5000–10000 ft", 5000.0, Some(10000.0)),
                Bin::new("10000–15000 ft", 10000.0, Some(15000.0)),
                Bin::new("15000–20000 ft", 15000.0, Some(20000.0)),
                Bin::new("20000–25000 ft", 20000.0, Some(25000.0)),
                Bin::new("25000 ft and above", 25000.0, None),
            ],
        }
    }

    /// Average mud weight buckets in ppg. The top bin is open-ended and still
    /// answers to the older "14–30" label.
    pub fn mud_weight() -> Self {
        Self {
            name: "mud_weight".to_string(),
            column: columns::AMW.to_string(),
            bins: vec![
                Bin::new("<3", 0.0, Some(3.0)),
                Bin::new("3–6", 3.0, Some(6.0)),
                Bin::new("6–9", 6.0, Some(9.0)),
                Bin::new("9–11", 9.0, Some(11.0)),
                Bin::new("11–14", 11.0, Some(14.0)),
                Bin::new("14 and above", 14.0, None).with_alias("14–30"),
            ],
        }
    }

    /// Bin selected by `label` or one of its aliases.
    pub fn find(&self, label: &str) -> Option<&Bin> {
        self.bins.iter().find(|b| b.answers_to(label))
    }

    /// Menu entries: `"All"` followed by the bin labels in order.
    pub fn options(&self) -> Vec<String> {
        std::iter::once(ALL.to_string())
            .chain(self.bins.iter().map(|b| b.label.clone()))
            .collect()
    }

    /// Criterion for a selected label. `"All"` yields `None` (identity).
    pub fn criterion(&self, label: &str) -> Result<Option<FilterCriterion>, FilterError> {
        if label == ALL {
            return Ok(None);
        }
        let bin = self.find(label).ok_or_else(|| FilterError::UnknownBin {
            set: self.name.clone(),
            label: label.to_string(),
        })?;
        Ok(Some(FilterCriterion::InRange {
            column: self.column.clone(),
            bin: bin.clone(),
        }))
    }

    /// Structural checks: non-empty, finite, contiguous, unique labels, and
    /// only the last bin unbounded.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let name = &self.name;

        if self.bins.is_empty() {
            errors.push(format!("bin set '{name}' has no bins"));
            return errors;
        }

        let last = self.bins.len() - 1;
        for (i, bin) in self.bins.iter().enumerate() {
            if !bin.low.is_finite() || bin.high.is_some_and(|h| !h.is_finite()) {
                errors.push(format!("bin set '{name}': bin '{}' has a non-finite bound", bin.label));
                continue;
            }
            match bin.high {
                Some(high) if high <= bin.low => errors.push(format!(
                    "bin set '{name}': bin '{}' is empty ({} >= {high})",
                    bin.label, bin.low
                )),
                None if i != last => errors.push(format!(
                    "bin set '{name}': only the last bin may be unbounded, '{}' is not last",
                    bin.label
                )),
                _ => {}
            }
            if let Some(next) = self.bins.get(i + 1) {
                if bin.high != Some(next.low) {
                    errors.push(format!(
                        "bin set '{name}': '{}' and '{}' are not contiguous",
                        bin.label, next.label
                    ));
                }
            }
            for label in std::iter::once(&bin.label).chain(&bin.aliases) {
                if self.bins[..i].iter().any(|b| b.answers_to(label)) {
                    errors.push(format!("bin set '{name}': duplicate label '{label}'"));
                }
            }
        }

        errors
    }
}
