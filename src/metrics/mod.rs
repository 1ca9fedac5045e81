//! Metric Engine
//!
//! Derived KPIs computed from a (typically filtered) [`Dataset`]:
//!
//! - **Summary KPIs** (`summary`): column means for the multi-well page
//! - **Advanced KPIs** (`advanced`): solids-control indices with derived fallbacks
//! - **Cost roll-ups** (`cost`): configurable cost breakdown and two-group comparison
//! - **Sales aggregates** (`sales`): period counts, group-by tables, trends
//!
//! Every ratio goes through [`safe_div`]; an empty dataset or absent column
//! yields zeros, never an error or NaN.

pub mod advanced;
pub mod cost;
pub mod sales;
pub mod summary;

use serde::{Deserialize, Serialize};

use crate::dataset::{columns, Dataset};

/// Division that yields 0 for a zero (or non-finite) denominator.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        numerator / denominator
    }
}

/// Semantic sign of a value: non-negative is positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

/// A named numeric KPI with display metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetric {
    /// Stable identifier (e.g. `"CVR"`, `"total_cost"`)
    pub key: String,
    /// Display label
    pub label: String,
    pub value: f64,
    /// Unit suffix appended on display (e.g. `"%"`, `" $/ft"`)
    pub unit: String,
    /// Decimal places on display
    pub precision: usize,
    pub sign: Sign,
}

impl DerivedMetric {
    pub fn new(key: &str, label: &str, value: f64) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            value,
            unit: String::new(),
            precision: 2,
            sign: Sign::of(value),
        }
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Same metric with a different value; the sign follows the new value.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self.sign = Sign::of(value);
        self
    }

    /// Formatted value, e.g. `"12.35%"`.
    pub fn display(&self) -> String {
        format!("{:.*}{}", self.precision, self.value, self.unit)
    }
}

/// A signed difference with its semantic sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignedDelta {
    pub value: f64,
    pub sign: Sign,
}

impl SignedDelta {
    pub fn between(a: f64, b: f64) -> Self {
        let value = b - a;
        Self {
            value,
            sign: Sign::of(value),
        }
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Unit used to normalize metric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationUnit {
    /// Divide by total interval length drilled
    Feet,
    /// Divide by total drilling hours
    Hours,
    /// Divide by total drilling hours ÷ 24
    Days,
}

impl NormalizationUnit {
    pub fn divisor(self, dataset: &Dataset) -> f64 {
        match self {
            Self::Feet => dataset.column_sum(columns::INT_LENGTH),
            Self::Hours => dataset.column_sum(columns::DRILLING_HOURS),
            Self::Days => dataset.column_sum(columns::DRILLING_HOURS) / 24.0,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Feet => "/ft",
            Self::Hours => "/hr",
            Self::Days => "/day",
        }
    }
}

/// Divide every metric by the unit's total over `dataset`.
pub fn normalize(
    metrics: &[DerivedMetric],
    unit: NormalizationUnit,
    dataset: &Dataset,
) -> Vec<DerivedMetric> {
    let divisor = unit.divisor(dataset);
    metrics
        .iter()
        .map(|m| {
            let unit_suffix = format!("{}{}", m.unit, unit.suffix());
            m.clone()
                .with_value(safe_div(m.value, divisor))
                .with_unit(&unit_suffix)
        })
        .collect()
}
