//! Cost Estimator
//!
//! A [`CostConfiguration`] holds the rates and fixed costs of one shaker
//! setup. Paired with a dataset subset it produces a [`CostBreakdown`]:
//!
//! ```text
//! dilution   = dilution_rate × Σ Total_Dil
//! haul_off   = haul_rate × Σ Haul_OFF
//! screens    = screen_price × screen_count
//! equipment  = safe_div(equipment_cost × equipment_count, equipment_life_years)
//! total      = dilution + haul_off + screens + equipment + engineering + other
//! cost_per_ft = safe_div(total, Σ IntLength)
//! ```
//!
//! Two groups (by default Derrick vs Non-Derrick shakers) can be compared
//! side by side; deltas are reported as group B minus group A.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{safe_div, DerivedMetric, SignedDelta};
use crate::dataset::{columns, Dataset, MetricTable};
use crate::filter::{self, FilterCriterion};

/// Rejected cost parameters.
#[derive(Debug, Error, PartialEq)]
pub enum CostConfigError {
    #[error("Cost parameter '{field}' must be finite (got {value})")]
    NonFinite { field: &'static str, value: f64 },

    #[error("Cost parameter '{field}' must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("Cost parameter 'shaker_label' must not be empty")]
    EmptyShakerLabel,
}

/// `flowline_Shakers` value of Derrick-equipped rigs.
pub const DERRICK_SHAKER: &str = "Derrick";
/// `flowline_Shakers` value of rigs without Derrick equipment.
pub const NON_DERRICK_SHAKER: &str = "Non-Derrick";

// ============================================================================
// Configuration
// ============================================================================

/// Unvalidated cost parameters as they appear in TOML or JSON. Every field
/// is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostParameters {
    /// Display name of the breakdown
    pub name: String,
    /// `flowline_Shakers` value the preset prices when grouped by shaker
    pub shaker_label: String,
    /// $ per bbl of dilution
    pub dilution_rate: f64,
    /// $ per bbl hauled off
    pub haul_rate: f64,
    pub screen_price: f64,
    pub screen_count: f64,
    /// Unit cost of one shaker
    pub equipment_cost: f64,
    pub equipment_count: f64,
    pub equipment_life_years: f64,
    pub engineering_cost: f64,
    pub other_cost: f64,
}

impl CostParameters {
    pub fn derrick() -> Self {
        Self {
            name: "Derrick".to_string(),
            shaker_label: DERRICK_SHAKER.to_string(),
            dilution_rate: 100.0,
            haul_rate: 20.0,
            screen_price: 500.0,
            screen_count: 1.0,
            equipment_cost: 100_000.0,
            equipment_count: 3.0,
            equipment_life_years: 7.0,
            engineering_cost: 1_000.0,
            other_cost: 500.0,
        }
    }

    pub fn non_derrick() -> Self {
        Self {
            name: "Non-Derrick".to_string(),
            shaker_label: NON_DERRICK_SHAKER.to_string(),
            dilution_rate: 100.0,
            haul_rate: 20.0,
            screen_price: 350.0,
            screen_count: 2.0,
            equipment_cost: 75_000.0,
            equipment_count: 3.0,
            equipment_life_years: 5.0,
            engineering_cost: 1_000.0,
            other_cost: 500.0,
        }
    }

    fn fields(&self) -> [(&'static str, f64); 9] {
        [
            ("dilution_rate", self.dilution_rate),
            ("haul_rate", self.haul_rate),
            ("screen_price", self.screen_price),
            ("screen_count", self.screen_count),
            ("equipment_cost", self.equipment_cost),
            ("equipment_count", self.equipment_count),
            ("equipment_life_years", self.equipment_life_years),
            ("engineering_cost", self.engineering_cost),
            ("other_cost", self.other_cost),
        ]
    }
}

/// Validated cost parameters: every value finite and non-negative.
///
/// A zero equipment lifetime is accepted; the amortized equipment cost is
/// then zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CostParameters", into = "CostParameters")]
pub struct CostConfiguration {
    params: CostParameters,
}

impl TryFrom<CostParameters> for CostConfiguration {
    type Error = CostConfigError;

    fn try_from(params: CostParameters) -> Result<Self, Self::Error> {
        if params.shaker_label.trim().is_empty() {
            return Err(CostConfigError::EmptyShakerLabel);
        }
        for (field, value) in params.fields() {
            if !value.is_finite() {
                return Err(CostConfigError::NonFinite { field, value });
            }
            if value < 0.0 {
                return Err(CostConfigError::Negative { field, value });
            }
        }
        Ok(Self { params })
    }
}

impl From<CostConfiguration> for CostParameters {
    fn from(config: CostConfiguration) -> Self {
        config.params
    }
}

impl CostConfiguration {
    pub fn new(params: CostParameters) -> Result<Self, CostConfigError> {
        Self::try_from(params)
    }

    pub fn params(&self) -> &CostParameters {
        &self.params
    }

    pub fn name(&self) -> &str {
        &self.params.name
    }

    pub fn shaker_label(&self) -> &str {
        &self.params.shaker_label
    }

    pub fn screen_cost(&self) -> f64 {
        self.params.screen_price * self.params.screen_count
    }

    pub fn equipment_cost(&self) -> f64 {
        safe_div(
            self.params.equipment_cost * self.params.equipment_count,
            self.params.equipment_life_years,
        )
    }

    /// Costs that do not scale with drilled volume.
    pub fn fixed_cost(&self) -> f64 {
        self.screen_cost()
            + self.equipment_cost()
            + self.params.engineering_cost
            + self.params.other_cost
    }
}

// ============================================================================
// Breakdown
// ============================================================================

/// Cost roll-up for one dataset subset under one configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub name: String,
    pub records: usize,
    pub total_dilution: f64,
    pub total_haul_off: f64,
    pub total_interval: f64,
    pub dilution_cost: f64,
    pub haul_off_cost: f64,
    pub screen_cost: f64,
    pub equipment_cost: f64,
    pub engineering_cost: f64,
    pub other_cost: f64,
    pub total_cost: f64,
    pub cost_per_ft: f64,
}

impl CostBreakdown {
    pub fn metrics(&self) -> Vec<DerivedMetric> {
        let money = |key: &str, label: &str, value: f64| DerivedMetric::new(key, label, value).with_unit(" $");
        vec![
            money("dilution_cost", "Dilution Cost", self.dilution_cost),
            money("haul_off_cost", "Haul-off Cost", self.haul_off_cost),
            money("screen_cost", "Screen Cost", self.screen_cost),
            money("equipment_cost", "Equipment Cost", self.equipment_cost),
            money("engineering_cost", "Engineering Cost", self.engineering_cost),
            money("other_cost", "Other Cost", self.other_cost),
            money("total_cost", "Total Cost", self.total_cost),
            DerivedMetric::new("cost_per_ft", "Cost per Foot", self.cost_per_ft).with_unit(" $/ft"),
        ]
    }
}

/// Compute the cost breakdown of `dataset` under `config`.
pub fn estimate(dataset: &Dataset, config: &CostConfiguration) -> CostBreakdown {
    let p = config.params();
    let total_dilution = dataset.column_sum(columns::TOTAL_DIL);
    let total_haul_off = dataset.column_sum(columns::HAUL_OFF);
    let total_interval = dataset.column_sum(columns::INT_LENGTH);

    let dilution_cost = p.dilution_rate * total_dilution;
    let haul_off_cost = p.haul_rate * total_haul_off;
    let total_cost = dilution_cost + haul_off_cost + config.fixed_cost();

    CostBreakdown {
        name: p.name.clone(),
        records: dataset.len(),
        total_dilution,
        total_haul_off,
        total_interval,
        dilution_cost,
        haul_off_cost,
        screen_cost: config.screen_cost(),
        equipment_cost: config.equipment_cost(),
        engineering_cost: p.engineering_cost,
        other_cost: p.other_cost,
        total_cost,
        cost_per_ft: safe_div(total_cost, total_interval),
    }
}

/// Per-record variable cost table: dilution and haul-off cost of each
/// interval and its cost per foot.
pub fn record_cost_table(dataset: &Dataset, config: &CostConfiguration) -> MetricTable {
    let p = config.params();
    let mut table = MetricTable::new(
        [
            columns::WELL_NAME,
            columns::WELL_JOB_ID,
            columns::INT_LENGTH,
            "Dilution_Cost",
            "Haul_Off_Cost",
            "Variable_Cost",
            "Cost_per_ft",
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect(),
    );

    for row in dataset.rows() {
        let interval = row.number_or_zero(columns::INT_LENGTH);
        let dilution = p.dilution_rate * row.number_or_zero(columns::TOTAL_DIL);
        let haul = p.haul_rate * row.number_or_zero(columns::HAUL_OFF);
        let variable = dilution + haul;
        table.push_row(vec![
            row.text(columns::WELL_NAME).unwrap_or_default().to_string(),
            row.text(columns::WELL_JOB_ID).unwrap_or_default().to_string(),
            row.text(columns::INT_LENGTH).unwrap_or_default().to_string(),
            format!("{dilution:.2}"),
            format!("{haul:.2}"),
            format!("{variable:.2}"),
            format!("{:.2}", safe_div(variable, interval)),
        ]);
    }

    table
}

// ============================================================================
// Two-group comparison
// ============================================================================

/// One side of a comparison: which records, and priced how.
#[derive(Debug, Clone)]
pub struct CostGroup {
    pub criteria: Vec<FilterCriterion>,
    pub config: CostConfiguration,
}

impl CostGroup {
    pub fn new(criteria: Vec<FilterCriterion>, config: CostConfiguration) -> Self {
        Self { criteria, config }
    }

    /// Records whose shaker equals the configuration's shaker label. The
    /// display name plays no part in the selection.
    pub fn by_shaker(config: CostConfiguration) -> Self {
        let criterion = FilterCriterion::equals(columns::FLOWLINE_SHAKERS, config.shaker_label());
        Self::new(vec![criterion], config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostComparison {
    pub group_a: CostBreakdown,
    pub group_b: CostBreakdown,
    /// group B − group A
    pub total_cost_delta: SignedDelta,
    /// group B − group A
    pub cost_per_ft_delta: SignedDelta,
}

/// Filter `dataset` independently for each group and compare the breakdowns.
pub fn compare(dataset: &Dataset, a: &CostGroup, b: &CostGroup) -> CostComparison {
    let group_a = estimate(&filter::apply(dataset, &a.criteria), &a.config);
    let group_b = estimate(&filter::apply(dataset, &b.criteria), &b.config);

    tracing::debug!(
        a = %group_a.name,
        b = %group_b.name,
        a_records = group_a.records,
        b_records = group_b.records,
        "Cost comparison computed"
    );
    if !dataset.is_empty() {
        for group in [&group_a, &group_b] {
            if group.records == 0 {
                tracing::warn!(group = %group.name, "Cost group matched no records");
            }
        }
    }

    CostComparison {
        total_cost_delta: SignedDelta::between(group_a.total_cost, group_b.total_cost),
        cost_per_ft_delta: SignedDelta::between(group_a.cost_per_ft, group_b.cost_per_ft),
        group_a,
        group_b,
    }
}
