//! Multi-well comparison aggregates: KPI row, per-well parameter table,
//! and well locations.

use serde::Serialize;

use super::DerivedMetric;
use crate::dataset::{columns, Dataset};

/// Mean-based KPI row shown above the multi-well comparison chart.
pub fn well_summary(dataset: &Dataset) -> Vec<DerivedMetric> {
    let kpi = |column: &str, label: &str, precision: usize| {
        DerivedMetric::new(column, label, dataset.column_mean(column)).with_precision(precision)
    };

    vec![
        kpi(columns::INT_LENGTH, "IntLength", 1),
        kpi(columns::ROP, "ROP", 1),
        kpi(columns::DILUTION_RATIO, "Dilution Ratio", 2),
        kpi(columns::DISCARD_RATIO, "Discard Ratio", 2),
        kpi(columns::HAUL_OFF, "Haul OFF", 1),
        kpi(columns::AMW, "AMW", 2),
    ]
}

/// One bar of the per-well comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellValue {
    pub well_job_id: Option<String>,
    pub operator: Option<String>,
    pub value: f64,
}

/// Per-record values of `parameter`, in dataset order. Records with a
/// missing value are omitted; an absent column yields an empty table.
pub fn compare_parameter(dataset: &Dataset, parameter: &str) -> Vec<WellValue> {
    if !dataset.has_column(parameter) {
        return Vec::new();
    }
    dataset
        .rows()
        .filter_map(|row| {
            row.number(parameter).map(|value| WellValue {
                well_job_id: row.text(columns::WELL_JOB_ID).map(str::to_string),
                operator: row.text(columns::OPERATOR).map(str::to_string),
                value,
            })
        })
        .collect()
}

/// Parameters offered by the comparison selector: the configured list
/// restricted to columns this dataset exposes.
pub fn available_parameters(dataset: &Dataset) -> Vec<&'static str> {
    columns::COMPARISON_PARAMETERS
        .iter()
        .copied()
        .filter(|c| dataset.has_column(c))
        .collect()
}

/// A mappable well.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellLocation {
    pub well_name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Wells with both coordinates present and numeric.
pub fn well_locations(dataset: &Dataset) -> Vec<WellLocation> {
    dataset
        .rows()
        .filter_map(|row| {
            let latitude = row.number(columns::LATITUDE)?;
            let longitude = row.number(columns::LONGITUDE)?;
            Some(WellLocation {
                well_name: row.text(columns::WELL_NAME).map(str::to_string),
                latitude,
                longitude,
            })
        })
        .collect()
}
