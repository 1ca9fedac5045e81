//! Advanced solids-control KPIs.
//!
//! Exports from newer rigs carry precomputed per-well indices (`STE`, `CVR`,
//! `SLI`, `FRC%`, `DII`, `FLI`, `CDR`, `MRE%`, `DSL`). When a column is
//! present the KPI is its mean; percentage columns are stored as fractions
//! and scaled ×100. When it is absent, `CVR`, `FLI` and `MRE%` are derived
//! from the raw volume columns and the rest report zero.

use serde::Serialize;
use statrs::statistics::{Data, Max, Min, OrderStatistics};

use super::{safe_div, DerivedMetric};
use crate::dataset::{columns, Dataset, MetricTable};

/// Shaker throughput efficiency
pub const STE: &str = "STE";
/// Cuttings volume ratio
pub const CVR: &str = "CVR";
/// Solids loading index
pub const SLI: &str = "SLI";
/// Fluid recovery capacity (fraction in source data)
pub const FRC_PCT: &str = "FRC%";
/// Dilution intensity index
pub const DII: &str = "DII";
/// Fluid loading index
pub const FLI: &str = "FLI";
/// Chemical dosing ratio
pub const CDR: &str = "CDR";
/// Mud retention efficiency (fraction in source data)
pub const MRE_PCT: &str = "MRE%";
/// Drilled solids load
pub const DSL: &str = "DSL";

/// KPI board order.
pub const ADVANCED_METRICS: &[&str] = &[STE, CVR, SLI, FRC_PCT, DII, FLI, CDR, MRE_PCT, DSL];

fn is_percent(key: &str) -> bool {
    key.ends_with('%')
}

// ============================================================================
// Derived formulas
// ============================================================================

/// Σ Haul_OFF ÷ Σ IntLength
pub fn cuttings_volume_ratio(dataset: &Dataset) -> f64 {
    safe_div(
        dataset.column_sum(columns::HAUL_OFF),
        dataset.column_sum(columns::INT_LENGTH),
    )
}

/// Σ (Base_Oil + Water + Chemicals) ÷ Σ IntLength
pub fn fluid_loading_index(dataset: &Dataset) -> f64 {
    let fluids: f64 = dataset
        .rows()
        .map(|r| {
            r.number_or_zero(columns::BASE_OIL)
                + r.number_or_zero(columns::WATER)
                + r.number_or_zero(columns::CHEMICALS)
        })
        .sum();
    safe_div(fluids, dataset.column_sum(columns::INT_LENGTH))
}

/// Mean discard ratio expressed as a percentage.
pub fn discard_percentage(dataset: &Dataset) -> f64 {
    dataset.column_mean(columns::DISCARD_RATIO) * 100.0
}

/// 100 − efficiency, for metrics reported as the complement of another.
pub fn percent_complement(efficiency_pct: f64) -> f64 {
    100.0 - efficiency_pct
}

/// Mud retention efficiency derived from discards: 100 − discard %.
pub fn mud_retention_efficiency(dataset: &Dataset) -> f64 {
    percent_complement(discard_percentage(dataset))
}

// ============================================================================
// KPI board
// ============================================================================

fn advanced_value(dataset: &Dataset, key: &str) -> f64 {
    if dataset.has_column(key) {
        let mean = dataset.column_mean(key);
        return if is_percent(key) { mean * 100.0 } else { mean };
    }
    match key {
        CVR => cuttings_volume_ratio(dataset),
        FLI => fluid_loading_index(dataset),
        MRE_PCT if dataset.has_column(columns::DISCARD_RATIO) => mud_retention_efficiency(dataset),
        _ => 0.0,
    }
}

/// The nine-card KPI board of the advanced analysis page.
pub fn advanced_metrics(dataset: &Dataset) -> Vec<DerivedMetric> {
    ADVANCED_METRICS
        .iter()
        .map(|&key| {
            let metric = DerivedMetric::new(key, key, advanced_value(dataset, key));
            if is_percent(key) {
                metric.with_unit("%")
            } else {
                metric
            }
        })
        .collect()
}

/// Per-record derived indices (CVR, FLI, MRE%) for export.
pub fn record_metrics(dataset: &Dataset) -> MetricTable {
    let mut table = MetricTable::new(
        [columns::WELL_NAME, columns::WELL_JOB_ID, CVR, FLI, MRE_PCT]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
    );

    for row in dataset.rows() {
        let interval = row.number_or_zero(columns::INT_LENGTH);
        let cvr = safe_div(row.number_or_zero(columns::HAUL_OFF), interval);
        let fli = safe_div(
            row.number_or_zero(columns::BASE_OIL)
                + row.number_or_zero(columns::WATER)
                + row.number_or_zero(columns::CHEMICALS),
            interval,
        );
        let mre = row
            .number(columns::DISCARD_RATIO)
            .map(|d| format!("{:.2}", percent_complement(d * 100.0)))
            .unwrap_or_default();

        table.push_row(vec![
            row.text(columns::WELL_NAME).unwrap_or_default().to_string(),
            row.text(columns::WELL_JOB_ID).unwrap_or_default().to_string(),
            format!("{cvr:.4}"),
            format!("{fli:.4}"),
            mre,
        ]);
    }

    table
}

// ============================================================================
// Grouped distributions
// ============================================================================

/// Five-number summary of a metric within one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDistribution {
    pub group: String,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub lower_quartile: f64,
    pub median: f64,
    pub upper_quartile: f64,
    pub max: f64,
}

/// Distribution of `metric` per distinct value of `group_by`, groups sorted
/// ascending. Records missing either value are left out; an absent column
/// yields no groups.
pub fn distribution(dataset: &Dataset, metric: &str, group_by: &str) -> Vec<GroupDistribution> {
    if !dataset.has_column(metric) || !dataset.has_column(group_by) {
        return Vec::new();
    }

    let mut groups: std::collections::BTreeMap<&str, Vec<f64>> = std::collections::BTreeMap::new();
    for row in dataset.rows() {
        if let (Some(group), Some(value)) = (row.text(group_by), row.number(metric)) {
            groups.entry(group).or_default().push(value);
        }
    }

    groups
        .into_iter()
        .map(|(group, values)| {
            let count = values.len();
            let mean = values.iter().sum::<f64>() / count as f64;
            let mut data = Data::new(values);
            GroupDistribution {
                group: group.to_string(),
                count,
                mean,
                min: data.min(),
                lower_quartile: data.lower_quartile(),
                median: data.median(),
                upper_quartile: data.upper_quartile(),
                max: data.max(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuttings_volume_ratio_scenario() {
        let ds = Dataset::from_rows(
            &["IntLength", "Haul_OFF"],
            &[vec!["100", "10"], vec!["200", "20"], vec!["0", "5"]],
        );
        let cvr = cuttings_volume_ratio(&ds);
        assert!((cvr - 35.0 / 300.0).abs() < 1e-12);
        assert!((cvr - 0.1167).abs() < 1e-4);
    }

    #[test]
    fn test_fluid_loading_index() {
        let ds = Dataset::from_rows(
            &["IntLength", "Base_Oil", "Water", "Chemicals"],
            &[vec!["1000", "300", "150", "50"], vec!["1000", "200", "", "100"]],
        );
        assert!((fluid_loading_index(&ds) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_ratios_on_empty_dataset_are_zero() {
        let ds = Dataset::from_rows::<&str>(&["IntLength", "Haul_OFF"], &[]);
        assert_eq!(cuttings_volume_ratio(&ds), 0.0);
        assert_eq!(fluid_loading_index(&ds), 0.0);
    }

    #[test]
    fn test_precomputed_columns_take_precedence() {
        let ds = Dataset::from_rows(
            &["CVR", "FRC%", "MRE%", "IntLength", "Haul_OFF"],
            &[vec!["0.5", "0.8", "0.9", "100", "10"], vec!["0.7", "0.6", "0.7", "100", "10"]],
        );
        let kpis = advanced_metrics(&ds);
        let get = |k: &str| kpis.iter().find(|m| m.key == k).unwrap().value;
        assert!((get(CVR) - 0.6).abs() < 1e-12);
        assert!((get(FRC_PCT) - 70.0).abs() < 1e-9);
        assert!((get(MRE_PCT) - 80.0).abs() < 1e-9);
        assert_eq!(get(STE), 0.0);
    }

    #[test]
    fn test_derived_fallbacks() {
        let ds = Dataset::from_rows(
            &["IntLength", "Haul_OFF", "Discard Ratio"],
            &[vec!["100", "10", "0.10"], vec!["300", "30", "0.20"]],
        );
        let kpis = advanced_metrics(&ds);
        let get = |k: &str| kpis.iter().find(|m| m.key == k).unwrap().clone();
        assert!((get(CVR).value - 0.1).abs() < 1e-12);
        let mre = get(MRE_PCT);
        assert!((mre.value - 85.0).abs() < 1e-9);
        assert_eq!(mre.unit, "%");
        // Complement relation is exact
        assert_eq!(mre.value + discard_percentage(&ds), 100.0);
    }

    #[test]
    fn test_mre_zero_without_any_source_column() {
        let ds = Dataset::from_rows(&["IntLength"], &[vec!["100"]]);
        let kpis = advanced_metrics(&ds);
        assert_eq!(kpis.iter().find(|m| m.key == MRE_PCT).unwrap().value, 0.0);
    }

    #[test]
    fn test_record_metrics_table() {
        let ds = Dataset::from_rows(
            &["Well_Name", "IntLength", "Haul_OFF", "Discard Ratio"],
            &[vec!["Alpha", "200", "50", "0.25"], vec!["Bravo", "0", "5", ""]],
        );
        let table = record_metrics(&ds);
        assert_eq!(table.columns[2], "CVR");
        assert_eq!(table.rows[0][2], "0.2500");
        assert_eq!(table.rows[0][4], "75.00");
        assert_eq!(table.rows[1][2], "0.0000");
        assert_eq!(table.rows[1][4], "");
    }

    #[test]
    fn test_distribution_by_shaker() {
        let ds = Dataset::from_rows(
            &["flowline_Shakers", "STE"],
            &[
                vec!["Derrick", "1"],
                vec!["Derrick", "3"],
                vec!["Derrick", "2"],
                vec!["Brandt", "5"],
                vec!["", "9"],
            ],
        );
        let dist = distribution(&ds, "STE", "flowline_Shakers");
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].group, "Brandt");
        assert_eq!(dist[1].count, 3);
        assert!((dist[1].mean - 2.0).abs() < 1e-12);
        assert_eq!(dist[1].min, 1.0);
        assert_eq!(dist[1].max, 3.0);
        assert!((dist[1].median - 2.0).abs() < 1e-12);
        assert!(distribution(&ds, "DSL", "flowline_Shakers").is_empty());
    }
}
