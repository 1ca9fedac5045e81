//! Sales analysis aggregates: completion counts by period, group-by
//! tables, and time-ordered metric trends.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::dataset::{columns, Dataset};

/// Wells completed in the reference calendar month, in the reference year,
/// and overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodCounts {
    /// Same calendar month in any year
    pub month: usize,
    pub year: usize,
    pub total: usize,
}

/// Count completions relative to `reference`.
///
/// The month count matches on the calendar month alone, so October 2025 and
/// October 2026 both count for a reference in October 2026. The year count
/// matches on the year. Records without a parseable `TD_Date` only count
/// toward the total.
pub fn period_counts(dataset: &Dataset, reference: NaiveDate) -> PeriodCounts {
    let mut counts = PeriodCounts {
        month: 0,
        year: 0,
        total: dataset.len(),
    };
    for date in dataset.rows().filter_map(|r| r.date(columns::TD_DATE)) {
        if date.month() == reference.month() {
            counts.month += 1;
        }
        if date.year() == reference.year() {
            counts.year += 1;
        }
    }
    counts
}

/// One row of a group-by count table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub group: String,
    pub count: usize,
}

/// Records per distinct value of `column`, largest group first (ties by
/// name). Missing values are not counted.
pub fn group_counts(dataset: &Dataset, column: &str) -> Vec<GroupCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in dataset.rows().filter_map(|r| r.text(column)) {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut rows: Vec<GroupCount> = counts
        .into_iter()
        .map(|(group, count)| GroupCount {
            group: group.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.group.cmp(&b.group)));
    rows
}

/// Shaker usage for the distribution chart.
pub fn shaker_distribution(dataset: &Dataset) -> Vec<GroupCount> {
    group_counts(dataset, columns::FLOWLINE_SHAKERS)
}

/// Well count per basin and geologic province.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionalCount {
    pub basin: String,
    pub province: String,
    pub wells: usize,
}

/// Completions grouped by `DI Basin` × `AAPG Geologic Province`, sorted by
/// basin then province. Records missing either key are dropped.
pub fn regional_summary(dataset: &Dataset) -> Vec<RegionalCount> {
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for row in dataset.rows() {
        if let (Some(basin), Some(province)) =
            (row.text(columns::DI_BASIN), row.text(columns::AAPG_PROVINCE))
        {
            *counts.entry((basin, province)).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|((basin, province), wells)| RegionalCount {
            basin: basin.to_string(),
            province: province.to_string(),
            wells,
        })
        .collect()
}

/// A dated observation of several metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub well_name: Option<String>,
    /// Metric name → value; `None` when the record lacks that value.
    pub values: BTreeMap<String, Option<f64>>,
}

/// Per-record values of `metrics` ordered by completion date. Records
/// without a date are dropped; same-day records keep dataset order.
pub fn metric_trends(dataset: &Dataset, metrics: &[&str]) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = dataset
        .rows()
        .filter_map(|row| {
            let date = row.date(columns::TD_DATE)?;
            Some(TrendPoint {
                date,
                well_name: row.text(columns::WELL_NAME).map(str::to_string),
                values: metrics
                    .iter()
                    .map(|m| ((*m).to_string(), row.number(m)))
                    .collect(),
            })
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// The sales page bundle over a filtered dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSummary {
    pub periods: PeriodCounts,
    pub shakers: Vec<GroupCount>,
    pub regions: Vec<RegionalCount>,
    pub trends: Vec<TrendPoint>,
}

pub fn sales_summary(dataset: &Dataset, reference: NaiveDate) -> SalesSummary {
    SalesSummary {
        periods: period_counts(dataset, reference),
        shakers: shaker_distribution(dataset),
        regions: regional_summary(dataset),
        trends: metric_trends(dataset, columns::TREND_METRICS),
    }
}
