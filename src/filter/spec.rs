//! Declarative filter descriptors.
//!
//! HTTP requests and the CLI describe the sidebar state as a list of
//! [`CriterionSpec`] values. Range buckets are referenced by bin-set name
//! and bin label and resolved against the configured [`BinSet`]s.

use serde::{Deserialize, Serialize};

use super::{Bin, BinSet, FilterCriterion, FilterError};
use crate::dataset::columns;

fn default_date_column() -> String {
    columns::TD_DATE.to_string()
}

/// Serializable description of one filter widget's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CriterionSpec {
    /// Select-box: `"All"` or one value.
    Equals { column: String, value: String },
    /// Multi-select: empty list keeps everything.
    OneOf { column: String, values: Vec<String> },
    /// Named bucket from a configured bin set; `"All"` keeps everything.
    Bucket { bins: String, bin: String },
    /// Explicit numeric range `[low, high)`.
    Range {
        column: String,
        low: f64,
        #[serde(default)]
        high: Option<f64>,
    },
    /// Completion-year window, inclusive.
    YearRange {
        #[serde(default = "default_date_column")]
        column: String,
        start: i32,
        end: i32,
    },
    /// Free-text search across all attributes.
    Search { text: String },
}

/// Resolve descriptors into concrete criteria.
///
/// Identity selections (`"All"` buckets) are dropped. Unknown bin sets or
/// labels and inverted year windows are caller errors.
pub fn resolve(
    specs: &[CriterionSpec],
    bin_sets: &[BinSet],
) -> Result<Vec<FilterCriterion>, FilterError> {
    let mut criteria = Vec::with_capacity(specs.len());

    for spec in specs {
        let criterion = match spec {
            CriterionSpec::Equals { column, value } => Some(FilterCriterion::equals(column, value)),
            CriterionSpec::OneOf { column, values } => {
                Some(FilterCriterion::one_of(column, values))
            }
            CriterionSpec::Bucket { bins, bin } => bin_sets
                .iter()
                .find(|s| &s.name == bins)
                .ok_or_else(|| FilterError::UnknownBinSet(bins.clone()))?
                .criterion(bin)?,
            CriterionSpec::Range { column, low, high } => {
                let label = match high {
                    Some(h) => format!("{low}–{h}"),
                    None => format!("{low}+"),
                };
                Some(FilterCriterion::in_range(column, Bin::new(&label, *low, *high)))
            }
            CriterionSpec::YearRange { column, start, end } => {
                if start > end {
                    return Err(FilterError::InvalidYearRange {
                        start: *start,
                        end: *end,
                    });
                }
                Some(FilterCriterion::year_range(column, *start, *end))
            }
            CriterionSpec::Search { text } => Some(FilterCriterion::search(text.trim())),
        };
        criteria.extend(criterion);
    }

    Ok(criteria)
}
