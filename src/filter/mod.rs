//! Filter Engine
//!
//! Narrows a [`Dataset`] by a list of [`FilterCriterion`] values combined
//! with logical AND. The result keeps the original record order and never
//! duplicates a record; the source dataset is left untouched.
//!
//! A criterion that names a column the dataset does not expose is skipped.
//! Values that fail to parse as numbers or dates count as missing and never
//! satisfy a range or year criterion.

mod bins;
mod spec;

pub use bins::{Bin, BinSet};
pub use spec::{resolve, CriterionSpec};

use crate::dataset::{parse_date, parse_number, Dataset, Record, Schema};
use chrono::Datelike;
use std::collections::HashSet;
use thiserror::Error;

/// Menu entry that disables an equality filter.
pub const ALL: &str = "All";

/// Caller errors when building criteria from descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown bin set '{0}'")]
    UnknownBinSet(String),

    #[error("Unknown bin '{label}' in bin set '{set}'")]
    UnknownBin { set: String, label: String },

    #[error("Invalid year range: start {start} is after end {end}")]
    InvalidYearRange { start: i32, end: i32 },
}

// ============================================================================
// Criteria
// ============================================================================

/// Selected value of an equality filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Value(String),
}

impl Selection {
    /// Interpret a menu choice; `"All"` disables the filter.
    pub fn from_choice(choice: &str) -> Self {
        if choice == ALL {
            Self::All
        } else {
            Self::Value(choice.to_string())
        }
    }
}

/// One predicate narrowing a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCriterion {
    /// Attribute text equals the selected value.
    Equals { column: String, selection: Selection },
    /// Attribute text is one of the selected values; an empty set keeps all.
    OneOf { column: String, values: Vec<String> },
    /// Numeric attribute falls in `[low, high)` of the bin.
    InRange { column: String, bin: Bin },
    /// Year of the date attribute is within `[start, end]` inclusive.
    YearRange { column: String, start: i32, end: i32 },
    /// Any attribute contains the needle, case-insensitive.
    Search { needle: String },
}

impl FilterCriterion {
    pub fn equals(column: &str, choice: &str) -> Self {
        Self::Equals {
            column: column.to_string(),
            selection: Selection::from_choice(choice),
        }
    }

    pub fn one_of<S: AsRef<str>>(column: &str, values: &[S]) -> Self {
        Self::OneOf {
            column: column.to_string(),
            values: values.iter().map(|v| v.as_ref().to_string()).collect(),
        }
    }

    pub fn in_range(column: &str, bin: Bin) -> Self {
        Self::InRange {
            column: column.to_string(),
            bin,
        }
    }

    pub fn year_range(column: &str, start: i32, end: i32) -> Self {
        Self::YearRange {
            column: column.to_string(),
            start,
            end,
        }
    }

    pub fn search(needle: &str) -> Self {
        Self::Search {
            needle: needle.to_string(),
        }
    }

    /// Column this criterion reads, if it targets a single one.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Equals { column, .. }
            | Self::OneOf { column, .. }
            | Self::InRange { column, .. }
            | Self::YearRange { column, .. } => Some(column),
            Self::Search { .. } => None,
        }
    }

    /// True when the criterion keeps every record regardless of the data.
    pub fn is_identity(&self) -> bool {
        match self {
            Self::Equals { selection, .. } => *selection == Selection::All,
            Self::OneOf { values, .. } => values.is_empty(),
            Self::Search { needle } => needle.is_empty(),
            Self::InRange { .. } | Self::YearRange { .. } => false,
        }
    }
}

// ============================================================================
// Compiled predicates
// ============================================================================

/// A criterion resolved against a schema (column index looked up once).
enum Predicate<'c> {
    Equals(usize, &'c str),
    OneOf(usize, HashSet<&'c str>),
    InRange(usize, &'c Bin),
    YearRange(usize, i32, i32),
    Search(String),
}

impl<'c> Predicate<'c> {
    fn compile(schema: &Schema, criterion: &'c FilterCriterion) -> Option<Self> {
        if criterion.is_identity() {
            return None;
        }

        let idx = match criterion.column() {
            Some(column) => match schema.index_of(column) {
                Some(idx) => Some(idx),
                None => {
                    tracing::debug!(column, "Filter column absent from dataset, criterion skipped");
                    return None;
                }
            },
            None => None,
        };

        Some(match (criterion, idx) {
            (FilterCriterion::Equals { selection: Selection::Value(v), .. }, Some(i)) => {
                Self::Equals(i, v.as_str())
            }
            (FilterCriterion::OneOf { values, .. }, Some(i)) => {
                Self::OneOf(i, values.iter().map(String::as_str).collect())
            }
            (FilterCriterion::InRange { bin, .. }, Some(i)) => Self::InRange(i, bin),
            (FilterCriterion::YearRange { start, end, .. }, Some(i)) => {
                Self::YearRange(i, *start, *end)
            }
            (FilterCriterion::Search { needle }, _) => Self::Search(needle.to_lowercase()),
            _ => return None,
        })
    }

    fn matches(&self, record: &Record) -> bool {
        match self {
            Self::Equals(i, value) => record.cell(*i) == Some(*value),
            Self::OneOf(i, values) => record.cell(*i).is_some_and(|c| values.contains(c)),
            Self::InRange(i, bin) => record
                .cell(*i)
                .and_then(parse_number)
                .is_some_and(|v| bin.contains(v)),
            Self::YearRange(i, start, end) => record
                .cell(*i)
                .and_then(parse_date)
                .is_some_and(|d| (*start..=*end).contains(&d.year())),
            Self::Search(needle) => record
                .cells()
                .flatten()
                .any(|c| c.to_lowercase().contains(needle.as_str())),
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Apply `criteria` (logical AND) to `dataset`.
pub fn apply(dataset: &Dataset, criteria: &[FilterCriterion]) -> Dataset {
    let predicates: Vec<Predicate<'_>> = criteria
        .iter()
        .filter_map(|c| Predicate::compile(dataset.schema(), c))
        .collect();

    if predicates.is_empty() {
        return dataset.clone();
    }

    let filtered = dataset.retain(|record| predicates.iter().all(|p| p.matches(record)));
    tracing::debug!(
        criteria = criteria.len(),
        active = predicates.len(),
        before = dataset.len(),
        after = filtered.len(),
        "Filters applied"
    );
    filtered
}

/// A reusable, declaratively configured filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterEngine {
    criteria: Vec<FilterCriterion>,
}

impl FilterEngine {
    pub fn new(criteria: Vec<FilterCriterion>) -> Self {
        Self { criteria }
    }

    pub fn with(mut self, criterion: FilterCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn criteria(&self) -> &[FilterCriterion] {
        &self.criteria
    }

    pub fn apply(&self, dataset: &Dataset) -> Dataset {
        apply(dataset, &self.criteria)
    }
}

/// Equality-filter menu: `"All"` followed by the sorted distinct values.
/// An absent column offers only `"All"`.
pub fn select_options(dataset: &Dataset, column: &str) -> Vec<String> {
    std::iter::once(ALL.to_string())
        .chain(dataset.distinct_values(column))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn wells() -> Dataset {
        Dataset::from_rows(
            &["Well_Name", "Operator", "flowline_Shakers", "MD Depth", "TD_Date"],
            &[
                vec!["Alpha", "Apex", "Derrick", "4500", "2020-01-01"],
                vec!["Bravo", "Borealis", "Non-Derrick", "12000", "2021-06-01"],
                vec!["Charlie", "Apex", "Derrick", "bad", ""],
                vec!["Delta", "Cobalt", "", "26000", "2022-11-30"],
            ],
        )
    }

    fn names(ds: &Dataset) -> Vec<&str> {
        ds.rows().filter_map(|r| r.text("Well_Name")).collect()
    }

    #[test]
    fn test_equals_filter() {
        let ds = wells();
        let out = apply(&ds, &[FilterCriterion::equals("Operator", "Apex")]);
        assert_eq!(names(&out), vec!["Alpha", "Charlie"]);
    }

    #[test]
    fn test_all_selection_is_identity() {
        let ds = wells();
        let out = apply(&ds, &[FilterCriterion::equals("Operator", "All")]);
        assert_eq!(out, ds);
    }

    #[test]
    fn test_one_of_filter() {
        let ds = wells();
        let out = apply(&ds, &[FilterCriterion::one_of("Well_Name", &["Delta", "Alpha"])]);
        assert_eq!(names(&out), vec!["Alpha", "Delta"]);

        let empty: [&str; 0] = [];
        assert_eq!(apply(&ds, &[FilterCriterion::one_of("Well_Name", &empty)]), ds);
    }

    #[test]
    fn test_range_filter_excludes_malformed() {
        let ds = wells();
        let bin = BinSet::depth().find("<5000 ft").cloned().unwrap();
        let out = apply(&ds, &[FilterCriterion::in_range("MD Depth", bin)]);
        assert_eq!(names(&out), vec!["Alpha"]);

        let top = BinSet::depth().find("25000 ft and above").cloned().unwrap();
        let out = apply(&ds, &[FilterCriterion::in_range("MD Depth", top)]);
        assert_eq!(names(&out), vec!["Delta"]);
    }

    #[test]
    fn test_year_range_drops_missing_dates() {
        let ds = wells();
        let out = apply(&ds, &[FilterCriterion::year_range("TD_Date", 2021, 2022)]);
        assert_eq!(names(&out), vec!["Bravo", "Delta"]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let ds = wells();
        let out = apply(&ds, &[FilterCriterion::search("DERRICK")]);
        assert_eq!(names(&out), vec!["Alpha", "Bravo", "Charlie"]);

        let out = apply(&ds, &[FilterCriterion::search("12000")]);
        assert_eq!(names(&out), vec!["Bravo"]);
    }

    #[test]
    fn test_search_treats_needle_literally() {
        let ds = wells();
        assert!(apply(&ds, &[FilterCriterion::search(".*")]).is_empty());
    }

    #[test]
    fn test_missing_column_is_skipped() {
        let ds = wells();
        let out = apply(
            &ds,
            &[
                FilterCriterion::equals("Contractor", "Nabors"),
                FilterCriterion::equals("Operator", "Apex"),
            ],
        );
        assert_eq!(names(&out), vec!["Alpha", "Charlie"]);
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let ds = wells();
        let engine = FilterEngine::default()
            .with(FilterCriterion::search("derrick"))
            .with(FilterCriterion::equals("Operator", "Apex"))
            .with(FilterCriterion::year_range("TD_Date", 2020, 2026));
        assert_eq!(names(&engine.apply(&ds)), vec!["Alpha"]);
    }

    #[test]
    fn test_equals_uses_source_text() {
        let ds = Dataset::from_rows(&["Hole_Size"], &[vec!["8.5"], vec!["8.50"], vec!["12.25"]]);
        let out = apply(&ds, &[FilterCriterion::equals("Hole_Size", "8.5")]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_select_options() {
        let ds = wells();
        assert_eq!(
            select_options(&ds, "Operator"),
            vec!["All", "Apex", "Borealis", "Cobalt"]
        );
        assert_eq!(select_options(&ds, "Contractor"), vec!["All"]);
    }

    #[test]
    fn test_source_is_not_mutated() {
        let ds = wells();
        let before = ds.clone();
        let _ = apply(&ds, &[FilterCriterion::search("zzz")]);
        assert_eq!(ds, before);
    }
}
