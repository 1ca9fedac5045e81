//! Drilling Operations Dataset
//!
//! An immutable, schema-aware table of drilling-operation records (one row
//! per well interval / job). Loaded once from delimited text and then shared
//! read-only; filtering produces new `Dataset` values that share the source
//! records instead of copying or mutating them.
//!
//! Cells keep their trimmed source text. Typed access coerces on demand:
//!
//! - [`RowView::text`]: the source text, `None` when missing
//! - [`RowView::number`]: finite `f64`, `None` when missing or malformed
//! - [`RowView::date`]: calendar date, `None` when missing or malformed
//!
//! Column presence is a capability of the dataset ([`Dataset::has_column`]);
//! aggregates over an absent column are zero, never an error.

pub mod columns;
pub mod export;
mod loader;

pub use export::{ExportError, MetricTable};
pub use loader::{LoadConfig, LoadSummary};

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while loading a dataset from disk.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Empty file (no header row): {0}")]
    Empty(String),
}

// ============================================================================
// Cell Coercion
// ============================================================================

/// Tokens that mark a missing value in exported spreadsheets.
const MISSING_TOKENS: &[&str] = &["nan", "null", "none", "n/a", "na", "nat", "-"];

/// Normalize a raw cell: trim, and map empty / NaN-like tokens to `None`.
pub fn normalize_cell(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() || MISSING_TOKENS.iter().any(|t| s.eq_ignore_ascii_case(t)) {
        None
    } else {
        Some(s.to_string())
    }
}

/// Parse a numeric cell. Thousands separators are tolerated; NaN and
/// infinities count as missing.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let parsed = s.parse::<f64>().ok().or_else(|| {
        if s.contains(',') {
            s.replace(',', "").parse::<f64>().ok()
        } else {
            None
        }
    })?;
    parsed.is_finite().then_some(parsed)
}

/// Parse a completion date from the formats seen in field exports.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim().trim_matches('"');
    if s.is_empty() {
        return None;
    }

    for fmt in &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y", "%m-%d-%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.date_naive());
    }

    for fmt in &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}

// ============================================================================
// Schema
// ============================================================================

/// Ordered column names with O(1) lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema from header names. Names are trimmed; a repeated name
    /// gets a `.1`, `.2`, … suffix so every column stays addressable.
    pub fn from_header<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut schema = Self::default();
        for name in names {
            let base = name.as_ref().trim().to_string();
            let mut candidate = base.clone();
            let mut n = 1;
            while schema.index.contains_key(&candidate) {
                candidate = format!("{base}.{n}");
                n += 1;
            }
            schema.index.insert(candidate.clone(), schema.columns.len());
            schema.columns.push(candidate);
        }
        schema
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

// ============================================================================
// Record
// ============================================================================

/// One drilling-operation row. Remembers its position in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    position: usize,
    cells: Vec<Option<String>>,
}

impl Record {
    pub fn new(position: usize, cells: Vec<Option<String>>) -> Self {
        Self { position, cells }
    }

    /// Zero-based row index in the source dataset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Raw (trimmed) cell text at a column index.
    pub fn cell(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).and_then(|c| c.as_deref())
    }

    /// All cells in schema order.
    pub fn cells(&self) -> impl Iterator<Item = Option<&str>> {
        self.cells.iter().map(|c| c.as_deref())
    }
}

/// Borrowed view of a record together with its schema.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    schema: &'a Schema,
    record: &'a Record,
}

impl<'a> RowView<'a> {
    pub fn position(&self) -> usize {
        self.record.position
    }

    pub fn record(&self) -> &'a Record {
        self.record
    }

    pub fn text(&self, column: &str) -> Option<&'a str> {
        self.schema
            .index_of(column)
            .and_then(|idx| self.record.cell(idx))
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.text(column).and_then(parse_number)
    }

    /// Numeric value with missing treated as zero.
    pub fn number_or_zero(&self, column: &str) -> f64 {
        self.number(column).unwrap_or(0.0)
    }

    pub fn date(&self, column: &str) -> Option<NaiveDate> {
        self.text(column).and_then(parse_date)
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// Immutable ordered collection of records sharing one schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    schema: Arc<Schema>,
    records: Vec<Arc<Record>>,
}

impl Dataset {
    /// Build a dataset from normalized rows. Short rows are padded with
    /// missing cells, long rows truncated to the schema width.
    pub fn new(schema: Schema, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = schema.len();
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(position, mut cells)| {
                cells.resize(width, None);
                Arc::new(Record::new(position, cells))
            })
            .collect();
        Self {
            schema: Arc::new(schema),
            records,
        }
    }

    /// Build a dataset from raw text rows, applying cell normalization.
    pub fn from_rows<S: AsRef<str>>(header: &[&str], rows: &[Vec<S>]) -> Self {
        let schema = Schema::from_header(header.iter());
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| normalize_cell(c.as_ref())).collect())
            .collect();
        Self::new(schema, rows)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Capability check: does this dataset expose `column`?
    pub fn has_column(&self, column: &str) -> bool {
        self.schema.has_column(column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.records.iter().map(move |r| RowView {
            schema: &self.schema,
            record: r,
        })
    }

    /// New dataset holding the records for which `keep` returns true, in
    /// their original order. Records are shared, not copied.
    pub fn retain<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&Record) -> bool,
    {
        Self {
            schema: Arc::clone(&self.schema),
            records: self
                .records
                .iter()
                .filter(|r| keep(r))
                .cloned()
                .collect(),
        }
    }

    /// Non-missing numeric values of a column (empty if the column is absent).
    pub fn column_values(&self, column: &str) -> Vec<f64> {
        match self.schema.index_of(column) {
            Some(idx) => self
                .records
                .iter()
                .filter_map(|r| r.cell(idx).and_then(parse_number))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Sum of a numeric column; missing values contribute nothing.
    pub fn column_sum(&self, column: &str) -> f64 {
        self.column_values(column).iter().sum()
    }

    /// Mean of a numeric column over non-missing values; 0 when there are none.
    pub fn column_mean(&self, column: &str) -> f64 {
        let values = self.column_values(column);
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }

    /// Distinct non-missing values of a column, sorted ascending. Sorting is
    /// numeric when every value parses as a number, lexicographic otherwise.
    pub fn distinct_values(&self, column: &str) -> Vec<String> {
        let Some(idx) = self.schema.index_of(column) else {
            return Vec::new();
        };
        let distinct: BTreeSet<&str> = self.records.iter().filter_map(|r| r.cell(idx)).collect();
        let mut values: Vec<String> = distinct.into_iter().map(str::to_string).collect();

        if values.iter().all(|v| parse_number(v).is_some()) {
            values.sort_by(|a, b| {
                let (x, y) = (parse_number(a).unwrap_or(0.0), parse_number(b).unwrap_or(0.0));
                x.partial_cmp(&y).unwrap_or(Ordering::Equal).then_with(|| a.cmp(b))
            });
        }
        values
    }

    /// Columns whose non-missing values all parse as numbers (and that have
    /// at least one value), in schema order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.schema
            .columns()
            .iter()
            .enumerate()
            .filter(|(idx, _)| {
                let mut seen = false;
                let all_numeric = self.records.iter().filter_map(|r| r.cell(*idx)).all(|c| {
                    seen = true;
                    parse_number(c).is_some()
                });
                seen && all_numeric
            })
            .map(|(_, name)| name.as_str())
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
