//! Delimited-text loader for drilling operations exports.
//!
//! Reads the header row, builds a [`Schema`], and normalizes every cell
//! (missing-value tokens become `None`). Ragged rows are tolerated: short rows
//! are padded, long rows truncated, and both are counted in the
//! [`LoadSummary`] rather than failing the load.
//!
//! ```ignore
//! use prodigy_iq::dataset::{Dataset, LoadConfig};
//!
//! let (dataset, summary) = Dataset::load("Refine Sample.csv", &LoadConfig::default())?;
//! println!("{}", summary.columns_found);
//! ```

use super::{columns, normalize_cell, Dataset, DatasetError, Schema};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns the dashboard pages read most often. Their absence is reported
/// at load time but never fails the load.
const CORE_COLUMNS: &[&str] = &[
    columns::WELL_NAME,
    columns::OPERATOR,
    columns::CONTRACTOR,
    columns::FLOWLINE_SHAKERS,
    columns::TD_DATE,
    columns::INT_LENGTH,
    columns::HAUL_OFF,
    columns::TOTAL_DIL,
    columns::DRILLING_HOURS,
    columns::AMW,
    columns::MD_DEPTH,
];

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for loading behaviour
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Field delimiter byte
    pub delimiter: u8,
    /// Skip rows where every cell is missing
    pub skip_blank_rows: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            skip_blank_rows: true,
        }
    }
}

/// Metadata about a loaded dataset
#[derive(Debug, Clone)]
pub struct LoadSummary {
    /// Source description (file path or "<reader>")
    pub source: String,
    /// Number of records loaded
    pub record_count: usize,
    /// Number of columns in the header
    pub column_count: usize,
    /// Rows skipped because every cell was missing
    pub blank_rows: usize,
    /// Rows whose field count differed from the header
    pub ragged_rows: usize,
    /// Source line numbers of the first ragged rows
    pub ragged_lines: Vec<u64>,
    /// Source line numbers of rows the reader could not decode
    pub unreadable_lines: Vec<u64>,
    /// Core columns absent from the header
    pub missing_core_columns: Vec<&'static str>,
    /// Human-readable report of core column coverage
    pub columns_found: String,
}

// ============================================================================
// Loading
// ============================================================================

impl Dataset {
    /// Load a delimited-text file.
    pub fn load(
        path: impl AsRef<Path>,
        config: &LoadConfig,
    ) -> Result<(Self, LoadSummary), DatasetError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let file = File::open(path).map_err(|e| DatasetError::Io {
            path: path_str.clone(),
            source: e,
        })?;

        Self::from_reader(file, &path_str, config)
    }

    /// Load from any reader; `source` names it in logs and errors.
    pub fn from_reader<R: Read>(
        reader: R,
        source: &str,
        config: &LoadConfig,
    ) -> Result<(Self, LoadSummary), DatasetError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(config.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let csv_err = |e: csv::Error| DatasetError::Csv {
            path: source.to_string(),
            source: e,
        };

        let header = rdr.headers().map_err(csv_err)?.clone();
        if header.is_empty() || header.iter().all(|h| h.trim().is_empty()) {
            return Err(DatasetError::Empty(source.to_string()));
        }

        let schema = Schema::from_header(header.iter());
        let width = schema.len();

        let mut rows = Vec::new();
        let mut blank = 0usize;
        let mut ragged = 0usize;
        let mut ragged_lines = Vec::new();
        let mut unreadable_lines = Vec::new();

        for result in rdr.records() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    // Line where the offending record starts; quoted fields may span lines
                    let line = e.position().map(csv::Position::line);
                    tracing::warn!(source, line, error = %e, "Unreadable row skipped");
                    unreadable_lines.extend(line);
                    continue;
                }
            };

            if record.len() != width {
                if ragged_lines.len() < MAX_REPORTED_RAGGED {
                    let line = record.position().map(csv::Position::line);
                    tracing::debug!(
                        source,
                        line,
                        fields = record.len(),
                        expected = width,
                        "Ragged row"
                    );
                    ragged_lines.extend(line);
                }
                ragged += 1;
            }

            let cells: Vec<Option<String>> = record.iter().take(width).map(normalize_cell).collect();

            if config.skip_blank_rows && cells.iter().all(Option::is_none) {
                blank += 1;
                continue;
            }
            rows.push(cells);
        }

        let dataset = Self::new(schema, rows);
        let mut summary = summarize(&dataset, source, blank, ragged);
        summary.ragged_lines = ragged_lines;
        summary.unreadable_lines = unreadable_lines;

        tracing::info!(
            source,
            records = summary.record_count,
            columns = summary.column_count,
            blank = summary.blank_rows,
            ragged = summary.ragged_rows,
            "Dataset loaded"
        );
        tracing::info!(source, "{}", summary.columns_found);

        Ok((dataset, summary))
    }
}

const MAX_REPORTED_RAGGED: usize = 10;

/// Report which core columns were found
fn summarize(dataset: &Dataset, source: &str, blank: usize, ragged: usize) -> LoadSummary {
    let (found, missing): (Vec<&'static str>, Vec<&'static str>) = CORE_COLUMNS
        .iter()
        .copied()
        .partition(|c| dataset.has_column(c));

    let columns_found = format!(
        "Found {}/{} core columns. Present: [{}]. Missing: [{}]",
        found.len(),
        CORE_COLUMNS.len(),
        found.join(", "),
        missing.join(", "),
    );

    LoadSummary {
        source: source.to_string(),
        record_count: dataset.len(),
        column_count: dataset.schema().len(),
        blank_rows: blank,
        ragged_rows: ragged,
        ragged_lines: Vec::new(),
        unreadable_lines: Vec::new(),
        missing_core_columns: missing,
        columns_found,
    }
}

// ============================================================================
// Tests
// ============================================================================
