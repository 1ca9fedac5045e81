//! Delimited-text export of filtered datasets and computed metric tables.

use super::Dataset;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid export filename '{0}': must be a bare file name")]
    InvalidFilename(String),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export produced non-UTF-8 output")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A computed table (e.g. per-record cost lines) ready for display or export.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MetricTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Validate a caller-chosen export filename. Path components are rejected;
/// a missing `.csv` extension is appended.
pub fn sanitize_filename(name: &str) -> Result<String, ExportError> {
    let name = name.trim();
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
    {
        return Err(ExportError::InvalidFilename(name.to_string()));
    }
    if Path::new(name)
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
    {
        Ok(name.to_string())
    } else {
        Ok(format!("{name}.csv"))
    }
}

/// Write a dataset (header + records in order) as CSV. Missing cells are empty.
pub fn write_dataset<W: Write>(dataset: &Dataset, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(dataset.schema().columns())?;
    for record in dataset.records() {
        wtr.write_record(record.cells().map(|c| c.unwrap_or("")))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a metric table as CSV.
pub fn write_table<W: Write>(table: &MetricTable, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn dataset_to_csv(dataset: &Dataset) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_dataset(dataset, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

pub fn table_to_csv(table: &MetricTable) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_table(table, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// Export a dataset to `dir/filename`, returning the written path.
pub fn export_dataset(
    dataset: &Dataset,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(sanitize_filename(filename)?);
    let file = std::fs::File::create(&path)?;
    write_dataset(dataset, file)?;
    tracing::info!(path = %path.display(), records = dataset.len(), "Dataset exported");
    Ok(path)
}

/// Export a metric table to `dir/filename`, returning the written path.
pub fn export_table(table: &MetricTable, dir: &Path, filename: &str) -> Result<PathBuf, ExportError> {
    let path = dir.join(sanitize_filename(filename)?);
    let file = std::fs::File::create(&path)?;
    write_table(table, file)?;
    tracing::info!(path = %path.display(), rows = table.len(), "Metric table exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("filtered_data.csv").unwrap(), "filtered_data.csv");
        assert_eq!(sanitize_filename("report").unwrap(), "report.csv");
        assert_eq!(sanitize_filename("Report.CSV").unwrap(), "Report.CSV");
        assert!(sanitize_filename("../etc/passwd").is_err());
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename("a\\b.csv").is_err());
    }

    #[test]
    fn test_dataset_to_csv_writes_missing_as_empty() {
        let ds = Dataset::from_rows(
            &["Well_Name", "flowline_Shakers", "IntLength"],
            &[vec!["A-1", "Derrick, Hyperpool", "100"], vec!["A-2", "", "nan"]],
        );
        let out = dataset_to_csv(&ds).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Well_Name,flowline_Shakers,IntLength");
        assert_eq!(lines[1], "A-1,\"Derrick, Hyperpool\",100");
        assert_eq!(lines[2], "A-2,,");
    }

    #[test]
    fn test_export_dataset_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let ds = Dataset::from_rows(&["A"], &[vec!["1"], vec!["2"]]);
        let path = export_dataset(&ds, dir.path(), "subset").unwrap();
        assert!(path.ends_with("subset.csv"));
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text, "A\n1\n2\n");
    }

    #[test]
    fn test_table_to_csv() {
        let mut table = MetricTable::new(vec!["Well".into(), "Cost".into()]);
        table.push_row(vec!["A-1".into(), "1250.00".into()]);
        assert_eq!(table_to_csv(&table).unwrap(), "Well,Cost\nA-1,1250.00\n");
    }
}
