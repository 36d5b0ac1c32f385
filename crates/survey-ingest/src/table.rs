//! Format dispatch and schema checks for input tables.

use std::path::Path;
use std::time::Instant;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use tracing::{debug, info};

use survey_model::{Result, SurveyError, TableKind};

use crate::workbook::read_workbook;

/// Rows sampled when inferring column types of a CSV export.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Supported input file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" | "xlsm" | "xls" => Ok(SourceFormat::Workbook),
            _ => Err(SurveyError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Load a table, letting the reader infer column types.
pub fn load_table(path: &Path) -> Result<DataFrame> {
    load_with(path, false)
}

/// Load the respondent export.
pub fn load_responses(path: &Path) -> Result<DataFrame> {
    let start = Instant::now();
    let df = load_table(path)?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        duration_ms = start.elapsed().as_millis(),
        "loaded responses"
    );
    Ok(df)
}

/// Load a table with every column kept as text (CSV only; workbook cells
/// keep their native types and are classified later).
pub(crate) fn load_text_table(path: &Path) -> Result<DataFrame> {
    load_with(path, true)
}

fn load_with(path: &Path, all_text: bool) -> Result<DataFrame> {
    match SourceFormat::from_path(path)? {
        SourceFormat::Csv => read_csv_frame(path, all_text),
        SourceFormat::Workbook => read_workbook(path),
    }
}

fn read_csv_frame(path: &Path, all_text: bool) -> Result<DataFrame> {
    if !path.exists() {
        return Err(SurveyError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("CSV file not found: {}", path.display()),
        )));
    }
    let infer = if all_text { 0 } else { INFER_SCHEMA_ROWS };
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(infer))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    debug!(path = %path.display(), rows = df.height(), "read csv");
    Ok(df)
}

/// Fail with a schema error naming the first required column that is absent.
pub fn require_columns(df: &DataFrame, table: TableKind, required: &[&str]) -> Result<()> {
    for name in required {
        if df.column(name).is_err() {
            return Err(SurveyError::missing_column(table, *name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            SourceFormat::from_path(&PathBuf::from("data.CSV")).unwrap(),
            SourceFormat::Csv
        );
        assert_eq!(
            SourceFormat::from_path(&PathBuf::from("layout.xlsx")).unwrap(),
            SourceFormat::Workbook
        );
        assert!(matches!(
            SourceFormat::from_path(&PathBuf::from("notes.txt")),
            Err(SurveyError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn missing_csv_is_io_error() {
        let result = load_table(&PathBuf::from("/nonexistent/survey.csv"));
        assert!(matches!(result, Err(SurveyError::Io(_))));
    }
}
