//! Excel workbook reading via calamine.
//!
//! The first worksheet is read; its first row holds the column names. A column
//! whose non-empty cells are all numeric becomes a `Float64` column, anything
//! else becomes a `String` column with numbers written in their shortest form.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use tracing::debug;

use survey_common::format_numeric;
use survey_model::{Result, SurveyError};

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::Int(v) => Cell::Number(*v as f64),
            Data::Float(v) => Cell::Number(*v),
            Data::Bool(v) => Cell::Text(v.to_string()),
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                if s.trim().is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(s.clone())
                }
            }
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::Error(_) => Cell::Empty,
        }
    }

    fn to_text(&self) -> Option<String> {
        match self {
            Cell::Number(v) => Some(format_numeric(*v)),
            Cell::Text(s) => Some(s.clone()),
            Cell::Empty => None,
        }
    }
}

/// Read the first worksheet of a workbook into a `DataFrame`.
pub fn read_workbook(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path).map_err(|error| SurveyError::Workbook {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Err(SurveyError::MissingSheet {
            path: path.to_path_buf(),
        });
    };
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|error| SurveyError::Workbook {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header_names(header),
        None => Vec::new(),
    };
    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
    for row in rows {
        let parsed: Vec<Cell> = (0..headers.len())
            .map(|idx| row.get(idx).map(Cell::from_data).unwrap_or(Cell::Empty))
            .collect();
        if parsed.iter().all(|cell| *cell == Cell::Empty) {
            continue;
        }
        for (column, cell) in cells.iter_mut().zip(parsed) {
            column.push(cell);
        }
    }

    let columns: Vec<Column> = headers
        .iter()
        .zip(cells)
        .map(|(name, values)| build_column(name, &values))
        .collect();
    let df = DataFrame::new(columns)?;
    debug!(path = %path.display(), sheet = %sheet, rows = df.height(), "read workbook");
    Ok(df)
}

fn header_names(row: &[Data]) -> Vec<String> {
    row.iter()
        .enumerate()
        .map(|(idx, data)| match Cell::from_data(data).to_text() {
            Some(name) => name.trim().to_string(),
            None => format!("Unnamed: {idx}"),
        })
        .collect()
}

fn build_column(name: &str, values: &[Cell]) -> Column {
    let numeric = values
        .iter()
        .all(|cell| matches!(cell, Cell::Number(_) | Cell::Empty));
    if numeric {
        let numbers: Vec<Option<f64>> = values
            .iter()
            .map(|cell| match cell {
                Cell::Number(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(name.into(), numbers).into_column()
    } else {
        let texts: Vec<Option<String>> = values.iter().map(Cell::to_text).collect();
        Series::new(name.into(), texts).into_column()
    }
}
