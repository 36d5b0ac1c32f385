use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which input table a schema problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Data,
    Layout,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Data => f.write_str("data"),
            TableKind::Layout => f.write_str("layout"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing required column `{column}` in {table} table")]
    MissingColumn { table: TableKind, column: String },

    #[error("workbook {path} contains no worksheet")]
    MissingSheet { path: PathBuf },

    #[error("unsupported table format: {path} (expected .csv or .xlsx)")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    #[error("polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("question `{id}` is not in the layout")]
    UnknownQuestion { id: String },

    #[error("question `{id}` has no summary; run compute_all first")]
    NotComputed { id: String },
}

impl SurveyError {
    pub fn missing_column(table: TableKind, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            table,
            column: column.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SurveyError>;
