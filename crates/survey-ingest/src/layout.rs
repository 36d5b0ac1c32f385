//! Layout (codebook) parsing.

use std::path::Path;

use polars::prelude::{AnyValue, DataFrame};
use tracing::info;

use survey_common::any_to_string;
use survey_model::{LAYOUT_COLUMNS, LayoutRecord, LayoutValue, Result, TableKind, columns};

use crate::table::{load_text_table, require_columns};

/// Load and parse a layout file.
pub fn load_layout(path: &Path) -> Result<Vec<LayoutRecord>> {
    let df = load_text_table(path)?;
    let records = layout_records(&df)?;
    info!(path = %path.display(), rows = records.len(), "loaded layout");
    Ok(records)
}

/// Parse a layout frame into records, one per row.
///
/// Every column in [`LAYOUT_COLUMNS`] must be present; other columns are ignored.
pub fn layout_records(df: &DataFrame) -> Result<Vec<LayoutRecord>> {
    require_columns(df, TableKind::Layout, &LAYOUT_COLUMNS)?;
    let text = |name: &str, idx: usize| -> Result<String> {
        let value = df.column(name)?.get(idx).unwrap_or(AnyValue::Null);
        Ok(any_to_string(value).trim().to_string())
    };
    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        records.push(LayoutRecord {
            start: LayoutValue::parse(&text(columns::START, idx)?),
            question_id: text(columns::QUESTION_ID, idx)?,
            variable_id: text(columns::VARIABLE_ID, idx)?,
            type_name: text(columns::TYPE, idx)?,
            answer_code: LayoutValue::parse(&text(columns::ANSWER_CODE, idx)?),
            question_label: text(columns::QUESTION_LABEL, idx)?,
            answer_label: LayoutValue::parse(&text(columns::ANSWER_LABEL, idx)?),
        });
    }
    Ok(records)
}
