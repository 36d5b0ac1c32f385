//! Row and column filtering of the raw export, and layout restriction.

use std::collections::BTreeSet;

use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use tracing::{debug, warn};

use survey_common::{any_to_string, is_missing};
use survey_ingest::require_columns;
use survey_model::{Layout, LayoutRecord, LayoutRow, Result, TableKind};

use crate::options::CleanOptions;

/// Keep only rows whose completion field equals the completion value.
pub fn filter_completes(df: &DataFrame, options: &CleanOptions) -> Result<DataFrame> {
    require_columns(df, TableKind::Data, &[options.completion_field.as_str()])?;
    let status = df.column(&options.completion_field)?;
    let mut mask = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        mask.push(any_to_string(status.get(idx)?) == options.completion_value);
    }
    let mask = Series::new("complete".into(), mask);
    let filtered = df.filter(mask.bool()?)?;
    if filtered.height() == 0 {
        warn!(
            field = %options.completion_field,
            value = %options.completion_value,
            "no completed responses"
        );
    }
    Ok(filtered)
}

fn is_empty_column(column: &Column) -> Result<bool> {
    if column.null_count() == column.len() {
        return Ok(true);
    }
    for idx in 0..column.len() {
        if !is_missing(&column.get(idx)?) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Drop columns with no answer in any row.
pub fn drop_empty_columns(df: &DataFrame) -> Result<DataFrame> {
    let mut keep = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        if is_empty_column(column)? {
            debug!(column = %column.name(), "dropping empty column");
        } else {
            keep.push(column.name().to_string());
        }
    }
    Ok(df.select(keep.iter().map(String::as_str))?)
}

/// Drop the configured non-analytic columns that are present.
pub fn drop_listed_columns(df: &DataFrame, options: &CleanOptions) -> Result<DataFrame> {
    let dropped: BTreeSet<&str> = options
        .dropped_columns
        .iter()
        .map(String::as_str)
        .collect();
    let keep: Vec<String> = df
        .get_columns()
        .iter()
        .map(|column| column.name().to_string())
        .filter(|name| !dropped.contains(name.as_str()))
        .collect();
    Ok(df.select(keep.iter().map(String::as_str))?)
}

/// Keep layout rows whose variable is a response column and whose type is supported.
pub fn restrict_layout(records: &[LayoutRecord], df: &DataFrame) -> Layout {
    let present: BTreeSet<&str> = df
        .get_columns()
        .iter()
        .map(|column| column.name().as_str())
        .collect();
    let rows: Vec<LayoutRow> = records
        .iter()
        .filter(|record| present.contains(record.variable_id.as_str()))
        .filter_map(LayoutRow::from_record)
        .collect();
    debug!(
        kept = rows.len(),
        dropped = records.len() - rows.len(),
        "restricted layout"
    );
    Layout::new(rows)
}

#[cfg(test)]
mod tests {
    use polars::prelude::IntoColumn;
    use survey_model::{LayoutValue, QuestionType, SurveyError};

    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new(
                "status".into(),
                vec!["complete", "incomplete", "complete", "screened"],
            )
            .into_column(),
            Series::new("q1".into(), vec![Some(1i64), Some(2), None, Some(4)]).into_column(),
            Series::new("notes".into(), vec![None::<&str>, Some("x"), None, None]).into_column(),
            Series::new("qSubmitURL".into(), vec!["u", "u", "u", "u"]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn keeps_only_completes() {
        let filtered = filter_completes(&frame(), &CleanOptions::default()).unwrap();
        assert_eq!(filtered.height(), 2);
        let q1: Vec<Option<i64>> = filtered
            .column("q1")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(q1, vec![Some(1), None]);
    }

    #[test]
    fn missing_status_is_schema_error() {
        let df = frame().drop("status").unwrap();
        let error = filter_completes(&df, &CleanOptions::default()).unwrap_err();
        assert!(matches!(error, SurveyError::MissingColumn { .. }));
    }

    #[test]
    fn empty_columns_are_dropped_after_filtering() {
        let filtered = filter_completes(&frame(), &CleanOptions::default()).unwrap();
        let pruned = drop_empty_columns(&filtered).unwrap();
        let names: Vec<&str> = pruned
            .get_columns()
            .iter()
            .map(|c| c.name().as_str())
            .collect();
        assert_eq!(names, vec!["status", "q1", "qSubmitURL"]);
    }

    #[test]
    fn blank_text_counts_as_empty() {
        let df = DataFrame::new(vec![
            Series::new("blank".into(), vec!["", "  "]).into_column(),
            Series::new("q1".into(), vec![1i64, 2]).into_column(),
        ])
        .unwrap();
        let pruned = drop_empty_columns(&df).unwrap();
        assert_eq!(pruned.width(), 1);
    }

    #[test]
    fn listed_columns_dropped_when_present() {
        let options = CleanOptions::default();
        let dropped = drop_listed_columns(&frame(), &options).unwrap();
        assert!(dropped.column("qSubmitURL").is_err());
        assert_eq!(dropped.width(), 3);
    }

    #[test]
    fn layout_restricted_to_present_supported_rows() {
        let record = |vid: &str, kind: &str| LayoutRecord {
            start: LayoutValue::Number(1.0),
            question_id: vid.to_string(),
            variable_id: vid.to_string(),
            type_name: kind.to_string(),
            answer_code: LayoutValue::Number(1.0),
            question_label: String::new(),
            answer_label: LayoutValue::Missing,
        };
        let records = vec![
            record("q1", "single"),
            record("q1", "open"),
            record("gone", "single"),
            record("status", "single"),
        ];
        let layout = restrict_layout(&records, &frame());
        let kept: Vec<(&str, QuestionType)> = layout
            .rows()
            .iter()
            .map(|row| (row.variable_id.as_str(), row.question_type))
            .collect();
        assert_eq!(
            kept,
            vec![("q1", QuestionType::Single), ("status", QuestionType::Single)]
        );
    }
}
