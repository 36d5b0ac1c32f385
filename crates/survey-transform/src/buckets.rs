//! Bucket derivation for scaled grid and slider questions.
//!
//! Each qualifying variable gains a derived response column `<id>_likert` or
//! `<id>_slider` holding codes 1 (top), 2 (middle), 3 (bottom), and three
//! layout rows describing those codes.

use polars::prelude::{DataFrame, NamedFrom, Series};
use serde::Serialize;
use tracing::debug;

use survey_common::column_numbers;
use survey_model::{Layout, LayoutRow, LayoutValue, QuestionType, Result, ScaleBucket};

use crate::scale_report::ScaleReport;

/// A derived bucket variable and the variable it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedVariable {
    pub source: String,
    pub derived: String,
    pub bucket: ScaleBucket,
}

/// Output of a derivation stage: new tables plus what was derived.
#[derive(Debug, Clone)]
pub struct Derivation {
    pub data: DataFrame,
    pub layout: Layout,
    pub derived: Vec<DerivedVariable>,
}

/// Question-group name used in the scale report: the Variable ID up to its
/// first underscore.
pub fn group_name(variable_id: &str) -> &str {
    variable_id.split('_').next().unwrap_or(variable_id)
}

/// Bucket codes for every row of a response column.
pub fn bucket_series(df: &DataFrame, variable_id: &str, bucket: ScaleBucket) -> Result<Series> {
    let codes: Vec<Option<i64>> = column_numbers(df, variable_id)?
        .into_iter()
        .map(|value| value.and_then(|v| bucket.classify(v)))
        .collect();
    Ok(Series::new(bucket.derived_id(variable_id).into(), codes))
}

/// The three layout rows describing a derived bucket variable.
pub fn bucket_rows(bucket: ScaleBucket, source: &LayoutRow) -> Vec<LayoutRow> {
    let derived = bucket.derived_id(&source.variable_id);
    bucket
        .labels()
        .iter()
        .zip(1i64..)
        .map(|(label, code)| LayoutRow {
            start: source.start.clone(),
            question_id: derived.clone(),
            variable_id: derived.clone(),
            question_type: QuestionType::Single,
            answer_code: Some(code),
            question_label: source.question_label.clone(),
            answer_label: LayoutValue::Text((*label).to_string()),
        })
        .collect()
}

/// The third answer label must be a whole number ("3", not "2.5" or "Neutral").
fn third_label_is_numeric(rows: &[&LayoutRow]) -> bool {
    rows.get(2).is_some_and(|row| row.answer_label.as_code().is_some())
}

/// Derive `_likert` buckets for 5-, 7- and 11-point grid variables.
///
/// 7- and 11-point variables only qualify when their third answer label is a
/// whole number; other sizes pass through unchanged.
pub fn derive_grid_buckets(
    data: &DataFrame,
    layout: &Layout,
    report: &mut ScaleReport,
) -> Result<Derivation> {
    let mut derived_rows = Vec::new();
    let mut derived_columns = Vec::new();
    let mut derived = Vec::new();

    for (variable_id, rows) in layout.groups_by_variable(QuestionType::Grid) {
        let Some(bucket) = ScaleBucket::for_grid_size(rows.len()) else {
            debug!(variable_id, size = rows.len(), "no scale bucket for grid size");
            continue;
        };
        report.record(bucket, group_name(variable_id));
        if bucket.requires_numeric_label() && !third_label_is_numeric(&rows) {
            debug!(variable_id, %bucket, "skipping grid with text answer labels");
            continue;
        }
        derived_columns.push(bucket_series(data, variable_id, bucket)?);
        derived_rows.extend(bucket_rows(bucket, rows[0]));
        derived.push(DerivedVariable {
            source: variable_id.to_string(),
            derived: bucket.derived_id(variable_id),
            bucket,
        });
    }

    apply(data, layout, derived_columns, derived_rows, derived)
}

/// Derive `_slider` buckets for numeric-list variables rendered as sliders.
pub fn derive_slider_buckets(
    data: &DataFrame,
    layout: &Layout,
    marker: &str,
    report: &mut ScaleReport,
) -> Result<Derivation> {
    let mut derived_rows = Vec::new();
    let mut derived_columns = Vec::new();
    let mut derived = Vec::new();
    let bucket = ScaleBucket::Slider;

    for (variable_id, rows) in layout.groups_by_variable(QuestionType::NumericList) {
        if !rows.iter().any(|row| row.question_label.contains(marker)) {
            continue;
        }
        report.record(bucket, group_name(variable_id));
        derived_columns.push(bucket_series(data, variable_id, bucket)?);
        derived_rows.extend(bucket_rows(bucket, rows[0]));
        derived.push(DerivedVariable {
            source: variable_id.to_string(),
            derived: bucket.derived_id(variable_id),
            bucket,
        });
    }

    apply(data, layout, derived_columns, derived_rows, derived)
}

fn apply(
    data: &DataFrame,
    layout: &Layout,
    columns: Vec<Series>,
    rows: Vec<LayoutRow>,
    derived: Vec<DerivedVariable>,
) -> Result<Derivation> {
    let mut data = data.clone();
    for column in columns {
        data.with_column(column)?;
    }
    // Rows for a re-derived variable replace the earlier ones.
    let kept: Vec<LayoutRow> = layout
        .rows()
        .iter()
        .filter(|row| !derived.iter().any(|d| d.derived == row.variable_id))
        .cloned()
        .collect();
    let layout = Layout::new(kept).with_rows(rows);
    Ok(Derivation {
        data,
        layout,
        derived,
    })
}
