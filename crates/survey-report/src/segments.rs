//! Segment discovery and per-variable response extraction.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;

use survey_common::{any_to_f64, is_missing};
use survey_ingest::require_columns;
use survey_model::{Result, SegmentKey, TableKind};

/// Respondent rows grouped by the distinct values of one field.
///
/// Segments are kept in ascending key order; respondents with no value for
/// the field belong to no segment.
#[derive(Debug, Clone)]
pub struct Segmentation {
    field: String,
    groups: Vec<(SegmentKey, Vec<usize>)>,
}

impl Segmentation {
    pub fn discover(data: &DataFrame, field: &str) -> Result<Self> {
        require_columns(data, TableKind::Data, &[field])?;
        let column = data.column(field)?;
        let mut groups: BTreeMap<SegmentKey, Vec<usize>> = BTreeMap::new();
        for idx in 0..column.len() {
            if let Some(key) = SegmentKey::from_any(&column.get(idx)?) {
                groups.entry(key).or_default().push(idx);
            }
        }
        Ok(Self {
            field: field.to_string(),
            groups: groups.into_iter().collect(),
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn keys(&self) -> impl Iterator<Item = &SegmentKey> {
        self.groups.iter().map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SegmentKey, &[usize])> {
        self.groups.iter().map(|(key, rows)| (key, rows.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// One response column: whether each row answered, and its numeric value.
#[derive(Debug, Clone)]
pub struct Responses {
    answered: Vec<bool>,
    numbers: Vec<Option<f64>>,
}

impl Responses {
    pub fn load(data: &DataFrame, variable_id: &str) -> Result<Self> {
        require_columns(data, TableKind::Data, &[variable_id])?;
        let column = data.column(variable_id)?;
        let mut answered = Vec::with_capacity(column.len());
        let mut numbers = Vec::with_capacity(column.len());
        for idx in 0..column.len() {
            let value = column.get(idx)?;
            answered.push(!is_missing(&value));
            numbers.push(any_to_f64(value));
        }
        Ok(Self { answered, numbers })
    }

    /// Rows among `rows` holding any answer.
    pub fn total(&self, rows: &[usize]) -> usize {
        rows.iter().filter(|idx| self.answered[**idx]).count()
    }

    /// Rows among `rows` whose answer equals `value`.
    pub fn count_equal(&self, rows: &[usize], value: f64) -> usize {
        rows.iter()
            .filter(|idx| self.numbers[**idx] == Some(value))
            .count()
    }

    /// Numeric answers among `rows`.
    pub fn numbers(&self, rows: &[usize]) -> Vec<f64> {
        rows.iter().filter_map(|idx| self.numbers[*idx]).collect()
    }
}
