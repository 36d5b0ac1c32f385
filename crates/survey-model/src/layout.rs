//! Layout (codebook) rows describing each survey variable.
//!
//! A layout has one row per (variable, answer code) pair. Rows are grouped by
//! Question ID for reporting and by Variable ID for scale detection.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use survey_common::{format_numeric, parse_f64};

/// Layout column names as they appear in the codebook export.
pub mod columns {
    pub const START: &str = "Start";
    pub const QUESTION_ID: &str = "Question ID";
    pub const VARIABLE_ID: &str = "Variable ID";
    pub const TYPE: &str = "Type";
    pub const ANSWER_CODE: &str = "Answer Code";
    pub const QUESTION_LABEL: &str = "Question Label";
    pub const ANSWER_LABEL: &str = "Answer Label";
}

/// Columns the cleaned layout is restricted to, in output order.
pub const LAYOUT_COLUMNS: [&str; 7] = [
    columns::START,
    columns::QUESTION_ID,
    columns::VARIABLE_ID,
    columns::TYPE,
    columns::ANSWER_CODE,
    columns::QUESTION_LABEL,
    columns::ANSWER_LABEL,
];

/// Question type per the layout's `Type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionType {
    /// One answer code per respondent.
    Single,
    /// Several single-select items sharing a scale under one Question ID.
    Grid,
    /// Checkbox options, each a 0/1 column.
    Multi,
    /// A free numeric entry.
    Numeric,
    /// Several numeric entries, typically rendered as sliders.
    NumericList,
}

impl QuestionType {
    pub const ALL: [QuestionType; 5] = [
        QuestionType::Single,
        QuestionType::Grid,
        QuestionType::Multi,
        QuestionType::Numeric,
        QuestionType::NumericList,
    ];

    /// Returns the name used in the layout file.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Single => "single",
            QuestionType::Grid => "grid",
            QuestionType::Multi => "multi",
            QuestionType::Numeric => "numeric",
            QuestionType::NumericList => "numericlist",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    /// Parse a layout type name (case-insensitive, surrounding space ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "single" => Ok(QuestionType::Single),
            "grid" => Ok(QuestionType::Grid),
            "multi" => Ok(QuestionType::Multi),
            "numeric" => Ok(QuestionType::Numeric),
            "numericlist" => Ok(QuestionType::NumericList),
            _ => Err(format!("Unknown question type: {s}")),
        }
    }
}

/// A layout cell that keeps track of whether the source held a number or text.
///
/// Ordering puts numbers first (numerically), then text, then missing cells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum LayoutValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl LayoutValue {
    /// Classify a raw cell: blank is missing, anything parseable as a number is numeric.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return LayoutValue::Missing;
        }
        match parse_f64(trimmed) {
            Some(number) if !number.is_nan() => LayoutValue::Number(number),
            _ => LayoutValue::Text(trimmed.to_string()),
        }
    }

    /// Integer value of a whole number, used for answer codes.
    pub fn as_code(&self) -> Option<i64> {
        match self {
            LayoutValue::Number(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            LayoutValue::Number(_) => 0,
            LayoutValue::Text(_) => 1,
            LayoutValue::Missing => 2,
        }
    }
}

impl fmt::Display for LayoutValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutValue::Number(v) => f.write_str(&format_numeric(*v)),
            LayoutValue::Text(s) => f.write_str(s),
            LayoutValue::Missing => Ok(()),
        }
    }
}

impl PartialEq for LayoutValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LayoutValue {}

impl PartialOrd for LayoutValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LayoutValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (LayoutValue::Number(a), LayoutValue::Number(b)) => a.total_cmp(b),
            (LayoutValue::Text(a), LayoutValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// One raw layout row as loaded from the codebook, before type restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutRecord {
    pub start: LayoutValue,
    pub question_id: String,
    pub variable_id: String,
    pub type_name: String,
    pub answer_code: LayoutValue,
    pub question_label: String,
    pub answer_label: LayoutValue,
}

impl LayoutRecord {
    /// The parsed question type, if the row uses one of the supported types.
    pub fn question_type(&self) -> Option<QuestionType> {
        self.type_name.parse().ok()
    }
}

/// A layout row restricted to a supported question type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRow {
    pub start: LayoutValue,
    pub question_id: String,
    pub variable_id: String,
    pub question_type: QuestionType,
    pub answer_code: Option<i64>,
    pub question_label: String,
    pub answer_label: LayoutValue,
}

impl LayoutRow {
    /// Convert a raw record, returning `None` when its type is unsupported.
    pub fn from_record(record: &LayoutRecord) -> Option<Self> {
        let question_type = record.question_type()?;
        Some(Self {
            start: record.start.clone(),
            question_id: record.question_id.clone(),
            variable_id: record.variable_id.clone(),
            question_type,
            answer_code: record.answer_code.as_code(),
            question_label: record.question_label.clone(),
            answer_label: record.answer_label.clone(),
        })
    }

    fn sort_key(&self) -> (&LayoutValue, &str, &str, Option<i64>) {
        (
            &self.start,
            &self.question_id,
            &self.variable_id,
            self.answer_code,
        )
    }
}

fn compare_rows(a: &LayoutRow, b: &LayoutRow) -> Ordering {
    let (a_start, a_qid, a_vid, a_code) = a.sort_key();
    let (b_start, b_qid, b_vid, b_code) = b.sort_key();
    a_start
        .cmp(b_start)
        .then_with(|| a_qid.cmp(b_qid))
        .then_with(|| a_vid.cmp(b_vid))
        .then_with(|| match (a_code, b_code) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// An ordered collection of typed layout rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    rows: Vec<LayoutRow>,
}

impl Layout {
    pub fn new(rows: Vec<LayoutRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[LayoutRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a copy with rows appended after the existing ones.
    #[must_use]
    pub fn with_rows(&self, extra: impl IntoIterator<Item = LayoutRow>) -> Self {
        let mut rows = self.rows.clone();
        rows.extend(extra);
        Self { rows }
    }

    /// Sort by (Start, Question ID, Variable ID, Answer Code); rows without a
    /// code sort last within their variable.
    #[must_use]
    pub fn sorted(mut self) -> Self {
        self.rows.sort_by(compare_rows);
        self
    }

    /// Distinct Question IDs in row order.
    pub fn question_ids(&self) -> Vec<&str> {
        distinct(self.rows.iter().map(|row| row.question_id.as_str()))
    }

    /// All rows of one question, in row order.
    pub fn question(&self, question_id: &str) -> Vec<&LayoutRow> {
        self.rows
            .iter()
            .filter(|row| row.question_id == question_id)
            .collect()
    }

    /// Rows of the given type, grouped by Variable ID (groups sorted by id,
    /// rows kept in layout order).
    pub fn groups_by_variable(
        &self,
        question_type: QuestionType,
    ) -> BTreeMap<&str, Vec<&LayoutRow>> {
        let mut groups: BTreeMap<&str, Vec<&LayoutRow>> = BTreeMap::new();
        for row in self
            .rows
            .iter()
            .filter(|row| row.question_type == question_type)
        {
            groups.entry(row.variable_id.as_str()).or_default().push(row);
        }
        groups
    }
}

/// Distinct Variable IDs of a question's rows, in row order.
pub fn distinct_variables<'a>(rows: &[&'a LayoutRow]) -> Vec<&'a str> {
    distinct(rows.iter().map(|row| row.variable_id.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|value| seen.insert(*value)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(start: f64, qid: &str, vid: &str, code: Option<i64>) -> LayoutRow {
        LayoutRow {
            start: LayoutValue::Number(start),
            question_id: qid.to_string(),
            variable_id: vid.to_string(),
            question_type: QuestionType::Single,
            answer_code: code,
            question_label: String::new(),
            answer_label: LayoutValue::Missing,
        }
    }

    #[test]
    fn layout_value_classifies_cells() {
        assert_eq!(LayoutValue::parse("3"), LayoutValue::Number(3.0));
        assert_eq!(LayoutValue::parse(" 2.5 "), LayoutValue::Number(2.5));
        assert_eq!(
            LayoutValue::parse("Agree"),
            LayoutValue::Text("Agree".to_string())
        );
        assert_eq!(LayoutValue::parse(""), LayoutValue::Missing);
    }

    #[test]
    fn layout_value_orders_numbers_before_text() {
        let mut values = vec![
            LayoutValue::Missing,
            LayoutValue::Text("b".to_string()),
            LayoutValue::Number(10.0),
            LayoutValue::Number(2.0),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                LayoutValue::Number(2.0),
                LayoutValue::Number(10.0),
                LayoutValue::Text("b".to_string()),
                LayoutValue::Missing,
            ]
        );
    }

    #[test]
    fn as_code_accepts_whole_numbers_only() {
        assert_eq!(LayoutValue::Number(4.0).as_code(), Some(4));
        assert_eq!(LayoutValue::Number(4.5).as_code(), None);
        assert_eq!(LayoutValue::Number(f64::INFINITY).as_code(), None);
        assert_eq!(LayoutValue::Text("4".to_string()).as_code(), None);
    }

    #[test]
    fn sorted_orders_by_start_then_ids_then_code() {
        let layout = Layout::new(vec![
            row(2.0, "q2", "q2", Some(1)),
            row(1.0, "q1", "q1_b", Some(2)),
            row(1.0, "q1", "q1_b", None),
            row(1.0, "q1", "q1_a", Some(2)),
            row(1.0, "q1", "q1_b", Some(1)),
        ])
        .sorted();
        let keys: Vec<(&str, Option<i64>)> = layout
            .rows()
            .iter()
            .map(|r| (r.variable_id.as_str(), r.answer_code))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("q1_a", Some(2)),
                ("q1_b", Some(1)),
                ("q1_b", Some(2)),
                ("q1_b", None),
                ("q2", Some(1)),
            ]
        );
    }

    #[test]
    fn question_ids_keep_row_order() {
        let layout = Layout::new(vec![
            row(1.0, "z", "z", Some(1)),
            row(1.0, "a", "a", Some(1)),
            row(1.0, "z", "z", Some(2)),
        ]);
        assert_eq!(layout.question_ids(), vec!["z", "a"]);
        assert_eq!(layout.question("z").len(), 2);
    }

    #[test]
    fn record_conversion_drops_unknown_types() {
        let record = LayoutRecord {
            variable_id: "q9".to_string(),
            type_name: "open".to_string(),
            ..LayoutRecord::default()
        };
        assert!(LayoutRow::from_record(&record).is_none());

        let record = LayoutRecord {
            type_name: " Grid ".to_string(),
            answer_code: LayoutValue::Number(3.0),
            ..record
        };
        let row = LayoutRow::from_record(&record).expect("grid row");
        assert_eq!(row.question_type, QuestionType::Grid);
        assert_eq!(row.answer_code, Some(3));
    }
}
