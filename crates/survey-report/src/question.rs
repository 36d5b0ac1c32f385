//! Question kinds and their per-segment summaries.
//!
//! Each layout Question ID becomes one [`Question`] variant holding only the
//! metadata its summary needs. Summaries are computed per segment:
//!
//! | Kind        | Index         | Columns per segment            |
//! |-------------|---------------|--------------------------------|
//! | single      | Answer Code   | `_total`, `_counts`, `%`       |
//! | grid        | per item      | as single, one table per item  |
//! | multi       | Variable ID   | `_total`, `_counts`, `%`       |
//! | numeric     | Variable ID   | `_total`, `_counts`, `_avg`    |
//! | numericlist | Variable ID   | `_total`, `_counts`, `_avg`    |

use polars::prelude::DataFrame;

use survey_model::{
    LayoutRow, QuestionType, Result, SummaryCell, SummaryRow, SummaryTable, distinct_variables,
};

use crate::segments::{Responses, Segmentation};

const ANSWER_CODE: &str = "Answer Code";
const VARIABLE_ID: &str = "Variable ID";
const ANSWER_LABEL: &str = "Answer Label";
const QUESTION_LABEL: &str = "Question Label";

/// Computes the summary tables of one question.
pub trait Summarize {
    /// One table for most questions; one per item for grids.
    fn summarize(&self, data: &DataFrame, segments: &Segmentation) -> Result<Vec<SummaryTable>>;
}

/// An answer code with its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub code: i64,
    pub label: String,
}

/// A response variable with the label shown for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub variable_id: String,
    pub label: String,
}

/// A single-select variable. Also used for each item of a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleQuestion {
    /// Table key: the Question ID, or the Variable ID for grid items.
    pub id: String,
    pub variable_id: String,
    pub label: String,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridQuestion {
    pub id: String,
    pub label: String,
    pub items: Vec<SingleQuestion>,
}

/// Checkbox options, one 0/1 column each.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiQuestion {
    pub id: String,
    pub label: String,
    pub options: Vec<Item>,
}

/// Numeric entries. The same shape serves `numeric` and `numericlist`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericQuestion {
    pub id: String,
    pub label: String,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Question {
    Single(SingleQuestion),
    Grid(GridQuestion),
    Multi(MultiQuestion),
    Numeric(NumericQuestion),
    NumericList(NumericQuestion),
}

impl Question {
    /// Build a question from its layout rows; the first row decides the type.
    pub fn from_rows(question_id: &str, rows: &[&LayoutRow]) -> Option<Self> {
        let first = rows.first()?;
        let label = first.question_label.clone();
        let question = match first.question_type {
            QuestionType::Single => Question::Single(SingleQuestion::from_rows(
                question_id,
                &first.variable_id,
                rows,
            )),
            QuestionType::Grid => Question::Grid(GridQuestion {
                id: question_id.to_string(),
                label,
                items: distinct_variables(rows)
                    .into_iter()
                    .map(|variable_id| {
                        let item_rows: Vec<&LayoutRow> = rows
                            .iter()
                            .copied()
                            .filter(|row| row.variable_id == variable_id)
                            .collect();
                        SingleQuestion::from_rows(variable_id, variable_id, &item_rows)
                    })
                    .collect(),
            }),
            QuestionType::Multi => Question::Multi(MultiQuestion {
                id: question_id.to_string(),
                label,
                options: items(rows, |row| row.answer_label.to_string()),
            }),
            QuestionType::Numeric => Question::Numeric(NumericQuestion {
                id: question_id.to_string(),
                label,
                items: items(rows, |row| row.question_label.clone()),
            }),
            QuestionType::NumericList => Question::NumericList(NumericQuestion {
                id: question_id.to_string(),
                label,
                items: items(rows, |row| row.question_label.clone()),
            }),
        };
        Some(question)
    }

    pub fn id(&self) -> &str {
        match self {
            Question::Single(q) => &q.id,
            Question::Grid(q) => &q.id,
            Question::Multi(q) => &q.id,
            Question::Numeric(q) | Question::NumericList(q) => &q.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Question::Single(q) => &q.label,
            Question::Grid(q) => &q.label,
            Question::Multi(q) => &q.label,
            Question::Numeric(q) | Question::NumericList(q) => &q.label,
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            Question::Single(_) => QuestionType::Single,
            Question::Grid(_) => QuestionType::Grid,
            Question::Multi(_) => QuestionType::Multi,
            Question::Numeric(_) => QuestionType::Numeric,
            Question::NumericList(_) => QuestionType::NumericList,
        }
    }

    /// Keys of the report blocks this question produces, in output order.
    pub fn block_ids(&self) -> Vec<&str> {
        match self {
            Question::Grid(grid) => grid.items.iter().map(|item| item.id.as_str()).collect(),
            other => vec![other.id()],
        }
    }
}

impl Summarize for Question {
    fn summarize(&self, data: &DataFrame, segments: &Segmentation) -> Result<Vec<SummaryTable>> {
        match self {
            Question::Single(q) => q.summarize(data, segments),
            Question::Grid(q) => q.summarize(data, segments),
            Question::Multi(q) => q.summarize(data, segments),
            Question::Numeric(q) | Question::NumericList(q) => q.summarize(data, segments),
        }
    }
}

/// One item per distinct Variable ID, labelled from its first row.
fn items(rows: &[&LayoutRow], label: impl Fn(&LayoutRow) -> String) -> Vec<Item> {
    distinct_variables(rows)
        .into_iter()
        .filter_map(|variable_id| {
            let row = rows.iter().find(|row| row.variable_id == variable_id)?;
            Some(Item {
                variable_id: variable_id.to_string(),
                label: label(*row),
            })
        })
        .collect()
}

impl SingleQuestion {
    fn from_rows(id: &str, variable_id: &str, rows: &[&LayoutRow]) -> Self {
        let label = rows
            .first()
            .map(|row| row.question_label.clone())
            .unwrap_or_default();
        let answers = rows
            .iter()
            .filter(|row| row.variable_id == variable_id)
            .filter_map(|row| {
                row.answer_code.map(|code| Answer {
                    code,
                    label: row.answer_label.to_string(),
                })
            })
            .collect();
        Self {
            id: id.to_string(),
            variable_id: variable_id.to_string(),
            label,
            answers,
        }
    }
}

impl Summarize for SingleQuestion {
    fn summarize(&self, data: &DataFrame, segments: &Segmentation) -> Result<Vec<SummaryTable>> {
        let responses = Responses::load(data, &self.variable_id)?;
        let rows = self
            .answers
            .iter()
            .map(|answer| SummaryRow {
                key: answer.code.to_string(),
                label: answer.label.clone(),
            })
            .collect();
        let mut table = SummaryTable::new(&self.id, ANSWER_CODE, ANSWER_LABEL, rows);
        for (key, members) in segments.iter() {
            let total = responses.total(members);
            let counts: Vec<usize> = self
                .answers
                .iter()
                .map(|answer| responses.count_equal(members, answer.code as f64))
                .collect();
            table.push_column(key.column("_total"), vec![SummaryCell::Count(total); counts.len()]);
            table.push_column(
                key.column("_counts"),
                counts.iter().copied().map(SummaryCell::Count).collect(),
            );
            table.push_column(
                key.column("%"),
                counts.iter().map(|c| SummaryCell::ratio(*c, total)).collect(),
            );
        }
        Ok(vec![table])
    }
}

impl Summarize for GridQuestion {
    fn summarize(&self, data: &DataFrame, segments: &Segmentation) -> Result<Vec<SummaryTable>> {
        let mut tables = Vec::with_capacity(self.items.len());
        for item in &self.items {
            tables.extend(item.summarize(data, segments)?);
        }
        Ok(tables)
    }
}

fn item_rows(items: &[Item]) -> Vec<SummaryRow> {
    items
        .iter()
        .map(|item| SummaryRow {
            key: item.variable_id.clone(),
            label: item.label.clone(),
        })
        .collect()
}

impl Summarize for MultiQuestion {
    fn summarize(&self, data: &DataFrame, segments: &Segmentation) -> Result<Vec<SummaryTable>> {
        let responses = self
            .options
            .iter()
            .map(|option| Responses::load(data, &option.variable_id))
            .collect::<Result<Vec<_>>>()?;
        let mut table =
            SummaryTable::new(&self.id, VARIABLE_ID, ANSWER_LABEL, item_rows(&self.options));
        for (key, members) in segments.iter() {
            let totals: Vec<usize> = responses.iter().map(|r| r.total(members)).collect();
            let counts: Vec<usize> = responses
                .iter()
                .map(|r| r.count_equal(members, 1.0))
                .collect();
            table.push_column(
                key.column("_total"),
                totals.iter().copied().map(SummaryCell::Count).collect(),
            );
            table.push_column(
                key.column("_counts"),
                counts.iter().copied().map(SummaryCell::Count).collect(),
            );
            table.push_column(
                key.column("%"),
                counts
                    .iter()
                    .zip(&totals)
                    .map(|(c, t)| SummaryCell::ratio(*c, *t))
                    .collect(),
            );
        }
        Ok(vec![table])
    }
}

impl Summarize for NumericQuestion {
    fn summarize(&self, data: &DataFrame, segments: &Segmentation) -> Result<Vec<SummaryTable>> {
        let responses = self
            .items
            .iter()
            .map(|item| Responses::load(data, &item.variable_id))
            .collect::<Result<Vec<_>>>()?;
        let mut table =
            SummaryTable::new(&self.id, VARIABLE_ID, QUESTION_LABEL, item_rows(&self.items));
        for (key, members) in segments.iter() {
            let totals: Vec<SummaryCell> = responses
                .iter()
                .map(|r| SummaryCell::Count(r.total(members)))
                .collect();
            let averages = responses
                .iter()
                .map(|r| SummaryCell::mean(&r.numbers(members)))
                .collect();
            table.push_column(key.column("_total"), totals.clone());
            table.push_column(key.column("_counts"), totals);
            table.push_column(key.column("_avg"), averages);
        }
        Ok(vec![table])
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::{IntoColumn, NamedFrom, Series};
    use survey_model::LayoutValue;

    use super::*;

    fn row(qid: &str, vid: &str, kind: QuestionType, code: Option<i64>, label: &str) -> LayoutRow {
        LayoutRow {
            start: LayoutValue::Number(1.0),
            question_id: qid.to_string(),
            variable_id: vid.to_string(),
            question_type: kind,
            answer_code: code,
            question_label: format!("{qid} label"),
            answer_label: LayoutValue::parse(label),
        }
    }

    fn data() -> DataFrame {
        DataFrame::new(vec![
            Series::new("group".into(), vec!["a", "a", "b", "b"]).into_column(),
            Series::new("q1".into(), vec![Some(1i64), Some(2), Some(1), None]).into_column(),
            Series::new("q3_1".into(), vec![Some(1i64), Some(0), None, None]).into_column(),
            Series::new("q3_2".into(), vec![1i64, 1, 0, 1]).into_column(),
            Series::new("q4".into(), vec![Some(10.0), Some(20.0), None, Some(6.0)]).into_column(),
        ])
        .unwrap()
    }

    fn segments() -> Segmentation {
        Segmentation::discover(&data(), "group").unwrap()
    }

    #[test]
    fn single_counts_and_shares() {
        let rows = [
            row("q1", "q1", QuestionType::Single, Some(1), "Yes"),
            row("q1", "q1", QuestionType::Single, Some(2), "No"),
            row("q1", "q1", QuestionType::Single, Some(3), "Unsure"),
        ];
        let refs: Vec<&LayoutRow> = rows.iter().collect();
        let question = Question::from_rows("q1", &refs).unwrap();
        let tables = question.summarize(&data(), &segments()).unwrap();
        let table = &tables[0];

        assert_eq!(table.index_header, "Answer Code");
        assert_eq!(
            table.column_names(),
            vec!["a_total", "a_counts", "a%", "b_total", "b_counts", "b%"]
        );
        assert_eq!(table.cell("1", "a_counts"), Some(SummaryCell::Count(1)));
        assert_eq!(table.cell("1", "a%"), Some(SummaryCell::Value(0.5)));
        assert_eq!(table.cell("3", "a_counts"), Some(SummaryCell::Count(0)));
        assert_eq!(table.cell("1", "b_total"), Some(SummaryCell::Count(1)));
        assert_eq!(table.cell("1", "b%"), Some(SummaryCell::Value(1.0)));
    }

    #[test]
    fn multi_share_is_nan_without_answers() {
        let rows = [
            row("q3", "q3_1", QuestionType::Multi, Some(1), "Email"),
            row("q3", "q3_2", QuestionType::Multi, Some(1), "Phone"),
        ];
        let refs: Vec<&LayoutRow> = rows.iter().collect();
        let question = Question::from_rows("q3", &refs).unwrap();
        let table = &question.summarize(&data(), &segments()).unwrap()[0];

        assert_eq!(table.rows()[1].label, "Phone");
        assert_eq!(table.cell("q3_1", "a_counts"), Some(SummaryCell::Count(1)));
        assert_eq!(table.cell("q3_1", "a%"), Some(SummaryCell::Value(0.5)));
        assert_eq!(table.cell("q3_1", "b_total"), Some(SummaryCell::Count(0)));
        assert!(table.cell("q3_1", "b%").unwrap().is_nan());
        assert_eq!(table.cell("q3_2", "b%"), Some(SummaryCell::Value(0.5)));
    }

    #[test]
    fn numeric_reports_mean_ignoring_missing() {
        let rows = [row("q4", "q4", QuestionType::Numeric, None, "")];
        let refs: Vec<&LayoutRow> = rows.iter().collect();
        let question = Question::from_rows("q4", &refs).unwrap();
        let table = &question.summarize(&data(), &segments()).unwrap()[0];

        assert_eq!(table.label_header, "Question Label");
        assert_eq!(table.cell("q4", "a_avg"), Some(SummaryCell::Value(15.0)));
        assert_eq!(table.cell("q4", "b_total"), Some(SummaryCell::Count(1)));
        assert_eq!(table.cell("q4", "b_counts"), Some(SummaryCell::Count(1)));
        assert_eq!(table.cell("q4", "b_avg"), Some(SummaryCell::Value(6.0)));
    }

    #[test]
    fn grid_summarizes_each_item() {
        let rows = [
            row("q5", "q3_2", QuestionType::Grid, Some(0), "No"),
            row("q5", "q3_2", QuestionType::Grid, Some(1), "Yes"),
            row("q5", "q1", QuestionType::Grid, Some(1), "Yes"),
        ];
        let refs: Vec<&LayoutRow> = rows.iter().collect();
        let question = Question::from_rows("q5", &refs).unwrap();
        assert_eq!(question.block_ids(), vec!["q3_2", "q1"]);
        let tables = question.summarize(&data(), &segments()).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].id, "q3_2");
        assert_eq!(tables[0].cell("1", "a_counts"), Some(SummaryCell::Count(2)));
    }

    #[test]
    fn missing_response_column_is_reported() {
        let rows = [row("q9", "q9", QuestionType::Single, Some(1), "Yes")];
        let refs: Vec<&LayoutRow> = rows.iter().collect();
        let question = Question::from_rows("q9", &refs).unwrap();
        let error = question.summarize(&data(), &segments()).unwrap_err();
        assert!(error.to_string().contains("`q9`"));
    }
}
