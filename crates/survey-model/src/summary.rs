//! Summary tables: one cross-tab per question or grid item.

use serde::{Deserialize, Serialize};

/// A single statistic in a summary table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SummaryCell {
    /// A respondent count.
    Count(usize),
    /// A ratio or mean; NaN when undefined (e.g. no respondents).
    Value(f64),
}

impl SummaryCell {
    /// Ratio of two counts, NaN when the denominator is zero.
    pub fn ratio(numerator: usize, denominator: usize) -> Self {
        if denominator == 0 {
            SummaryCell::Value(f64::NAN)
        } else {
            SummaryCell::Value(numerator as f64 / denominator as f64)
        }
    }

    /// Mean of the given values, NaN when there are none.
    pub fn mean(values: &[f64]) -> Self {
        if values.is_empty() {
            SummaryCell::Value(f64::NAN)
        } else {
            SummaryCell::Value(values.iter().sum::<f64>() / values.len() as f64)
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            SummaryCell::Count(v) => *v as f64,
            SummaryCell::Value(v) => *v,
        }
    }

    pub fn as_count(&self) -> Option<usize> {
        match self {
            SummaryCell::Count(v) => Some(*v),
            SummaryCell::Value(_) => None,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, SummaryCell::Value(v) if v.is_nan())
    }

    /// Text written to the report; NaN becomes an empty cell.
    pub fn render(&self) -> String {
        match self {
            SummaryCell::Count(v) => v.to_string(),
            SummaryCell::Value(v) if v.is_nan() => String::new(),
            SummaryCell::Value(v) if v.fract() == 0.0 => format!("{v:.1}"),
            SummaryCell::Value(v) => v.to_string(),
        }
    }
}

/// Row index entry: an answer code or a variable id, plus its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SummaryColumn {
    name: String,
    cells: Vec<SummaryCell>,
}

/// Cross-tabulated statistics for one question or grid item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    /// Question ID, or Variable ID for grid items.
    pub id: String,
    /// Header for the index column (`Answer Code` or `Variable ID`).
    pub index_header: String,
    /// Header for the label column (`Answer Label` or `Question Label`).
    pub label_header: String,
    rows: Vec<SummaryRow>,
    columns: Vec<SummaryColumn>,
}

impl SummaryTable {
    pub fn new(
        id: impl Into<String>,
        index_header: impl Into<String>,
        label_header: impl Into<String>,
        rows: Vec<SummaryRow>,
    ) -> Self {
        Self {
            id: id.into(),
            index_header: index_header.into(),
            label_header: label_header.into(),
            rows,
            columns: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    /// Statistic column names in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Append a statistic column; `cells` must have one entry per row.
    pub fn push_column(&mut self, name: impl Into<String>, cells: Vec<SummaryCell>) {
        debug_assert_eq!(cells.len(), self.rows.len());
        self.columns.push(SummaryColumn {
            name: name.into(),
            cells,
        });
    }

    pub fn column(&self, name: &str) -> Option<&[SummaryCell]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.cells.as_slice())
    }

    /// Look up one cell by row key and column name.
    pub fn cell(&self, row_key: &str, column: &str) -> Option<SummaryCell> {
        let idx = self.rows.iter().position(|row| row.key == row_key)?;
        self.column(column)?.get(idx).copied()
    }

    /// Header record followed by one record per row, ready for CSV output.
    pub fn records(&self) -> Vec<Vec<String>> {
        let mut header = vec![self.index_header.clone(), self.label_header.clone()];
        header.extend(self.columns.iter().map(|c| c.name.clone()));
        let mut records = vec![header];
        for (idx, row) in self.rows.iter().enumerate() {
            let mut record = vec![row.key.clone(), row.label.clone()];
            record.extend(self.columns.iter().map(|c| c.cells[idx].render()));
            records.push(record);
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_is_nan_for_empty_denominator() {
        assert!(SummaryCell::ratio(0, 0).is_nan());
        assert_eq!(SummaryCell::ratio(1, 4), SummaryCell::Value(0.25));
    }

    #[test]
    fn mean_of_nothing_is_nan() {
        assert!(SummaryCell::mean(&[]).is_nan());
        assert_eq!(SummaryCell::mean(&[1.0, 2.0]), SummaryCell::Value(1.5));
    }

    #[test]
    fn render_matches_spreadsheet_conventions() {
        assert_eq!(SummaryCell::Count(4).render(), "4");
        assert_eq!(SummaryCell::Value(0.4).render(), "0.4");
        assert_eq!(SummaryCell::Value(1.0).render(), "1.0");
        assert_eq!(SummaryCell::Value(f64::NAN).render(), "");
    }

    #[test]
    fn records_include_headers_and_rows() {
        let mut table = SummaryTable::new(
            "q2",
            "Answer Code",
            "Answer Label",
            vec![
                SummaryRow {
                    key: "1".into(),
                    label: "Yes".into(),
                },
                SummaryRow {
                    key: "2".into(),
                    label: "No".into(),
                },
            ],
        );
        table.push_column("A_total", vec![SummaryCell::Count(2), SummaryCell::Count(2)]);
        table.push_column("A_counts", vec![SummaryCell::Count(2), SummaryCell::Count(0)]);
        assert_eq!(table.cell("2", "A_counts"), Some(SummaryCell::Count(0)));
        assert_eq!(table.cell("3", "A_counts"), None);
        assert_eq!(
            table.records(),
            vec![
                vec!["Answer Code", "Answer Label", "A_total", "A_counts"],
                vec!["1", "Yes", "2", "2"],
                vec!["2", "No", "2", "0"],
            ]
        );
    }
}
