//! End-to-end cleaning of small in-memory surveys.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use proptest::prelude::*;

use survey_common::{any_to_string, column_numbers};
use survey_model::{LayoutRecord, LayoutValue, QuestionType, ScaleBucket};
use survey_transform::{CleanOptions, Cleaner};

fn record(qid: &str, vid: &str, kind: &str, code: Option<f64>, label: &str) -> LayoutRecord {
    LayoutRecord {
        start: LayoutValue::Number(1.0),
        question_id: qid.to_string(),
        variable_id: vid.to_string(),
        type_name: kind.to_string(),
        answer_code: code.map_or(LayoutValue::Missing, LayoutValue::Number),
        question_label: format!("Rate {qid}"),
        answer_label: LayoutValue::parse(label),
    }
}

fn five_point_grid(items: &[&str]) -> Vec<LayoutRecord> {
    let labels = ["Poor", "Fair", "Good", "Very good", "Excellent"];
    let mut records = Vec::new();
    for item in items {
        for (code, label) in (1..=5).zip(labels) {
            records.push(record("q1", item, "grid", Some(f64::from(code)), label));
        }
    }
    records
}

fn codes(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    column_numbers(df, name).unwrap()
}

fn survey_frame() -> DataFrame {
    let answers = [5i64, 4, 4, 5, 3, 3, 3, 2, 1, 1];
    let items = ["q1_a", "q1_b", "q1_c", "q1_d", "q1_e"];
    let mut columns = vec![
        Series::new("status".into(), vec!["complete"; 10]).into_column(),
        Series::new("segment".into(), vec!["all"; 10]).into_column(),
    ];
    for item in items {
        columns.push(Series::new(item.into(), answers.to_vec()).into_column());
    }
    columns.push(Series::new("qSubmitURL".into(), vec!["https://x"; 10]).into_column());
    DataFrame::new(columns).unwrap()
}

#[test]
fn five_point_grid_gains_likert_rows_and_column() {
    let items = ["q1_a", "q1_b", "q1_c", "q1_d", "q1_e"];
    let cleaned = Cleaner::default()
        .clean(&survey_frame(), &five_point_grid(&items))
        .unwrap();

    let rows: Vec<(Option<i64>, String)> = cleaned
        .layout
        .rows()
        .iter()
        .filter(|row| row.variable_id == "q1_a_likert")
        .map(|row| (row.answer_code, row.answer_label.to_string()))
        .collect();
    assert_eq!(
        rows,
        vec![
            (Some(1), "Top 2 (5,4)".to_string()),
            (Some(2), "Middle (3)".to_string()),
            (Some(3), "Bottom 2 (2,1)".to_string()),
        ]
    );

    let buckets = codes(&cleaned.data, "q1_a_likert");
    let count = |code: f64| buckets.iter().filter(|v| **v == Some(code)).count();
    assert_eq!((count(1.0), count(2.0), count(3.0)), (4, 3, 3));

    assert!(cleaned.data.column("qSubmitURL").is_err());
    assert_eq!(
        cleaned.scale_report.lines()[0],
        "5-scale grid questions: {q1}"
    );
    assert_eq!(cleaned.derived.len(), 5);
}

#[test]
fn slider_question_buckets_by_quartile() {
    let data = DataFrame::new(vec![
        Series::new("status".into(), vec!["complete"; 3]).into_column(),
        Series::new("q7_1".into(), vec![10.0, 50.0, 90.0]).into_column(),
    ])
    .unwrap();
    let mut slider = record("q7", "q7_1", "numericlist", None, "");
    slider.question_label = "Move the slider <div onload=createSlider()>".to_string();

    let cleaned = Cleaner::default().clean(&data, &[slider]).unwrap();
    assert_eq!(
        codes(&cleaned.data, "q7_1_slider"),
        vec![Some(3.0), Some(2.0), Some(1.0)]
    );
    assert_eq!(
        cleaned.scale_report.groups(ScaleBucket::Slider).into_iter().collect::<Vec<_>>(),
        vec!["q7".to_string()]
    );
    assert!(
        cleaned
            .scale_report
            .lines()
            .contains(&"5-scale grid questions: none".to_string())
    );
}

#[test]
fn cleaned_rows_are_complete_and_columns_non_empty() {
    let data = DataFrame::new(vec![
        Series::new("status".into(), vec!["complete", "partial", "complete"]).into_column(),
        Series::new("q1".into(), vec![Some(1i64), Some(2), Some(2)]).into_column(),
        Series::new("q2".into(), vec![None::<i64>, Some(1), None]).into_column(),
    ])
    .unwrap();
    let records = vec![
        record("q1", "q1", "single", Some(1.0), "Yes"),
        record("q1", "q1", "single", Some(2.0), "No"),
        record("q2", "q2", "single", Some(1.0), "Yes"),
    ];
    let cleaned = Cleaner::default().clean(&data, &records).unwrap();

    assert_eq!(cleaned.respondents(), 2);
    let status = cleaned.data.column("status").unwrap();
    for idx in 0..cleaned.data.height() {
        assert_eq!(any_to_string(status.get(idx).unwrap()), "complete");
    }
    assert!(cleaned.data.column("q2").is_err());
    assert!(cleaned.layout.rows().iter().all(|row| row.variable_id == "q1"));
}

#[test]
fn custom_completion_value() {
    let data = DataFrame::new(vec![
        Series::new("state".into(), vec!["done", "open"]).into_column(),
        Series::new("q1".into(), vec![1i64, 2]).into_column(),
    ])
    .unwrap();
    let options = CleanOptions::new().with_completion("state", "done");
    let cleaned = Cleaner::new(options)
        .clean(&data, &[record("q1", "q1", "single", Some(1.0), "Yes")])
        .unwrap();
    assert_eq!(cleaned.respondents(), 1);
    assert_eq!(cleaned.layout.rows()[0].question_type, QuestionType::Single);
}

#[test]
fn cleaning_twice_is_idempotent() {
    let items = ["q1_a", "q1_b", "q1_c", "q1_d", "q1_e"];
    let cleaner = Cleaner::default();
    let records = five_point_grid(&items);
    let first = cleaner.clean(&survey_frame(), &records).unwrap();
    let second = cleaner.clean(&survey_frame(), &records).unwrap();
    assert_eq!(first.layout, second.layout);
    assert!(first.data.equals_missing(&second.data));

    // Feeding the cleaned output back in does not duplicate buckets.
    let again_records: Vec<LayoutRecord> = first
        .layout
        .rows()
        .iter()
        .map(|row| LayoutRecord {
            start: row.start.clone(),
            question_id: row.question_id.clone(),
            variable_id: row.variable_id.clone(),
            type_name: row.question_type.to_string(),
            answer_code: row
                .answer_code
                .map_or(LayoutValue::Missing, |code| LayoutValue::Number(code as f64)),
            question_label: row.question_label.clone(),
            answer_label: row.answer_label.clone(),
        })
        .collect();
    let third = cleaner.clean(&first.data, &again_records).unwrap();
    assert_eq!(third.layout, first.layout);
    assert_eq!(third.data.width(), first.data.width());
}

#[test]
fn missing_status_column_names_the_field() {
    let data = DataFrame::new(vec![Series::new("q1".into(), vec![1i64]).into_column()]).unwrap();
    let error = Cleaner::default().clean(&data, &[]).unwrap_err();
    assert_eq!(
        error.to_string(),
        "missing required column `status` in data table"
    );
}

proptest! {
    #[test]
    fn five_point_buckets_follow_thresholds(answers in prop::collection::vec(1i64..=5, 1..40)) {
        let data = DataFrame::new(vec![
            Series::new("status".into(), vec!["complete"; answers.len()]).into_column(),
            Series::new("q1_a".into(), answers.clone()).into_column(),
        ])
        .unwrap();
        let cleaned = Cleaner::default().clean(&data, &five_point_grid(&["q1_a"])).unwrap();
        let buckets = codes(&cleaned.data, "q1_a_likert");
        prop_assert_eq!(buckets.len(), answers.len());
        for (raw, bucket) in answers.iter().zip(buckets) {
            let expected = match *raw {
                ..=2 => 3.0,
                3 => 2.0,
                _ => 1.0,
            };
            prop_assert_eq!(bucket, Some(expected));
        }
    }
}
