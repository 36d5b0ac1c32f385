use std::path::PathBuf;

use survey_model::QuestionType;

/// Outcome of one cleaning and tabulation run.
#[derive(Debug)]
pub struct RunResult {
    pub output: PathBuf,
    pub segment_field: String,
    pub segments: Vec<String>,
    pub respondents: usize,
    /// Scale classification lines, e.g. `5-scale grid questions: {q1}`.
    pub scale_lines: Vec<String>,
    pub derived_variables: usize,
    pub questions: Vec<QuestionTypeSummary>,
    pub blocks: usize,
}

/// Per question type: how many questions and report blocks it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionTypeSummary {
    pub question_type: QuestionType,
    pub questions: usize,
    pub blocks: usize,
}
