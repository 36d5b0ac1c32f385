//! Load, clean, tabulate, and write.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use survey_ingest::{load_layout, load_responses};
use survey_model::QuestionType;
use survey_report::{Question, Tabulator};
use survey_transform::{CleanOptions, Cleaner};

use crate::types::{QuestionTypeSummary, RunResult};

/// Input paths and segmentation field for one run.
#[derive(Debug, Clone)]
pub struct RunInput {
    pub data: PathBuf,
    pub layout: PathBuf,
    pub segment_field: String,
    pub output: PathBuf,
}

/// Run the whole pipeline with default cleaning options, printing the scale
/// classification to stdout once cleaning finishes.
pub fn run(input: &RunInput) -> Result<RunResult> {
    run_with_options(input, CleanOptions::default(), &mut io::stdout().lock())
}

/// Run the pipeline, writing the scale classification lines to `feedback`
/// before tabulation starts, so they are shown even when a later stage fails.
pub fn run_with_options<W: Write>(
    input: &RunInput,
    options: CleanOptions,
    feedback: &mut W,
) -> Result<RunResult> {
    let start = Instant::now();

    let (data, layout) = info_span!("load").in_scope(|| -> Result<_> {
        let data = load_responses(&input.data)
            .with_context(|| format!("load data {}", input.data.display()))?;
        let layout = load_layout(&input.layout)
            .with_context(|| format!("load layout {}", input.layout.display()))?;
        Ok((data, layout))
    })?;

    let cleaned = Cleaner::new(options)
        .clean(&data, &layout)
        .context("clean survey")?;
    let scale_lines = cleaned.scale_report.lines();
    write_scale_lines(feedback, &scale_lines).context("write scale report")?;
    let respondents = cleaned.respondents();
    let derived_variables = cleaned.derived.len();

    let mut tabulator = Tabulator::new(cleaned.data, &cleaned.layout, &input.segment_field)
        .with_context(|| format!("segment by {}", input.segment_field))?;
    tabulator.compute_all().context("tabulate")?;
    let blocks = write(&tabulator, &input.output)?;

    let result = RunResult {
        output: input.output.clone(),
        segment_field: input.segment_field.clone(),
        segments: tabulator.segments().iter().map(ToString::to_string).collect(),
        respondents,
        scale_lines,
        derived_variables,
        questions: question_summaries(tabulator.questions()),
        blocks,
    };
    info!(
        respondents = result.respondents,
        segments = result.segments.len(),
        blocks = result.blocks,
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(result)
}

fn write_scale_lines<W: Write>(feedback: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(feedback, "{line}")?;
    }
    writeln!(feedback)?;
    feedback.flush()
}

fn write(tabulator: &Tabulator, output: &Path) -> Result<usize> {
    tabulator
        .write_report(output)
        .with_context(|| format!("write report {}", output.display()))
}

/// Question and block counts per type, in type order, skipping absent types.
pub fn question_summaries(questions: &[Question]) -> Vec<QuestionTypeSummary> {
    QuestionType::ALL
        .iter()
        .filter_map(|question_type| {
            let matching: Vec<&Question> = questions
                .iter()
                .filter(|q| q.question_type() == *question_type)
                .collect();
            if matching.is_empty() {
                return None;
            }
            Some(QuestionTypeSummary {
                question_type: *question_type,
                questions: matching.len(),
                blocks: matching.iter().map(|q| q.block_ids().len()).sum(),
            })
        })
        .collect()
}
