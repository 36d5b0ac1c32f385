//! Cross-tabulation of a cleaned survey and report serialization.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use survey_model::{Layout, Result, SegmentKey, SummaryTable, SurveyError};

use crate::question::{Question, Summarize};
use crate::segments::Segmentation;

/// One block of the written report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBlock<'a> {
    pub id: &'a str,
    pub label: &'a str,
}

/// Builds per-question summary tables for a cleaned survey, segmented by one
/// response field.
#[derive(Debug)]
pub struct Tabulator {
    data: DataFrame,
    questions: Vec<Question>,
    segments: Segmentation,
    summaries: BTreeMap<String, SummaryTable>,
}

impl Tabulator {
    /// Prepare a tabulator; fails when the segment field is not a response column.
    pub fn new(data: DataFrame, layout: &Layout, segment_field: &str) -> Result<Self> {
        let segments = Segmentation::discover(&data, segment_field)?;
        let questions: Vec<Question> = layout
            .question_ids()
            .into_iter()
            .filter_map(|id| Question::from_rows(id, &layout.question(id)))
            .collect();
        debug!(
            segment_field,
            segments = segments.len(),
            questions = questions.len(),
            "tabulator ready"
        );
        Ok(Self {
            data,
            questions,
            segments,
            summaries: BTreeMap::new(),
        })
    }

    pub fn segment_field(&self) -> &str {
        self.segments.field()
    }

    pub fn segments(&self) -> Vec<&SegmentKey> {
        self.segments.keys().collect()
    }

    /// Questions in layout order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Compute the summaries of one question.
    pub fn compute(&mut self, question_id: &str) -> Result<()> {
        let question = self
            .questions
            .iter()
            .find(|q| q.id() == question_id)
            .ok_or_else(|| SurveyError::UnknownQuestion {
                id: question_id.to_string(),
            })?;
        for table in question.summarize(&self.data, &self.segments)? {
            self.summaries.insert(table.id.clone(), table);
        }
        Ok(())
    }

    /// Compute every question's summaries; returns the number of tables.
    pub fn compute_all(&mut self) -> Result<usize> {
        let span = info_span!("tabulate", segment_field = %self.segments.field());
        let _guard = span.enter();
        let start = Instant::now();
        let mut summaries = BTreeMap::new();
        for question in &self.questions {
            for table in question.summarize(&self.data, &self.segments)? {
                summaries.insert(table.id.clone(), table);
            }
        }
        self.summaries = summaries;
        info!(
            questions = self.questions.len(),
            tables = self.summaries.len(),
            segments = self.segments.len(),
            duration_ms = start.elapsed().as_millis(),
            "tabulation complete"
        );
        Ok(self.summaries.len())
    }

    /// Summary table for a Question ID, or a Variable ID inside a grid.
    pub fn summary(&self, id: &str) -> Option<&SummaryTable> {
        self.summaries.get(id)
    }

    pub fn summaries(&self) -> &BTreeMap<String, SummaryTable> {
        &self.summaries
    }

    /// Report blocks in output order: Question IDs in layout row order, grid
    /// questions expanded to one block per item.
    pub fn blocks(&self) -> Vec<ReportBlock<'_>> {
        let mut blocks = Vec::new();
        for question in &self.questions {
            match question {
                Question::Grid(grid) => blocks.extend(grid.items.iter().map(|item| ReportBlock {
                    id: &item.id,
                    label: &item.label,
                })),
                other => blocks.push(ReportBlock {
                    id: other.id(),
                    label: other.label(),
                }),
            }
        }
        blocks
    }

    /// Write the report to `out`; returns the number of blocks written.
    pub fn write_to<W: Write>(&self, mut out: W) -> Result<usize> {
        let blocks = self.blocks();
        for block in &blocks {
            let table = self
                .summaries
                .get(block.id)
                .ok_or_else(|| SurveyError::NotComputed {
                    id: block.id.to_string(),
                })?;
            writeln!(out, "{},\"{}\"", block.id, block.label.replace('"', "\"\""))?;
            {
                let mut writer = csv::WriterBuilder::new()
                    .terminator(csv::Terminator::Any(b'\n'))
                    .from_writer(&mut out);
                for record in table.records() {
                    writer.write_record(&record)?;
                }
                writer.flush()?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        Ok(blocks.len())
    }

    /// Write the report file at `path`.
    pub fn write_report(&self, path: &Path) -> Result<usize> {
        let span = info_span!("write", path = %path.display());
        let _guard = span.enter();
        let file = File::create(path)?;
        let written = self.write_to(BufWriter::new(file))?;
        info!(blocks = written, "report written");
        Ok(written)
    }
}
