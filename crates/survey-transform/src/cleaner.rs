//! The cleaning pipeline.
//!
//! Stages run in a fixed order, each taking the previous frame and layout and
//! returning new ones:
//!
//! 1. Keep completed responses
//! 2. Drop empty columns, then the denylisted non-analytic columns
//! 3. Restrict the layout to present variables of supported types
//! 4. Derive grid (`_likert`) buckets
//! 5. Derive slider (`_slider`) buckets
//! 6. Sort the layout

use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use survey_model::{Layout, LayoutRecord, Result};

use crate::buckets::{DerivedVariable, derive_grid_buckets, derive_slider_buckets};
use crate::filter::{drop_empty_columns, drop_listed_columns, filter_completes, restrict_layout};
use crate::options::CleanOptions;
use crate::scale_report::ScaleReport;

/// A cleaned response table with its matching layout.
#[derive(Debug, Clone)]
pub struct CleanedSurvey {
    pub data: DataFrame,
    pub layout: Layout,
    pub scale_report: ScaleReport,
    pub derived: Vec<DerivedVariable>,
}

impl CleanedSurvey {
    /// Number of respondents kept.
    pub fn respondents(&self) -> usize {
        self.data.height()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    options: CleanOptions,
}

impl Cleaner {
    pub fn new(options: CleanOptions) -> Self {
        Self { options }
    }

    /// Clean a raw export against its layout records.
    pub fn clean(&self, data: &DataFrame, layout: &[LayoutRecord]) -> Result<CleanedSurvey> {
        let span = info_span!("clean", rows = data.height(), columns = data.width());
        let _guard = span.enter();
        let start = Instant::now();

        let filtered = info_span!("filter").in_scope(|| -> Result<DataFrame> {
            let completes = filter_completes(data, &self.options)?;
            let pruned = drop_empty_columns(&completes)?;
            let pruned = drop_listed_columns(&pruned, &self.options)?;
            debug!(
                input_rows = data.height(),
                output_rows = pruned.height(),
                input_columns = data.width(),
                output_columns = pruned.width(),
                "filter complete"
            );
            Ok(pruned)
        })?;

        let restricted = restrict_layout(layout, &filtered);

        let mut scale_report = ScaleReport::default();
        let (grid, sliders) = info_span!("buckets").in_scope(|| -> Result<_> {
            let grid = derive_grid_buckets(&filtered, &restricted, &mut scale_report)?;
            let sliders = derive_slider_buckets(
                &grid.data,
                &grid.layout,
                &self.options.slider_marker,
                &mut scale_report,
            )?;
            Ok((grid.derived, sliders))
        })?;

        for line in scale_report.lines() {
            info!("{line}");
        }

        let mut derived = grid;
        derived.extend(sliders.derived);
        let cleaned = CleanedSurvey {
            data: sliders.data,
            layout: sliders.layout.sorted(),
            scale_report,
            derived,
        };
        info!(
            respondents = cleaned.data.height(),
            variables = cleaned.data.width(),
            layout_rows = cleaned.layout.len(),
            derived = cleaned.derived.len(),
            duration_ms = start.elapsed().as_millis(),
            "cleaning complete"
        );
        Ok(cleaned)
    }
}
