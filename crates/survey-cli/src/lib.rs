//! CLI library components for the survey tabulator.

pub mod logging;
pub mod pipeline;
pub mod types;
