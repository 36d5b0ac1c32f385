//! Survey tabulation.
//!
//! A [`Tabulator`] takes a cleaned response table and layout, groups
//! respondents by one segmentation field, and builds a summary table per
//! question (per item for grids). The summaries are written as one
//! comma-separated report with a block per question in layout order.

mod question;
mod segments;
mod tabulator;

pub use question::{
    Answer, GridQuestion, Item, MultiQuestion, NumericQuestion, Question, SingleQuestion,
    Summarize,
};
pub use segments::{Responses, Segmentation};
pub use tabulator::{ReportBlock, Tabulator};
