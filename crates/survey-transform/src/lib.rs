//! Survey cleaning.
//!
//! This crate turns a raw respondent export and its layout into the cleaned
//! pair the tabulator consumes:
//!
//! - **filter**: keep completed responses, drop empty and non-analytic columns,
//!   restrict the layout to supported question types
//! - **buckets**: derive top/middle/bottom variables for scaled grids and sliders
//! - **scale_report**: which question groups matched each scale
//! - **cleaner**: the stages chained into one immutable pipeline

pub mod buckets;
pub mod cleaner;
pub mod filter;
pub mod options;
pub mod scale_report;

pub use buckets::{Derivation, DerivedVariable, derive_grid_buckets, derive_slider_buckets};
pub use cleaner::{CleanedSurvey, Cleaner};
pub use options::CleanOptions;
pub use scale_report::ScaleReport;
