//! Shared utilities for the survey tabulation crates.
//!
//! Response and layout tables travel through the workspace as Polars
//! `DataFrame`s whose cells may be numbers, text, or nulls depending on how the
//! source file was typed. The helpers here flatten those cells into the plain
//! values the cleaning and tabulation code reasons about.

pub mod polars;

pub use polars::{any_to_f64, any_to_string, column_numbers, format_numeric, is_missing, parse_f64};
