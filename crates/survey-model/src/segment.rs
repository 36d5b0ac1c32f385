//! Segment keys: distinct values of the segmentation field.

use std::cmp::Ordering;
use std::fmt;

use polars::prelude::AnyValue;
use survey_common::{any_to_string, format_numeric, is_missing};

/// One distinct value of the segmentation field.
///
/// Keys sort numerically when numeric and lexically when text, with numbers
/// first, so the report's column order is stable across runs.
#[derive(Debug, Clone)]
pub enum SegmentKey {
    Number(f64),
    Text(String),
}

impl SegmentKey {
    /// Builds a key from a response cell, or `None` for a missing value.
    pub fn from_any(value: &AnyValue<'_>) -> Option<Self> {
        if is_missing(value) {
            return None;
        }
        let key = match value {
            AnyValue::Int8(v) => SegmentKey::Number(f64::from(*v)),
            AnyValue::Int16(v) => SegmentKey::Number(f64::from(*v)),
            AnyValue::Int32(v) => SegmentKey::Number(f64::from(*v)),
            AnyValue::Int64(v) => SegmentKey::Number(*v as f64),
            AnyValue::UInt8(v) => SegmentKey::Number(f64::from(*v)),
            AnyValue::UInt16(v) => SegmentKey::Number(f64::from(*v)),
            AnyValue::UInt32(v) => SegmentKey::Number(f64::from(*v)),
            AnyValue::UInt64(v) => SegmentKey::Number(*v as f64),
            AnyValue::Float32(v) => SegmentKey::Number(f64::from(*v)),
            AnyValue::Float64(v) => SegmentKey::Number(*v),
            other => SegmentKey::Text(any_to_string(other.clone())),
        };
        Some(key)
    }

    /// Column name for a per-segment statistic, e.g. `3_total` or `complete%`.
    pub fn column(&self, suffix: &str) -> String {
        format!("{self}{suffix}")
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKey::Number(v) => f.write_str(&format_numeric(*v)),
            SegmentKey::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for SegmentKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SegmentKey {}

impl PartialOrd for SegmentKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SegmentKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SegmentKey::Number(a), SegmentKey::Number(b)) => a.total_cmp(b),
            (SegmentKey::Text(a), SegmentKey::Text(b)) => a.cmp(b),
            (SegmentKey::Number(_), SegmentKey::Text(_)) => Ordering::Less,
            (SegmentKey::Text(_), SegmentKey::Number(_)) => Ordering::Greater,
        }
    }
}
