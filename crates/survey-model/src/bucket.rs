//! Scale buckets: three-way top/middle/bottom collapses of scaled answers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal code of a derived bucket (1 = top, 2 = middle, 3 = bottom).
pub type BucketCode = i64;

pub const TOP: BucketCode = 1;
pub const MIDDLE: BucketCode = 2;
pub const BOTTOM: BucketCode = 3;

/// The supported scale classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScaleBucket {
    /// 5-point grid: Top 2 / Middle / Bottom 2.
    Likert5,
    /// 7-point grid: Top 2 / Middle 3 / Bottom 2.
    Likert7,
    /// 11-point grid: Top 3 / Middle 5 / Bottom 3.
    Likert11,
    /// 0-100 slider: quartile cut at 25 and 75.
    Slider,
}

impl ScaleBucket {
    pub const ALL: [ScaleBucket; 4] = [
        ScaleBucket::Likert5,
        ScaleBucket::Likert7,
        ScaleBucket::Likert11,
        ScaleBucket::Slider,
    ];

    /// Grid scale for a variable offering `size` answer codes.
    pub fn for_grid_size(size: usize) -> Option<Self> {
        match size {
            5 => Some(ScaleBucket::Likert5),
            7 => Some(ScaleBucket::Likert7),
            11 => Some(ScaleBucket::Likert11),
            _ => None,
        }
    }

    /// Number of points on the scale.
    pub fn scale(&self) -> u32 {
        match self {
            ScaleBucket::Likert5 => 5,
            ScaleBucket::Likert7 => 7,
            ScaleBucket::Likert11 => 11,
            ScaleBucket::Slider => 100,
        }
    }

    /// Suffix appended to the source Variable ID to name the derived variable.
    pub fn suffix(&self) -> &'static str {
        match self {
            ScaleBucket::Slider => "_slider",
            _ => "_likert",
        }
    }

    /// Derived Variable ID for a source variable.
    pub fn derived_id(&self, variable_id: &str) -> String {
        format!("{variable_id}{}", self.suffix())
    }

    /// Whether the grid's third answer label must be numeric for the bucket
    /// to apply (7- and 11-point layouts also describe free-text grids).
    pub fn requires_numeric_label(&self) -> bool {
        matches!(self, ScaleBucket::Likert7 | ScaleBucket::Likert11)
    }

    /// Answer labels for codes 1, 2, 3.
    pub fn labels(&self) -> [&'static str; 3] {
        match self {
            ScaleBucket::Likert5 => ["Top 2 (5,4)", "Middle (3)", "Bottom 2 (2,1)"],
            ScaleBucket::Likert7 => ["Top 2 (7,6)", "Middle 3 (5,4,3)", "Bottom 2 (2,1)"],
            ScaleBucket::Likert11 => [
                "Top 3 (11,10,9)",
                "Middle 5 (8,7,6,5,4)",
                "Bottom 3 (3,2,1)",
            ],
            ScaleBucket::Slider => [
                "Top quartile (>=75)",
                "Middle (>25 and <75)",
                "Bottom quartile (<=25)",
            ],
        }
    }

    /// Bucket a raw answer. Values that fall between the cut points (e.g. 2.5
    /// on a 5-point scale) get no bucket.
    pub fn classify(&self, value: f64) -> Option<BucketCode> {
        match self {
            ScaleBucket::Likert5 => {
                if value <= 2.0 {
                    Some(BOTTOM)
                } else if value == 3.0 {
                    Some(MIDDLE)
                } else if value >= 4.0 {
                    Some(TOP)
                } else {
                    None
                }
            }
            ScaleBucket::Likert7 => band(value, 2.0, 3.0, 6.0),
            ScaleBucket::Likert11 => band(value, 3.0, 4.0, 9.0),
            ScaleBucket::Slider => {
                if value <= 25.0 {
                    Some(BOTTOM)
                } else if value >= 75.0 {
                    Some(TOP)
                } else {
                    Some(MIDDLE)
                }
            }
        }
    }

    /// Heading used when reporting which groups matched this scale.
    pub fn report_heading(&self) -> &'static str {
        match self {
            ScaleBucket::Likert5 => "5-scale grid questions",
            ScaleBucket::Likert7 => "7-scale likert questions",
            ScaleBucket::Likert11 => "11-scale likert questions",
            ScaleBucket::Slider => "100-scale slider questions",
        }
    }
}

fn band(value: f64, bottom_max: f64, middle_min: f64, top_min: f64) -> Option<BucketCode> {
    if value <= bottom_max {
        Some(BOTTOM)
    } else if value >= top_min {
        Some(TOP)
    } else if value >= middle_min {
        Some(MIDDLE)
    } else {
        None
    }
}

impl fmt::Display for ScaleBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-point{}", self.scale(), self.suffix())
    }
}
