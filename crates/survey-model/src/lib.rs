pub mod bucket;
pub mod error;
pub mod layout;
pub mod segment;
pub mod summary;

pub use bucket::{BucketCode, ScaleBucket};
pub use error::{Result, SurveyError, TableKind};
pub use layout::{
    LAYOUT_COLUMNS, Layout, LayoutRecord, LayoutRow, LayoutValue, QuestionType, columns,
    distinct_variables,
};
pub use segment::SegmentKey;
pub use summary::{SummaryCell, SummaryRow, SummaryTable};
