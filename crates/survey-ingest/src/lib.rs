//! Loading of the two survey inputs: the respondent export and its layout.
//!
//! Both files are read into Polars `DataFrame`s, from CSV through the Polars
//! reader or from Excel workbooks through calamine. The layout frame is then
//! parsed into typed [`LayoutRecord`](survey_model::LayoutRecord)s.

pub mod layout;
pub mod table;
pub mod workbook;

pub use layout::{layout_records, load_layout};
pub use table::{SourceFormat, load_responses, load_table, require_columns};
pub use workbook::read_workbook;
