//! Result aggregation and export
//!
//! One [`AnalysisResult`] per file, appended in processing order to a
//! [`BatchResultSet`] and serialized to CSV or JSON at the end of the run.

pub mod export;
mod result;

pub use export::{export_csv, export_json};
pub use result::{AnalysisResult, BatchResultSet, FIELD_NAMES};
