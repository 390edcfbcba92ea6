//! Service Kit
//!
//! The three stages of an analysis run and the pipeline that chains them.

mod analyst;
mod report_writer;
mod pipeline;

pub use analyst::Analyst;
pub use report_writer::{PersistedReport, ReportWriter};
pub use pipeline::{Pipeline, PipelineOutcome};
