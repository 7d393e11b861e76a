//! Output formatting module
//!
//! Renders the final state of a runner as a human-readable report.

mod formatter;

pub use formatter::{ReportFlags, ReportFormatter};
