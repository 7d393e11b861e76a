//! Registry data model
//!
//! Runners own suites, suites own tests. The executor fills in each test's
//! captured output and result in place.

mod registry;
mod test_result;

pub use registry::{RunSummary, Runner, Suite};
pub use test_result::{Test, TestFn, TestId, TestOutcome};
