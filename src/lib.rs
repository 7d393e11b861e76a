//! tecco - minimal unit test runner with per-test process isolation
//!
//! Tests are grouped into suites with optional setup and cleanup hooks.
//! Every test body runs in its own process so a crash, an early exit or a
//! flood of output cannot disturb the runner. Captured stdout and stderr are
//! kept on each test and rendered in a pass/fail report.
//!
//! ## Usage
//!
//! ```no_run
//! use tecco::{ReportFlags, ReportFormatter, Runner};
//!
//! fn add() -> i32 {
//!     print!("{}", 2 + 2);
//!     0
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut runner = Runner::new();
//!     runner.add_suite("math")?.add_test("add", add)?;
//!
//!     // In a test process this call runs the selected test and exits.
//!     let outcome = runner.run().await;
//!
//!     ReportFormatter::new(ReportFlags::VERBOSE).print(&runner)?;
//!     outcome?;
//!     Ok(())
//! }
//! ```
//!
//! The test process is the same executable started again with the same
//! arguments, so registration must be deterministic and happen before
//! [`Runner::run`].

mod assert;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod output;
pub mod utils;

pub use error::{ExecutionError, RegistryError};
pub use executor::{CaptureArena, Executor, Launcher, SelfExec, CAPTURE_CAPACITY};
pub use models::{RunSummary, Runner, Suite, Test, TestId, TestOutcome};
pub use output::{ReportFlags, ReportFormatter};
