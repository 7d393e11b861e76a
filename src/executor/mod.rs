//! Test execution engine
//!
//! Runs each test in its own process, one at a time.

mod child;
mod process;
mod runner;

pub use child::{is_child_process, CHILD_TEST_ENV, UNKNOWN_TEST_STATUS};
pub use process::{
    CaptureArena, Executor, Launcher, SelfExec, CAPTURE_CAPACITY, SIGNAL_STATUS_BASE,
};
pub use runner::run_suite;
