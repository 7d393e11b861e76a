//! Error types
//!
//! Registration and execution failures. A test returning non-zero is not an
//! error; it is recorded on the [`Test`](crate::Test) as data.

use std::io;
use thiserror::Error;

/// Registry errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to allocate storage for {0}")]
    Allocation(String),
}

/// Failures of the isolation and capture machinery
///
/// Any of these aborts the current suite and, transitively, the whole run.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("{test}: failed to spawn test process: {source}")]
    Spawn {
        test: String,
        #[source]
        source: io::Error,
    },

    #[error("{test}: test process has no {stream} pipe")]
    Pipe { test: String, stream: &'static str },

    #[error("{test}: failed to wait for test process: {source}")]
    Wait {
        test: String,
        #[source]
        source: io::Error,
    },

    #[error("{test}: failed to read captured output: {source}")]
    Capture {
        test: String,
        #[source]
        source: io::Error,
    },

    #[error("{test}: test output exceeded {capacity} bytes")]
    Overflow { test: String, capacity: usize },

    #[error("{test}: failed to allocate capture buffer")]
    Allocation { test: String },

    #[error("suite {suite}: setup returned {code}")]
    Setup { suite: String, code: i32 },

    #[error("suite {suite}: cleanup returned {code}")]
    Cleanup { suite: String, code: i32 },
}

impl ExecutionError {
    /// Name of the test or suite the error belongs to
    pub fn subject(&self) -> &str {
        match self {
            ExecutionError::Spawn { test, .. }
            | ExecutionError::Pipe { test, .. }
            | ExecutionError::Wait { test, .. }
            | ExecutionError::Capture { test, .. }
            | ExecutionError::Overflow { test, .. }
            | ExecutionError::Allocation { test } => test,
            ExecutionError::Setup { suite, .. } | ExecutionError::Cleanup { suite, .. } => suite,
        }
    }
}
