//! Test entity and outcome types
//!
//! A [`Test`] couples a callable with the output captured from its single
//! isolated execution.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Zero-argument callable returning a status (0 = pass)
pub type TestFn = Box<dyn Fn() -> i32>;

/// Position of a test in the registry (suite index, test index)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TestId {
    pub suite: usize,
    pub test: usize,
}

impl TestId {
    pub fn new(suite: usize, test: usize) -> Self {
        Self { suite, test }
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.suite, self.test)
    }
}

impl FromStr for TestId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (suite, test) = s
            .split_once(':')
            .ok_or_else(|| format!("malformed test id: {s}"))?;
        let suite = suite
            .trim()
            .parse()
            .map_err(|_| format!("malformed suite index: {suite}"))?;
        let test = test
            .trim()
            .parse()
            .map_err(|_| format!("malformed test index: {test}"))?;
        Ok(Self { suite, test })
    }
}

/// Outcome of a test as seen by the reporter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    Failed(i32),
    NotRun,
}

impl TestOutcome {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestOutcome::Passed => "✓",
            TestOutcome::Failed(_) => "✗",
            TestOutcome::NotRun => "○",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TestOutcome::Passed)
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestOutcome::Passed => write!(f, "ok"),
            TestOutcome::Failed(_) => write!(f, "FAILED"),
            TestOutcome::NotRun => write!(f, "not run"),
        }
    }
}

/// A registered test and, once executed, its captured output
pub struct Test {
    name: String,
    func: TestFn,
    stdout: Option<Vec<u8>>,
    stderr: Option<Vec<u8>>,
    result: Option<i32>,
    duration: Duration,
}

impl Test {
    pub(crate) fn new(name: impl Into<String>, func: TestFn) -> Self {
        Self {
            name: name.into(),
            func,
            stdout: None,
            stderr: None,
            result: None,
            duration: Duration::ZERO,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Captured standard output, `None` if empty or not yet executed
    pub fn stdout(&self) -> Option<&[u8]> {
        self.stdout.as_deref()
    }

    /// Captured standard error, `None` if empty or not yet executed
    pub fn stderr(&self) -> Option<&[u8]> {
        self.stderr.as_deref()
    }

    /// Exit status of the test process, `None` until executed
    pub fn result(&self) -> Option<i32> {
        self.result
    }

    /// Wall time of the execution, zero until executed
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_executed(&self) -> bool {
        self.result.is_some()
    }

    pub fn outcome(&self) -> TestOutcome {
        match self.result {
            None => TestOutcome::NotRun,
            Some(0) => TestOutcome::Passed,
            Some(code) => TestOutcome::Failed(code),
        }
    }

    /// Call the test body in the current process
    pub(crate) fn invoke(&self) -> i32 {
        (self.func)()
    }

    /// Store the result of the single execution
    pub(crate) fn record(
        &mut self,
        result: i32,
        stdout: Option<Vec<u8>>,
        stderr: Option<Vec<u8>>,
        duration: Duration,
    ) {
        self.result = Some(result);
        self.stdout = stdout;
        self.stderr = stderr;
        self.duration = duration;
    }
}

impl fmt::Debug for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Test")
            .field("name", &self.name)
            .field("stdout", &self.stdout.as_ref().map(Vec::len))
            .field("stderr", &self.stderr.as_ref().map(Vec::len))
            .field("result", &self.result)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.outcome().symbol(), self.name)?;
        if let Some(code) = self.result.filter(|c| *c != 0) {
            write!(f, " (exit {code})")?;
        }
        Ok(())
    }
}
