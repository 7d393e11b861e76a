//! Suite and runner registry
//!
//! Suites and tests keep their registration order; nothing here ever
//! reorders them.

use std::fmt;

use crate::error::RegistryError;
use crate::models::{Test, TestFn, TestId, TestOutcome};

/// Named group of tests sharing optional setup and cleanup hooks
pub struct Suite {
    name: String,
    tests: Vec<Test>,
    setup: Option<TestFn>,
    cleanup: Option<TestFn>,
    result: Option<i32>,
}

impl Suite {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
            setup: None,
            cleanup: None,
            result: None,
        }
    }

    /// Hook run once in the runner process before any test of the suite
    pub fn with_setup(&mut self, setup: impl Fn() -> i32 + 'static) -> &mut Self {
        self.setup = Some(Box::new(setup));
        self
    }

    /// Hook run once after the tests; its status becomes the suite result
    pub fn with_cleanup(&mut self, cleanup: impl Fn() -> i32 + 'static) -> &mut Self {
        self.cleanup = Some(Box::new(cleanup));
        self
    }

    /// Append a test, keeping previously registered tests on failure
    pub fn add_test(
        &mut self,
        name: impl Into<String>,
        func: impl Fn() -> i32 + 'static,
    ) -> Result<&mut Test, RegistryError> {
        let name = name.into();
        self.tests
            .try_reserve(1)
            .map_err(|_| RegistryError::Allocation(format!("test {}:{}", self.name, name)))?;

        let index = self.tests.len();
        self.tests.push(Test::new(name, Box::new(func)));
        Ok(&mut self.tests[index])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    pub(crate) fn tests_mut(&mut self) -> &mut [Test] {
        &mut self.tests
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn has_setup(&self) -> bool {
        self.setup.is_some()
    }

    pub fn has_cleanup(&self) -> bool {
        self.cleanup.is_some()
    }

    /// Status returned by the cleanup hook, `None` if absent or not run
    pub fn result(&self) -> Option<i32> {
        self.result
    }

    pub(crate) fn run_setup(&self) -> Option<i32> {
        self.setup.as_ref().map(|setup| setup())
    }

    pub(crate) fn run_cleanup(&mut self) -> Option<i32> {
        let code = self.cleanup.as_ref().map(|cleanup| cleanup());
        self.result = code;
        code
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("tests", &self.tests)
            .field("setup", &self.setup.is_some())
            .field("cleanup", &self.cleanup.is_some())
            .field("result", &self.result)
            .finish()
    }
}

/// Ordered collection of suites for one test session
#[derive(Debug, Default)]
pub struct Runner {
    suites: Vec<Suite>,
}

impl Runner {
    /// Create an empty runner
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a suite, keeping previously registered suites on failure
    pub fn add_suite(&mut self, name: impl Into<String>) -> Result<&mut Suite, RegistryError> {
        let name = name.into();
        self.suites
            .try_reserve(1)
            .map_err(|_| RegistryError::Allocation(format!("suite {name}")))?;

        let index = self.suites.len();
        self.suites.push(Suite::new(name));
        Ok(&mut self.suites[index])
    }

    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    pub(crate) fn suites_mut(&mut self) -> &mut [Suite] {
        &mut self.suites
    }

    pub fn suite_count(&self) -> usize {
        self.suites.len()
    }

    /// Total number of registered tests across all suites
    pub fn test_count(&self) -> usize {
        self.suites.iter().map(Suite::len).sum()
    }

    pub fn test(&self, id: TestId) -> Option<&Test> {
        self.suites.get(id.suite)?.tests.get(id.test)
    }

    /// Release every suite and test, leaving an empty registry
    pub fn reset(&mut self) {
        self.suites = Vec::new();
    }

    /// Iterate over all tests in registration order
    pub fn iter_tests(&self) -> impl Iterator<Item = (&Suite, &Test)> {
        self.suites
            .iter()
            .flat_map(|suite| suite.tests.iter().map(move |test| (suite, test)))
    }
}

/// Pass/fail counts over a runner's tests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub not_run: usize,
}

impl RunSummary {
    pub fn from_runner(runner: &Runner) -> Self {
        let mut summary = Self {
            total: runner.test_count(),
            ..Default::default()
        };

        for (_, test) in runner.iter_tests() {
            match test.outcome() {
                TestOutcome::Passed => summary.passed += 1,
                TestOutcome::Failed(_) => summary.failed += 1,
                TestOutcome::NotRun => summary.not_run += 1,
            }
        }

        summary
    }

    pub fn is_all_passed(&self) -> bool {
        self.passed == self.total
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} passed; {} failed", self.passed, self.failed)?;
        if self.not_run > 0 {
            write!(f, "; {} not run", self.not_run)?;
        }
        write!(f, ".")
    }
}
