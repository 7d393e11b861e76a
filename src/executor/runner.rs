//! Suite and run sequencing
//!
//! Drives suites in registration order: setup, tests, cleanup. The first
//! execution error stops everything after it.

use std::io::{self, Write};

use tracing::{debug, error, info};

use super::child;
use super::process::{CaptureArena, Executor, Launcher};
use crate::error::ExecutionError;
use crate::models::{RunSummary, Runner, Suite, TestId};
use crate::utils::Timer;

impl Runner {
    /// Run every suite in isolated test processes
    ///
    /// In a process spawned for a single test this runs that test and exits
    /// instead of returning. An execution error is written to stderr before
    /// it is returned, through `tracing` when a subscriber is installed.
    pub async fn run(&mut self) -> Result<(), ExecutionError> {
        if let Some(selector) = child::requested_test() {
            child::run_selected(self, &selector);
        }

        self.run_with(&Executor::new()).await
    }

    /// Run every suite with a custom executor
    pub async fn run_with<L: Launcher>(
        &mut self,
        executor: &Executor<L>,
    ) -> Result<(), ExecutionError> {
        info!(
            "Running {} tests in {} suites",
            self.test_count(),
            self.suite_count()
        );

        let timer = Timer::start("test run");
        let mut arena = CaptureArena::new();

        for (index, suite) in self.suites_mut().iter_mut().enumerate() {
            arena = match run_suite(index, suite, executor, arena).await {
                Ok(arena) => arena,
                Err(err) => {
                    diagnose(&err, tracing::dispatcher::has_been_set(), &mut io::stderr());
                    return Err(err);
                }
            };
        }

        let elapsed = timer.stop();
        let summary = RunSummary::from_runner(self);
        info!(
            "Test run completed in {}ms - {}",
            elapsed.as_millis(),
            summary
        );

        Ok(())
    }
}

/// Report an execution error on the parent's own error stream
fn diagnose(err: &ExecutionError, subscribed: bool, stderr: &mut impl Write) {
    if subscribed {
        error!("{}", err);
    } else if let Err(e) = writeln!(stderr, "tecco: error: {}", err) {
        debug!("failed to write diagnostic: {}", e);
    }
}

/// Run one suite: setup, each test in order, then cleanup
///
/// A failing setup skips the tests and the cleanup. A test that merely fails
/// does not stop the suite; an execution error does, after cleanup has run.
pub async fn run_suite<L: Launcher>(
    index: usize,
    suite: &mut Suite,
    executor: &Executor<L>,
    mut arena: CaptureArena,
) -> Result<CaptureArena, ExecutionError> {
    let name = suite.name().to_string();

    if let Some(code) = suite.run_setup() {
        if code != 0 {
            return Err(ExecutionError::Setup { suite: name, code });
        }
    }

    debug!("Suite {}: {} tests", name, suite.len());

    for test_index in 0..suite.len() {
        let test = &mut suite.tests_mut()[test_index];
        let label = format!("{}:{}", name, test.name());
        match executor
            .execute(TestId::new(index, test_index), &label, test, arena)
            .await
        {
            Ok(returned) => {
                debug!("  {} in {}ms", test, test.duration().as_millis());
                arena = returned;
            }
            Err(err) => {
                suite.run_cleanup();
                return Err(err);
            }
        }
    }

    match suite.run_cleanup() {
        Some(code) if code != 0 => Err(ExecutionError::Cleanup { suite: name, code }),
        _ => Ok(arena),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Test, TestOutcome};
    use std::cell::Cell;
    use std::io;
    use std::rc::Rc;
    use tokio::process::Command;

    /// Maps test names to shell scripts standing in for the test body
    fn scripted() -> Executor<impl Fn(TestId, &Test) -> io::Result<Command>> {
        Executor::with_launcher(|_: TestId, test: &Test| -> io::Result<Command> {
            let script = match test.name() {
                "add" => "printf 4",
                "div_by_zero" => "exit 1",
                "flood" => "head -c 70000 /dev/zero",
                "noisy" => "echo warn >&2",
                _ => "true",
            };
            let mut command = Command::new("sh");
            command.arg("-c").arg(script);
            Ok(command)
        })
    }

    fn outcomes(runner: &Runner) -> Vec<(String, TestOutcome)> {
        runner
            .iter_tests()
            .map(|(suite, test)| (format!("{}:{}", suite.name(), test.name()), test.outcome()))
            .collect()
    }

    #[tokio::test]
    async fn test_passing_suite() {
        let mut runner = Runner::new();
        runner.add_suite("math").unwrap().add_test("add", || 0).unwrap();

        runner.run_with(&scripted()).await.unwrap();

        let test = &runner.suites()[0].tests()[0];
        assert_eq!(test.outcome(), TestOutcome::Passed);
        assert_eq!(test.stdout(), Some(&b"4"[..]));
        assert_eq!(RunSummary::from_runner(&runner).to_string(), "1 passed; 0 failed.");
    }

    #[tokio::test]
    async fn test_logical_failure_continues() {
        let mut runner = Runner::new();
        let math = runner.add_suite("math").unwrap();
        math.add_test("div_by_zero", || 1).unwrap();
        math.add_test("add", || 0).unwrap();
        runner.add_suite("io").unwrap().add_test("noisy", || 0).unwrap();

        runner.run_with(&scripted()).await.unwrap();

        assert_eq!(
            outcomes(&runner),
            vec![
                ("math:div_by_zero".to_string(), TestOutcome::Failed(1)),
                ("math:add".to_string(), TestOutcome::Passed),
                ("io:noisy".to_string(), TestOutcome::Passed),
            ]
        );
        let summary = RunSummary::from_runner(&runner);
        assert_eq!(summary.passed + summary.failed, summary.total);
    }

    #[tokio::test]
    async fn test_setup_failure_aborts_run() {
        let cleanups = Rc::new(Cell::new(0));
        let counter = cleanups.clone();

        let mut runner = Runner::new();
        runner
            .add_suite("io")
            .unwrap()
            .with_setup(|| 1)
            .with_cleanup(move || {
                counter.set(counter.get() + 1);
                0
            })
            .add_test("add", || 0)
            .unwrap();
        runner.add_suite("later").unwrap().add_test("add", || 0).unwrap();

        let err = runner.run_with(&scripted()).await.unwrap_err();

        assert!(matches!(err, ExecutionError::Setup { ref suite, code: 1 } if suite == "io"));
        assert!(runner.iter_tests().all(|(_, test)| !test.is_executed()));
        assert_eq!(cleanups.get(), 0);
    }

    #[tokio::test]
    async fn test_setup_runs_once() {
        let setups = Rc::new(Cell::new(0));
        let counter = setups.clone();

        let mut runner = Runner::new();
        let suite = runner.add_suite("math").unwrap();
        suite.with_setup(move || {
            counter.set(counter.get() + 1);
            0
        });
        suite.add_test("add", || 0).unwrap();
        suite.add_test("sub", || 0).unwrap();

        runner.run_with(&scripted()).await.unwrap();
        assert_eq!(setups.get(), 1);
    }

    #[tokio::test]
    async fn test_cleanup_result_fails_suite() {
        let mut runner = Runner::new();
        runner
            .add_suite("db")
            .unwrap()
            .with_cleanup(|| 3)
            .add_test("add", || 0)
            .unwrap();
        runner.add_suite("later").unwrap().add_test("add", || 0).unwrap();

        let err = runner.run_with(&scripted()).await.unwrap_err();

        assert!(matches!(err, ExecutionError::Cleanup { code: 3, .. }));
        assert_eq!(runner.suites()[0].result(), Some(3));
        assert_eq!(runner.suites()[0].tests()[0].outcome(), TestOutcome::Passed);
        assert!(!runner.suites()[1].tests()[0].is_executed());
    }

    #[tokio::test]
    async fn test_overflow_aborts_run() {
        let mut runner = Runner::new();
        let io = runner.add_suite("io").unwrap();
        io.with_cleanup(|| 0);
        io.add_test("flood", || 0).unwrap();
        io.add_test("add", || 0).unwrap();

        let err = runner.run_with(&scripted()).await.unwrap_err();

        assert_eq!(err.to_string(), "io:flood: test output exceeded 65535 bytes");
        assert_eq!(
            outcomes(&runner),
            vec![
                ("io:flood".to_string(), TestOutcome::NotRun),
                ("io:add".to_string(), TestOutcome::NotRun),
            ]
        );
        assert_eq!(runner.suites()[0].result(), Some(0));
    }

    #[test]
    fn test_diagnostic_without_subscriber() {
        let err = ExecutionError::Setup {
            suite: "io".to_string(),
            code: 1,
        };

        let mut stderr = Vec::new();
        diagnose(&err, false, &mut stderr);
        assert_eq!(
            String::from_utf8(stderr).unwrap(),
            "tecco: error: suite io: setup returned 1\n"
        );

        let mut stderr = Vec::new();
        diagnose(&err, true, &mut stderr);
        assert!(stderr.is_empty());
    }
}
