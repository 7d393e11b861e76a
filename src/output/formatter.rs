//! Report formatter for executed runners
//!
//! Produces the per-test status lines, the captured output blocks and the
//! pass/fail summary.

use std::io::{self, Write};

use bitflags::bitflags;

use crate::models::{RunSummary, Runner, Suite, Test, TestOutcome};

const GREEN: &str = "\x1b[0;32m";
const RED: &str = "\x1b[0;31m";
const RESET: &str = "\x1b[0m";

bitflags! {
    /// Report options, freely combinable
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ReportFlags: u32 {
        /// Do not print captured output of failing tests
        const SUPPRESS_FAILURE_OUTPUT = 1;
        /// Do not print captured output of passing tests
        const SUPPRESS_SUCCESS_OUTPUT = 2;
        /// Suite-grouped tree layout
        const VERBOSE = 4;
        /// ANSI colour around status markers
        const COLOURS = 8;
    }
}

/// Result formatter
pub struct ReportFormatter {
    flags: ReportFlags,
}

impl ReportFormatter {
    pub fn new(flags: ReportFlags) -> Self {
        Self { flags }
    }

    pub fn flags(&self) -> ReportFlags {
        self.flags
    }

    fn verbose(&self) -> bool {
        self.flags.contains(ReportFlags::VERBOSE)
    }

    fn paint(&self, text: &str, colour: &str) -> String {
        if self.flags.contains(ReportFlags::COLOURS) {
            format!("{colour}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn outcome_colour(outcome: TestOutcome) -> &'static str {
        if outcome.is_success() {
            GREEN
        } else {
            RED
        }
    }

    /// Format the complete report
    pub fn format(&self, runner: &Runner) -> String {
        let mut output = format!("running {} tests\n", runner.test_count());

        for suite in runner.suites() {
            output.push_str(&self.format_suite(suite));
        }

        for (suite, test) in runner.iter_tests() {
            if let Some(block) = self.format_output_block(suite, test) {
                output.push_str(&block);
            }
        }

        output.push_str(&self.format_summary(&RunSummary::from_runner(runner)));
        output
    }

    /// Write the complete report to `writer`
    pub fn write_to(&self, runner: &Runner, writer: &mut impl Write) -> io::Result<()> {
        writer.write_all(self.format(runner).as_bytes())?;
        writer.flush()
    }

    /// Print the complete report to stdout
    pub fn print(&self, runner: &Runner) -> io::Result<()> {
        self.write_to(runner, &mut io::stdout().lock())
    }

    fn format_suite(&self, suite: &Suite) -> String {
        let mut output = String::new();

        if self.verbose() {
            output.push_str(&format!("\n{}:\n", suite.name()));
        }
        for test in suite.tests() {
            output.push_str(&self.format_status_line(suite, test));
            output.push('\n');
        }

        output
    }

    /// Status line of a single test, without trailing newline
    pub fn format_status_line(&self, suite: &Suite, test: &Test) -> String {
        let outcome = test.outcome();
        let colour = Self::outcome_colour(outcome);

        if self.verbose() {
            let marker = format!("{} {}", outcome.symbol(), test.name());
            format!("\t{}", self.paint(&marker, colour))
        } else {
            format!(
                "{}:{} ... {}",
                suite.name(),
                test.name(),
                self.paint(&outcome.to_string(), colour)
            )
        }
    }

    fn format_output_block(&self, suite: &Suite, test: &Test) -> Option<String> {
        let outcome = test.outcome();
        let suppressed = match outcome {
            TestOutcome::NotRun => return None,
            TestOutcome::Passed => self.flags.contains(ReportFlags::SUPPRESS_SUCCESS_OUTPUT),
            TestOutcome::Failed(_) => self.flags.contains(ReportFlags::SUPPRESS_FAILURE_OUTPUT),
        };
        if suppressed || (outcome.is_success() && test.stdout().is_none()) {
            return None;
        }

        let mut output = format!(
            "\n=============== {}:{} ===============\n",
            suite.name(),
            test.name()
        );
        if self.verbose() {
            if let Some(code) = test.result() {
                output.push_str(&format!("exit code: {code}\n"));
            }
        }
        output.push_str("stdout:\n");
        output.push_str(&indent_capture(test.stdout(), 1));
        output.push_str("stderr:\n");
        output.push_str(&indent_capture(test.stderr(), 1));

        Some(output)
    }

    /// Format the pass/fail summary
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        if !self.verbose() {
            return format!("\nSUMMARY: {summary}\n");
        }

        let mut output = String::from("\nSUMMARY:\n");
        output.push_str(&format!(
            "  {}\n",
            self.paint(&format!("✓ {} passed", summary.passed), GREEN)
        ));
        output.push_str(&format!(
            "  {}\n",
            self.paint(&format!("✗ {} failed", summary.failed), RED)
        ));
        if summary.not_run > 0 {
            output.push_str(&format!("  ○ {} not run\n", summary.not_run));
        }
        output
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(ReportFlags::empty())
    }
}

/// Indent captured bytes by `depth` tabs, re-indenting embedded lines
fn indent_capture(capture: Option<&[u8]>, depth: usize) -> String {
    let prefix = "\t".repeat(depth);
    let text = match capture {
        Some(bytes) => String::from_utf8_lossy(bytes),
        None => return format!("{prefix}(no output)\n"),
    };

    let mut output = String::new();
    for line in text.lines() {
        output.push_str(&prefix);
        output.push_str(line);
        output.push('\n');
    }
    output
}
