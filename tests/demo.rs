//! End-to-end runs of `tecco-demo`, where every test body executes in a
//! re-invoked copy of the binary.

use std::process::{Command, Output};

const TECCO_VARS: &[&str] = &[
    "TECCO_CHILD_TEST",
    "TECCO_VERBOSE",
    "TECCO_COLOUR",
    "TECCO_NO_OUTPUT_SUCCESS",
    "TECCO_NO_OUTPUT_FAILURE",
    "TECCO_LOG",
    "TECCO_CONFIG",
];

fn demo_command(args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tecco-demo"));
    command.args(args);
    for var in TECCO_VARS {
        command.env_remove(var);
    }
    command
}

fn demo(args: &[&str]) -> Output {
    demo_command(args).output().expect("failed to run tecco-demo")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn basic_scenario_passes() {
    let output = demo(&[]);
    let report = stdout(&output);

    assert_eq!(output.status.code(), Some(0), "{report}");
    assert!(report.starts_with("running 4 tests\n"));
    assert!(report.contains(
        "math:add ... ok\nmath:multiline ... ok\nstrings:concat ... ok\nstrings:greeting ... ok\n"
    ));
    assert!(report.contains(
        "\n=============== math:add ===============\nstdout:\n\t4\nstderr:\n\t(no output)\n"
    ));
    assert!(report.contains("stdout:\n\tfirst\n\tsecond\nstderr:\n\tnote\n"));
    assert!(report.ends_with("\nSUMMARY: 4 passed; 0 failed.\n"));
}

#[test]
fn failing_scenario_records_logical_failures() {
    let output = demo(&["--scenario", "failing"]);
    let report = stdout(&output);

    assert_eq!(output.status.code(), Some(1), "{report}");
    assert!(report.contains("math:add ... ok\n"));
    assert!(report.contains("math:div_by_zero ... FAILED\n"));
    assert!(report.contains("math:mismatch ... FAILED\n"));
    assert!(report.contains("math:panics ... FAILED\n"));
    assert!(report.contains("stderr:\n\tdivision by zero\n"));
    assert!(report.contains("\tAssertion failed\n\t╰ EXPECTED\t5\n\t╰ GOT     \t2 + 2\n"));
    assert!(report.contains("deliberate panic"));
    assert!(report.ends_with("SUMMARY: 1 passed; 3 failed.\n"));
}

#[test]
fn verbose_colour_layout() {
    let output = demo(&["--scenario", "failing", "--verbose", "--colour"]);
    let report = stdout(&output);

    assert!(report.contains("\nmath:\n\t\x1b[0;32m✓ add\x1b[0m\n\t\x1b[0;31m✗ div_by_zero\x1b[0m\n"));
    assert!(report.contains("exit code: 1\n"));
    assert!(report.contains("\x1b[0;32m✓ 1 passed\x1b[0m\n"));
    assert!(report.contains("\x1b[0;31m✗ 3 failed\x1b[0m\n"));
}

#[test]
fn failure_output_can_be_suppressed() {
    let output = demo(&["--scenario", "failing", "--no-output-failure"]);
    let report = stdout(&output);

    assert!(report.contains("=============== math:add ==============="));
    assert!(!report.contains("=============== math:div_by_zero ==============="));
    assert!(!report.contains("Assertion failed"));
}

#[test]
fn environment_enables_tree_layout() {
    let output = demo_command(&[])
        .env("TECCO_VERBOSE", "1")
        .output()
        .expect("failed to run tecco-demo");
    let report = stdout(&output);

    assert!(report.contains("\nmath:\n\t✓ add\n\t✓ multiline\n\nstrings:\n"));
    assert!(report.contains("\nSUMMARY:\n  ✓ 4 passed\n  ✗ 0 failed\n"));
}

#[test]
fn overflow_aborts_run() {
    let output = demo(&["--scenario", "overflow"]);
    let report = stdout(&output);

    assert_eq!(output.status.code(), Some(2), "{report}");
    assert!(stderr(&output).contains("io:flood: test output exceeded 65535 bytes"));
    assert!(report.contains("io:echo ... ok\nio:flood ... not run\nio:after ... not run\n"));
    assert!(!report.contains("=============== io:flood"));
    assert!(report.ends_with("SUMMARY: 1 passed; 0 failed; 2 not run.\n"));
}

#[test]
fn setup_failure_skips_suite_and_later_suites() {
    let output = demo(&["--scenario", "setup-failure"]);
    let report = stdout(&output);

    assert_eq!(output.status.code(), Some(2), "{report}");
    assert!(stderr(&output).contains("suite io: setup returned 1"));
    assert!(report.contains("prep:add ... ok\nio:read ... not run\nlater:add ... not run\n"));
}

#[test]
fn cleanup_failure_fails_suite() {
    let output = demo(&["--scenario", "cleanup-failure"]);
    let report = stdout(&output);

    assert_eq!(output.status.code(), Some(2), "{report}");
    assert!(stderr(&output).contains("suite db: cleanup returned 3"));
    assert!(report.contains("db:insert ... ok\nlater:add ... not run\n"));
}

#[cfg(unix)]
#[test]
fn signal_is_contained() {
    let output = demo(&["--scenario", "signal", "--verbose"]);
    let report = stdout(&output);

    assert_eq!(output.status.code(), Some(1), "{report}");
    assert!(report.contains("\t✗ abort\n\t✓ survivor\n"));
    assert!(report.contains("=============== crash:abort ===============\nexit code: 134\n"));
}

#[test]
fn unknown_child_selection_fails_test_process() {
    let output = demo_command(&[])
        .env("TECCO_CHILD_TEST", "9:9")
        .output()
        .expect("failed to run tecco-demo");

    assert_eq!(output.status.code(), Some(255));
    assert!(stderr(&output).contains("no test registered at 9:9"));
    assert!(output.stdout.is_empty());
}

#[test]
fn child_selection_runs_one_test() {
    let output = demo_command(&[])
        .env("TECCO_CHILD_TEST", "0:0")
        .output()
        .expect("failed to run tecco-demo");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "4");
}
