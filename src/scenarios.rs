//! Demonstration suites registered by `tecco-demo`
//!
//! Each scenario registers the same suites in the same order on every
//! invocation, which the test processes rely on.

use std::env;

use tecco::{tecco_assert_eq, RegistryError, Runner};

use crate::cli::Scenario;

const GREETING_VAR: &str = "TECCO_DEMO_GREETING";

pub fn register(runner: &mut Runner, scenario: Scenario) -> Result<(), RegistryError> {
    match scenario {
        Scenario::Basic => basic(runner),
        Scenario::Failing => failing(runner),
        Scenario::Overflow => overflow(runner),
        Scenario::SetupFailure => setup_failure(runner),
        Scenario::CleanupFailure => cleanup_failure(runner),
        Scenario::Signal => signal(runner),
    }
}

fn basic(runner: &mut Runner) -> Result<(), RegistryError> {
    let math = runner.add_suite("math")?;
    math.add_test("add", add)?;
    math.add_test("multiline", multiline)?;

    // Setup runs in the runner; test processes inherit its environment.
    let strings = runner.add_suite("strings")?;
    strings
        .with_setup(|| {
            env::set_var(GREETING_VAR, "hello");
            0
        })
        .with_cleanup(|| {
            env::remove_var(GREETING_VAR);
            0
        });
    strings.add_test("concat", concat)?;
    strings.add_test("greeting", greeting)?;
    Ok(())
}

fn failing(runner: &mut Runner) -> Result<(), RegistryError> {
    let math = runner.add_suite("math")?;
    math.add_test("add", add)?;
    math.add_test("div_by_zero", div_by_zero)?;
    math.add_test("mismatch", mismatch)?;
    math.add_test("panics", || panic!("deliberate panic"))?;
    Ok(())
}

fn overflow(runner: &mut Runner) -> Result<(), RegistryError> {
    let io = runner.add_suite("io")?;
    io.add_test("echo", add)?;
    io.add_test("flood", || {
        print!("{}", "x".repeat(70_000));
        0
    })?;
    io.add_test("after", add)?;
    Ok(())
}

fn setup_failure(runner: &mut Runner) -> Result<(), RegistryError> {
    runner.add_suite("prep")?.add_test("add", add)?;
    runner
        .add_suite("io")?
        .with_setup(|| 1)
        .add_test("read", add)?;
    runner.add_suite("later")?.add_test("add", add)?;
    Ok(())
}

fn cleanup_failure(runner: &mut Runner) -> Result<(), RegistryError> {
    runner
        .add_suite("db")?
        .with_cleanup(|| 3)
        .add_test("insert", add)?;
    runner.add_suite("later")?.add_test("add", add)?;
    Ok(())
}

fn signal(runner: &mut Runner) -> Result<(), RegistryError> {
    let crash = runner.add_suite("crash")?;
    crash.add_test("abort", || std::process::abort())?;
    crash.add_test("survivor", add)?;
    Ok(())
}

fn add() -> i32 {
    print!("{}", 2 + 2);
    0
}

fn multiline() -> i32 {
    println!("first");
    println!("second");
    eprintln!("note");
    0
}

fn concat() -> i32 {
    let joined = format!("{}{}", "tec", "co");
    tecco_assert_eq!("tecco", joined.as_str());
    0
}

fn greeting() -> i32 {
    match env::var(GREETING_VAR) {
        Ok(value) if value == "hello" => 0,
        _ => 1,
    }
}

fn div_by_zero() -> i32 {
    match 1i32.checked_div(0) {
        Some(_) => 0,
        None => {
            eprintln!("division by zero");
            1
        }
    }
}

fn mismatch() -> i32 {
    tecco_assert_eq!(5, 2 + 2);
    0
}
