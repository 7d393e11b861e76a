//! Child side of the self re-execution protocol

use std::env;
use std::io::{self, Write};

use crate::models::{Runner, Test, TestId};

/// Environment variable selecting the test a child process runs
pub const CHILD_TEST_ENV: &str = "TECCO_CHILD_TEST";

/// Exit status of a child that cannot find its selected test
pub const UNKNOWN_TEST_STATUS: i32 = 255;

/// True when this process was spawned to run a single test
pub fn is_child_process() -> bool {
    env::var_os(CHILD_TEST_ENV).is_some()
}

pub(crate) fn requested_test() -> Option<String> {
    env::var(CHILD_TEST_ENV).ok()
}

fn resolve<'a>(runner: &'a Runner, selector: &str) -> Result<&'a Test, String> {
    let id: TestId = selector.parse()?;
    runner
        .test(id)
        .ok_or_else(|| format!("no test registered at {id}"))
}

/// Run the selected test in this process and exit with its status
pub(crate) fn run_selected(runner: &Runner, selector: &str) -> ! {
    let code = match resolve(runner, selector) {
        Ok(test) => test.invoke(),
        Err(e) => {
            eprintln!("tecco: {e}");
            UNKNOWN_TEST_STATUS
        }
    };

    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
    std::process::exit(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> Runner {
        let mut runner = Runner::new();
        let suite = runner.add_suite("math").unwrap();
        suite.add_test("add", || 0).unwrap();
        suite.add_test("div_by_zero", || 1).unwrap();
        runner
    }

    #[test]
    fn test_resolve_selected_test() {
        let runner = runner();
        let test = resolve(&runner, "0:1").unwrap();
        assert_eq!(test.name(), "div_by_zero");
        assert_eq!(test.invoke(), 1);
    }

    #[test]
    fn test_resolve_unknown_test() {
        let runner = runner();
        assert_eq!(
            resolve(&runner, "3:0").unwrap_err(),
            "no test registered at 3:0"
        );
        assert!(resolve(&runner, "garbage").is_err());
    }
}
