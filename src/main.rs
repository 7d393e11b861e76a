//! tecco-demo - runs demonstration suites through the tecco engine
//!
//! ## Usage
//!
//! ```bash
//! # Passing suites, flat report
//! tecco-demo
//!
//! # Failing tests, tree layout with colours
//! tecco-demo --scenario failing --verbose --colour
//!
//! # Output overflow aborts the run
//! tecco-demo --scenario overflow
//! ```
//!
//! Exit status: 0 when every test passed, 1 when some test failed, 2 when
//! the run was aborted by an execution error.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

mod cli;
mod scenarios;

use cli::Args;
use tecco::config::{print_env_help, EnvConfig, ReportConfig};
use tecco::utils::{init_logger, LogLevel};
use tecco::{ReportFormatter, RunSummary, Runner};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    if args.env_help {
        print_env_help();
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&args)?;
    init_logger(config.log_level());
    debug!("Report configuration: {:?}", config);

    let mut runner = Runner::new();
    scenarios::register(&mut runner, args.scenario).context("Failed to register tests")?;
    info!(
        "Scenario {:?}: {} suites, {} tests",
        args.scenario,
        runner.suite_count(),
        runner.test_count()
    );

    let outcome = runner.run().await;

    ReportFormatter::new(config.flags())
        .print(&runner)
        .context("Failed to write report")?;

    let summary = RunSummary::from_runner(&runner);
    Ok(match outcome {
        Err(_) => ExitCode::from(2),
        Ok(()) if summary.is_all_passed() => ExitCode::SUCCESS,
        Ok(()) => ExitCode::from(1),
    })
}

/// Config file, then TECCO_* variables, then command-line flags
fn load_config(args: &Args) -> Result<ReportConfig> {
    let env = EnvConfig::load();

    let path = args
        .config
        .clone()
        .or_else(|| env.config_file.clone().map(Into::into));
    let mut config = match path {
        Some(path) => ReportConfig::load(&path)?,
        None => ReportConfig::default(),
    };
    config.apply_env(&env);

    config.verbose |= args.verbose;
    config.colours |= args.colour;
    config.suppress_success_output |= args.no_output_success;
    config.suppress_failure_output |= args.no_output_failure;

    if let Some(level) = &args.log_level {
        if LogLevel::from_str(level).is_none() {
            anyhow::bail!("Unknown log level: {}", level);
        }
        config.log_level = level.clone();
    }

    Ok(config)
}
