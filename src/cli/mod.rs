//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Run the bundled tecco demonstration suites
#[derive(Parser, Debug)]
#[command(name = "tecco-demo")]
#[command(version)]
#[command(about = "Run demonstration suites with per-test process isolation")]
#[command(long_about = None)]
pub struct Args {
    /// Which set of suites to register
    #[arg(short, long, value_enum, default_value_t = Scenario::Basic)]
    pub scenario: Scenario,

    /// Suite-grouped tree layout
    #[arg(short, long)]
    pub verbose: bool,

    /// Colour the status markers
    #[arg(short, long)]
    pub colour: bool,

    /// Hide captured output of passing tests
    #[arg(long)]
    pub no_output_success: bool,

    /// Hide captured output of failing tests
    #[arg(long)]
    pub no_output_failure: bool,

    /// Report configuration file (YAML or JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// List the TECCO_* environment variables and exit
    #[arg(long)]
    pub env_help: bool,
}

/// Demonstration suite sets
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Passing tests only
    Basic,
    /// Tests failing by status, assertion and panic
    Failing,
    /// A test whose output exceeds the capture capacity
    Overflow,
    /// A suite whose setup fails
    SetupFailure,
    /// A suite whose cleanup fails
    CleanupFailure,
    /// A test killed by a signal
    Signal,
}
