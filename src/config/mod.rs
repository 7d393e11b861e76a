//! Configuration module
//!
//! Report options loaded from a YAML or JSON file and overridden by
//! `TECCO_*` environment variables.

mod env;

pub use env::{print_env_help, EnvConfig};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::output::ReportFlags;
use crate::utils::LogLevel;

/// Report configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Suite-grouped tree layout
    pub verbose: bool,

    /// ANSI colour around status markers
    pub colours: bool,

    /// Hide captured output of passing tests
    pub suppress_success_output: bool,

    /// Hide captured output of failing tests
    pub suppress_failure_output: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            colours: false,
            suppress_success_output: false,
            suppress_failure_output: false,
            log_level: "warn".to_string(),
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

impl ReportConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml(path) {
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?
        } else {
            serde_json::from_str(&content).context("Failed to parse JSON config")?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if LogLevel::from_str(&self.log_level).is_none() {
            anyhow::bail!("Unknown log level: {}", self.log_level);
        }
        Ok(())
    }

    /// Overlay values set in the environment
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(verbose) = env.verbose {
            self.verbose = verbose;
        }
        if let Some(colours) = env.colours {
            self.colours = colours;
        }
        if let Some(suppress) = env.suppress_success_output {
            self.suppress_success_output = suppress;
        }
        if let Some(suppress) = env.suppress_failure_output {
            self.suppress_failure_output = suppress;
        }
        if let Some(level) = &env.log_level {
            self.log_level = level.clone();
        }
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_str(&self.log_level).unwrap_or_default()
    }

    /// Report flags for this configuration
    pub fn flags(&self) -> ReportFlags {
        let mut flags = ReportFlags::empty();
        flags.set(ReportFlags::VERBOSE, self.verbose);
        flags.set(ReportFlags::COLOURS, self.colours);
        flags.set(
            ReportFlags::SUPPRESS_SUCCESS_OUTPUT,
            self.suppress_success_output,
        );
        flags.set(
            ReportFlags::SUPPRESS_FAILURE_OUTPUT,
            self.suppress_failure_output,
        );
        flags
    }
}
