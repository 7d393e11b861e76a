//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "TECCO";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Tree layout from TECCO_VERBOSE
    pub verbose: Option<bool>,
    /// Colours from TECCO_COLOUR
    pub colours: Option<bool>,
    /// From TECCO_NO_OUTPUT_SUCCESS
    pub suppress_success_output: Option<bool>,
    /// From TECCO_NO_OUTPUT_FAILURE
    pub suppress_failure_output: Option<bool>,
    /// Log level from TECCO_LOG
    pub log_level: Option<String>,
    /// Config file from TECCO_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            verbose: get_env_bool("VERBOSE"),
            colours: get_env_bool("COLOUR"),
            suppress_success_output: get_env_bool("NO_OUTPUT_SUCCESS"),
            suppress_failure_output: get_env_bool("NO_OUTPUT_FAILURE"),
            log_level: get_env("LOG"),
            config_file: get_env("CONFIG"),
        }
    }

    /// Check if any environment variables are set
    #[cfg(test)]
    pub(crate) fn has_any(&self) -> bool {
        self.verbose.is_some()
            || self.colours.is_some()
            || self.suppress_success_output.is_some()
            || self.suppress_failure_output.is_some()
            || self.log_level.is_some()
            || self.config_file.is_some()
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables in tests
#[cfg(test)]
pub(crate) struct EnvBuilder {
    vars: Vec<(String, String)>,
}

#[cfg(test)]
impl EnvBuilder {
    /// Create a new environment builder
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    fn set(mut self, name: &str, value: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_{name}"), value.into()));
        self
    }

    pub fn verbose(self, verbose: bool) -> Self {
        self.set("VERBOSE", verbose.to_string())
    }

    pub fn colours(self, colours: bool) -> Self {
        self.set("COLOUR", colours.to_string())
    }

    pub fn suppress_failure_output(self, suppress: bool) -> Self {
        self.set("NO_OUTPUT_FAILURE", suppress.to_string())
    }

    pub fn log_level(self, level: impl Into<String>) -> Self {
        self.set("LOG", level)
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

/// Guard that restores environment variables on drop
#[cfg(test)]
pub(crate) struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

#[cfg(test)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all TECCO environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_VERBOSE            Tree layout (true/false)");
    println!("  {ENV_PREFIX}_COLOUR             Coloured status markers (true/false)");
    println!("  {ENV_PREFIX}_NO_OUTPUT_SUCCESS  Hide output of passing tests");
    println!("  {ENV_PREFIX}_NO_OUTPUT_FAILURE  Hide output of failing tests");
    println!("  {ENV_PREFIX}_LOG                Log level (trace, debug, info, warn, error)");
    println!("  {ENV_PREFIX}_CONFIG             Path to configuration file");
}
