/*!
 * Startup Configuration
 * CLI parsing and validation
 */

use crate::core::errors::ConfigError;
use crate::core::limits::DEFAULT_INTERVAL_SECS;
use crate::perf::ProcessorFamily;
use clap::Parser;
use regex::Regex;
use std::time::Duration;

/// Huge-page promotion priority daemon
///
/// Profiles processes matching a name pattern and tells the kernel, once per
/// sampling interval, how strongly each one's anonymous memory should be
/// prioritized for huge-page backing.
#[derive(Debug, Parser)]
#[command(name = "thpd", version)]
pub struct Cli {
    /// Regex of program names to profile
    #[arg(short = 'p', long = "pattern")]
    pub pattern: String,

    /// CPU microarchitecture family
    #[arg(short = 'f', long = "family", value_enum)]
    pub family: ProcessorFamily,

    /// Seconds between sampling sweeps
    #[arg(short = 'i', long = "interval", default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval: u64,

    /// Detach from the controlling terminal
    #[arg(short = 'd', long = "daemonize")]
    pub daemonize: bool,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub pattern: Regex,
    pub family: ProcessorFamily,
    pub interval: Duration,
    pub daemonize: bool,
}

impl Cli {
    /// Validate the parsed arguments into a runtime configuration
    pub fn into_config(self) -> Result<Config, ConfigError> {
        if self.interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        let pattern = Regex::new(&self.pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: self.pattern,
            source,
        })?;
        Ok(Config {
            pattern,
            family: self.family,
            interval: Duration::from_secs(self.interval),
            daemonize: self.daemonize,
        })
    }
}
