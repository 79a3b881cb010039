/*!
 * Error Types
 * Centralized error handling with thiserror
 */

use crate::core::types::Pid;
use thiserror::Error;

/// Startup configuration errors; all fatal, never retried
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid process name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("sampling interval must be non-zero")]
    ZeroInterval,
}

/// Per-process measurement failures; recovered locally and retried next sweep
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    #[error("memory accounting unavailable for pid {pid}: {reason}")]
    Memory { pid: Pid, reason: String },

    #[error("translation overhead unavailable for pid {pid}: {reason}")]
    Overhead { pid: Pid, reason: String },
}

/// Process enumeration failures
///
/// The single hard dependency the control loop cannot route around:
/// a failure here is fatal for the whole daemon.
#[derive(Error, Debug)]
pub enum ListerError {
    #[error("cannot enumerate processes: {0}")]
    Unavailable(#[from] std::io::Error),
}

/// Unified daemon error type
#[derive(Error, Debug)]
pub enum DaemonError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("enumeration error: {0}")]
    Enumeration(#[from] ListerError),

    #[error("unable to daemonize: {0}")]
    Daemonize(#[from] nix::Error),

    #[error("signal handler setup failed: {0}")]
    Signal(#[from] std::io::Error),
}
