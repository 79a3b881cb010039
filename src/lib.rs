/*!
 * thpd Library
 * Huge-page promotion priority daemon: process tracking, weighting, and
 * kernel notification
 */

pub mod config;
pub mod core;
pub mod daemon;
pub mod lister;
pub mod metrics;
pub mod monitoring;
pub mod notify;
pub mod perf;
pub mod registry;

// Re-exports
pub use crate::core::errors::{ConfigError, DaemonError, ListerError, MetricsError};
pub use crate::core::types::{MemorySample, Pid, ProcEntry, Tick};
pub use config::{Cli, Config};
pub use daemon::{daemonize, Profiler};
pub use lister::{ProcScanner, ProcessLister};
pub use metrics::{LinuxMetricsProvider, MetricsProvider};
pub use monitoring::init_tracing;
pub use notify::{HugePagePriority, KernelNotifier};
pub use perf::{OverheadSampler, ProcessorFamily};
pub use registry::{Candidate, ProcessRecord, Registry, UpsertOutcome};
