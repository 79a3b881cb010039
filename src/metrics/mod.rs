/*!
 * Metrics Provider
 * Per-process memory accounting and translation-overhead measurement
 */

mod thp;

pub use thp::read_memory_sample;

use crate::core::errors::MetricsError;
use crate::core::types::{MemorySample, Pid};
use crate::perf::{OverheadSampler, ProcessorFamily};

/// Per-process measurement boundary
///
/// Both operations can fail per process; failures are absorbed by the
/// registry (new pid: not tracked; known pid: kept but marked ineligible)
/// and retried on every subsequent sweep.
pub trait MetricsProvider {
    /// Refresh memory accounting for a pid
    fn memory(&self, pid: Pid) -> Result<MemorySample, MetricsError>;

    /// Refresh translation overhead for a pid
    ///
    /// Returns page-walk cycles as a percentage of total cycles over the
    /// sampling window.
    fn overhead(&self, pid: Pid) -> Result<f64, MetricsError>;
}

/// Production provider: procfs accounting + hardware page-walk counters
pub struct LinuxMetricsProvider {
    sampler: OverheadSampler,
}

impl LinuxMetricsProvider {
    #[must_use]
    pub fn new(family: ProcessorFamily) -> Self {
        Self {
            sampler: OverheadSampler::new(family),
        }
    }
}

impl MetricsProvider for LinuxMetricsProvider {
    fn memory(&self, pid: Pid) -> Result<MemorySample, MetricsError> {
        read_memory_sample(pid)
    }

    fn overhead(&self, pid: Pid) -> Result<f64, MetricsError> {
        self.sampler.measure(pid)
    }
}
