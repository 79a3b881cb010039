/*!
 * Translation Overhead Measurement
 * Samples page-walk cycles against total cycles over a fixed window
 */

use super::counter::{Counter, PERF_COUNT_HW_CPU_CYCLES};
use super::family::ProcessorFamily;
use crate::core::errors::MetricsError;
use crate::core::limits::OVERHEAD_SAMPLE_WINDOW;
use crate::core::types::Pid;
use std::io;
use std::thread;

/// Per-process translation-overhead sampler for one microarchitecture
#[derive(Debug, Clone, Copy)]
pub struct OverheadSampler {
    family: ProcessorFamily,
}

impl OverheadSampler {
    #[must_use]
    pub const fn new(family: ProcessorFamily) -> Self {
        Self { family }
    }

    /// Measure translation overhead for `pid`
    ///
    /// Counts DTLB load/store page-walk cycles and total cycles over
    /// [`OVERHEAD_SAMPLE_WINDOW`] and reports walk cycles as a percentage
    /// of total. A process idle for the whole window measures 0.
    pub fn measure(&self, pid: Pid) -> Result<f64, MetricsError> {
        self.sample(pid).map_err(|e| MetricsError::Overhead {
            pid,
            reason: e.to_string(),
        })
    }

    fn sample(&self, pid: Pid) -> io::Result<f64> {
        let masks = self.family.event_masks();
        let cycles = Counter::open_hardware(PERF_COUNT_HW_CPU_CYCLES, pid)?;
        let walk_load = Counter::open_raw(masks.walk_cycles_load, pid)?;
        let walk_store = Counter::open_raw(masks.walk_cycles_store, pid)?;

        for counter in [&cycles, &walk_load, &walk_store] {
            counter.reset_and_enable()?;
        }
        thread::sleep(OVERHEAD_SAMPLE_WINDOW);
        for counter in [&cycles, &walk_load, &walk_store] {
            counter.disable()?;
        }

        let total = cycles.read()?;
        if total == 0 {
            return Ok(0.0);
        }
        let walking = walk_load.read()? + walk_store.read()?;
        Ok(walking as f64 / total as f64 * 100.0)
    }
}
