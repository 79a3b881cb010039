/*!
 * Process Record
 * Per-process tracking state owned by the registry
 */

use crate::core::types::{MemorySample, Pid, Tick};
use serde::{Deserialize, Serialize};

/// One tracked process
///
/// Created only when a previously-untracked pid passes the eligibility gate
/// on first contact; destroyed exactly when its pid is absent from a sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessRecord {
    pub pid: Pid,
    /// Sweep at which this record was last successfully refreshed
    pub last_seen: Tick,
    /// Resident anonymous memory, kB
    pub anon_kb: u64,
    /// Portion of `anon_kb` backed by huge pages, kB (never exceeds `anon_kb`)
    pub anon_huge_kb: u64,
    /// Translation overhead, percentage points of cycles
    pub overhead: f64,
    /// Failed its most recent measurement, or never qualified this sweep
    pub ineligible: bool,
    /// Monotone insertion counter; higher means inserted more recently.
    /// Selection tie-break: most recently inserted wins.
    pub(super) seq: u64,
}

impl ProcessRecord {
    #[must_use]
    pub(super) fn new(pid: Pid, tick: Tick, seq: u64) -> Self {
        Self {
            pid,
            last_seen: tick,
            anon_kb: 0,
            anon_huge_kb: 0,
            overhead: 0.0,
            ineligible: true,
            seq,
        }
    }

    /// Apply a fresh memory sample, clamping the huge-backed portion
    pub(super) fn apply_memory(&mut self, sample: MemorySample) {
        self.anon_kb = sample.anon_kb;
        self.anon_huge_kb = sample.anon_huge_kb.min(sample.anon_kb);
    }

    /// Anonymous memory not yet backed by huge pages, kB
    #[inline(always)]
    #[must_use]
    pub const fn net_kb(&self) -> u64 {
        self.anon_kb - self.anon_huge_kb
    }
}
