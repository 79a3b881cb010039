/*!
 * Core Types
 * Common types used across the daemon
 */

use serde::{Deserialize, Serialize};

/// Operating-system process ID type
pub type Pid = u32;

/// Logical sweep counter value
///
/// Advances once per sampling iteration; owned by the control loop and
/// passed into registry operations explicitly.
pub type Tick = u64;

/// Kernel-facing huge-page promotion priority (>= 1 when derived)
pub type KernelPriority = i32;

/// Common result type for daemon operations
pub type DaemonResult<T> = Result<T, super::errors::DaemonError>;

/// Memory accounting sample for one process, in kB as reported by procfs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemorySample {
    /// Resident anonymous memory
    pub anon_kb: u64,
    /// Portion of `anon_kb` already backed by huge pages
    pub anon_huge_kb: u64,
}

impl MemorySample {
    #[inline]
    #[must_use]
    pub const fn new(anon_kb: u64, anon_huge_kb: u64) -> Self {
        Self {
            anon_kb,
            anon_huge_kb,
        }
    }

    /// Anonymous memory not yet backed by huge pages, in kB
    ///
    /// Saturating: procfs can transiently report the huge-backed figure
    /// ahead of the anonymous total while a process is faulting pages in.
    #[inline(always)]
    #[must_use]
    pub const fn net_kb(&self) -> u64 {
        self.anon_kb.saturating_sub(self.anon_huge_kb)
    }
}

/// An observed process: command name plus OS pid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcEntry {
    pub pid: Pid,
    pub name: String,
}

impl ProcEntry {
    #[inline]
    #[must_use]
    pub fn new(pid: Pid, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: name.into(),
        }
    }
}
