/*!
 * Kernel Notification
 * Huge-page promotion priority knob behind a named, mockable boundary
 */

use crate::core::limits::MIN_PRIORITY;
use crate::core::types::{KernelPriority, Pid};
use log::debug;

/// Syscall number of the huge-page priority knob exposed by the patched kernel
const SET_HUGEPAGE_PRIORITY: libc::c_long = 325;

/// Kernel-facing priority boundary
///
/// Fire-and-forget: the engine observes no return value, and notification
/// failures are not part of any contract it relies on.
pub trait HugePagePriority {
    /// Forward (pid, priority) to the operating system; priority is >= 1
    fn set_priority(&self, pid: Pid, priority: KernelPriority);
}

/// Derive a kernel priority from a measured translation overhead
///
/// Floored at [`MIN_PRIORITY`]: the knob rejects zero and negative values.
#[inline]
#[must_use]
pub fn priority_from_overhead(overhead: f64) -> KernelPriority {
    (overhead as KernelPriority).max(MIN_PRIORITY)
}

/// Production notifier invoking the raw syscall
#[derive(Debug, Clone, Copy, Default)]
pub struct KernelNotifier;

impl KernelNotifier {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HugePagePriority for KernelNotifier {
    fn set_priority(&self, pid: Pid, priority: KernelPriority) {
        // SAFETY: the syscall takes two integer arguments and touches no
        // caller memory; an unsupported kernel returns ENOSYS, which is
        // ignored along with every other failure.
        let ret = unsafe {
            libc::syscall(
                SET_HUGEPAGE_PRIORITY,
                libc::c_long::from(pid as i32),
                libc::c_long::from(priority),
            )
        };
        if ret == -1 {
            debug!(
                "hugepage priority syscall failed for pid {}: {}",
                pid,
                std::io::Error::last_os_error()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn priority_is_floored_at_one() {
        assert_eq!(priority_from_overhead(0.0), 1);
        assert_eq!(priority_from_overhead(0.9), 1);
        assert_eq!(priority_from_overhead(-3.0), 1);
    }

    #[test]
    fn priority_truncates_measured_overhead() {
        assert_eq!(priority_from_overhead(1.0), 1);
        assert_eq!(priority_from_overhead(64.7), 64);
        assert_eq!(priority_from_overhead(250.0), 250);
    }
}
