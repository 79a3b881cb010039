/*!
 * Daemon Limits and Constants
 *
 * Centralized location for all thresholds and magic numbers.
 * All values include rationale comments explaining WHY they exist.
 */

use std::time::Duration;

// =============================================================================
// TRACKING ELIGIBILITY
// =============================================================================

/// Minimum resident anonymous memory (kB) for a process to be tracked (100 MiB)
/// Below this, even full huge-page backing frees too few TLB entries to
/// change translation behavior measurably.
pub const ELIGIBILITY_THRESHOLD_KB: u64 = 100 * 1024;

/// Minimum translation overhead (percentage points of cycles) for a tracked
/// process to participate in candidate selection
/// Processes under this spend effectively nothing on page walks; promoting
/// them cannot pay for itself.
pub const MIN_CONSIDERABLE_OVERHEAD: f64 = 1.0;

// =============================================================================
// WEIGHTING
// =============================================================================

/// Sentinel weight marking a record as not comparable
/// Negative and therefore out of range for any real weight; selection
/// starts its running maximum at 0 so the sentinel can never win.
pub const WEIGHT_NOT_COMPARABLE: f64 = -1.0;

/// Legibility scale applied uniformly to all comparable weights
/// Raw overhead-per-MiB values land in the 1e-3 range for large processes;
/// the scale keeps logged weights in a human-readable magnitude.
pub const WEIGHT_SCALE: f64 = 1024.0;

/// kB per MiB, for converting procfs accounting into the weight denominator
pub const KB_PER_MIB: u64 = 1024;

// =============================================================================
// KERNEL NOTIFICATION
// =============================================================================

/// Baseline sentinel priority sent before the first computed priority of a
/// freshly tracked pid
/// Neutralizes any stale priority the kernel may hold for a reused pid;
/// ordering (baseline first, computed second) is a correctness contract.
pub const BASELINE_PRIORITY: i32 = 1000;

/// Floor for every computed priority
/// The kernel-side knob rejects zero and negative values.
pub const MIN_PRIORITY: i32 = 1;

// =============================================================================
// SAMPLING
// =============================================================================

/// Default interval between sweeps, seconds
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Window over which per-process page-walk counters are sampled
/// Long enough to average out scheduling noise, short enough that a sweep
/// over a handful of tracked processes stays well inside the interval.
pub const OVERHEAD_SAMPLE_WINDOW: Duration = Duration::from_millis(100);

/// kB per 2 MiB transparent huge page, for diagnostic output
pub const KB_PER_HUGE_PAGE: u64 = 2048;
