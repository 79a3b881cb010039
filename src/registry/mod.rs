/*!
 * Process Registry
 * Owns all tracked process records and the per-sweep update/expiry protocol
 */

mod record;
mod weight;

pub use record::ProcessRecord;
pub use weight::{select_best, weight, Candidate};

use crate::core::limits::{BASELINE_PRIORITY, ELIGIBILITY_THRESHOLD_KB};
use crate::core::types::{Pid, Tick};
use crate::metrics::MetricsProvider;
use crate::notify::{priority_from_overhead, HugePagePriority};
use ahash::RandomState;
use log::{debug, trace};
use std::collections::HashMap;

/// Result of one upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// First contact passed the eligibility gate; record inserted
    NewlyEligible,
    /// First contact failed the gate; nothing retained for this pid
    Rejected,
    /// Existing record refreshed; kept regardless of current eligibility
    Refreshed { eligible: bool },
}

/// Registry of tracked processes, keyed by pid
///
/// Exclusively owned by the control loop; records never outlive the sweep
/// in which they were last refreshed beyond the expiry step.
pub struct Registry {
    records: HashMap<Pid, ProcessRecord, RandomState>,
    threshold_kb: u64,
    next_seq: u64,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::with_threshold(ELIGIBILITY_THRESHOLD_KB)
    }

    /// Registry with a custom first-contact eligibility threshold (kB)
    #[must_use]
    pub fn with_threshold(threshold_kb: u64) -> Self {
        Self {
            records: HashMap::with_hasher(RandomState::new()),
            threshold_kb,
            next_seq: 0,
        }
    }

    /// Track or refresh one observed pid
    ///
    /// Unknown pids pass through the first-contact gate: resident anonymous
    /// memory above the threshold AND a successful overhead measurement, or
    /// nothing is retained. Known pids are refreshed unconditionally; only
    /// their `ineligible` flag reflects the outcome of the re-check.
    ///
    /// Kernel notification happens here, immediately per pid: a fresh insert
    /// is notified twice (baseline sentinel, then computed priority, in that
    /// order); a refresh once, from the record's current overhead figure.
    pub fn upsert(
        &mut self,
        pid: Pid,
        tick: Tick,
        metrics: &impl MetricsProvider,
        notifier: &impl HugePagePriority,
    ) -> UpsertOutcome {
        let threshold_kb = self.threshold_kb;
        if let Some(record) = self.records.get_mut(&pid) {
            record.last_seen = tick;

            // A failed measurement keeps the previous figures; the record
            // is kept either way and retried next sweep.
            match metrics.memory(pid) {
                Ok(sample) => {
                    record.apply_memory(sample);
                    if sample.anon_kb > threshold_kb {
                        match metrics.overhead(pid) {
                            Ok(overhead) => {
                                record.overhead = overhead;
                                record.ineligible = false;
                            }
                            Err(e) => {
                                trace!("pid {}: {}", pid, e);
                                record.ineligible = true;
                            }
                        }
                    } else {
                        record.ineligible = true;
                    }
                }
                Err(e) => {
                    trace!("pid {}: {}", pid, e);
                    record.ineligible = true;
                }
            }

            notifier.set_priority(pid, priority_from_overhead(record.overhead));
            return UpsertOutcome::Refreshed {
                eligible: !record.ineligible,
            };
        }
        self.admit(pid, tick, metrics, notifier)
    }

    fn admit(
        &mut self,
        pid: Pid,
        tick: Tick,
        metrics: &impl MetricsProvider,
        notifier: &impl HugePagePriority,
    ) -> UpsertOutcome {
        // Declining on allocation pressure is silent; the pid gets another
        // chance next sweep.
        if self.records.try_reserve(1).is_err() {
            return UpsertOutcome::Rejected;
        }

        let sample = match metrics.memory(pid) {
            Ok(sample) => sample,
            Err(e) => {
                trace!("pid {}: {}", pid, e);
                return UpsertOutcome::Rejected;
            }
        };
        if sample.anon_kb <= self.threshold_kb {
            return UpsertOutcome::Rejected;
        }
        let overhead = match metrics.overhead(pid) {
            Ok(overhead) => overhead,
            Err(e) => {
                trace!("pid {}: {}", pid, e);
                return UpsertOutcome::Rejected;
            }
        };

        let mut record = ProcessRecord::new(pid, tick, self.next_seq);
        self.next_seq += 1;
        record.apply_memory(sample);
        record.overhead = overhead;
        record.ineligible = false;

        // Baseline first: the kernel may hold a stale priority for a reused
        // pid, and the computed value must land on a known starting state.
        notifier.set_priority(pid, BASELINE_PRIORITY);
        notifier.set_priority(pid, priority_from_overhead(overhead));

        self.records.insert(pid, record);
        debug!("tracking pid {} (overhead {:.1})", pid, overhead);
        UpsertOutcome::NewlyEligible
    }

    /// Remove every record not refreshed in the current sweep
    ///
    /// Must run after all upserts of the sweep and before selection, so
    /// selection only sees records refreshed at `tick`.
    pub fn expire(&mut self, tick: Tick) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| record.last_seen >= tick);
        let removed = before - self.records.len();
        if removed > 0 {
            debug!("expired {} stale record(s)", removed);
        }
        removed
    }

    #[must_use]
    pub fn get(&self, pid: Pid) -> Option<&ProcessRecord> {
        self.records.get(&pid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessRecord> {
        self.records.values()
    }

    /// Run candidate selection over the current records
    #[must_use]
    pub fn select_best(&self) -> Option<Candidate> {
        select_best(self.records.values())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::MetricsError;
    use crate::core::types::MemorySample;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::HashMap as StdHashMap;

    struct FakeMetrics {
        memory: StdHashMap<Pid, MemorySample>,
        overhead: StdHashMap<Pid, f64>,
        broken_overhead: Vec<Pid>,
        broken_memory: Vec<Pid>,
    }

    impl FakeMetrics {
        fn new() -> Self {
            Self {
                memory: StdHashMap::new(),
                overhead: StdHashMap::new(),
                broken_overhead: Vec::new(),
                broken_memory: Vec::new(),
            }
        }

        fn with(mut self, pid: Pid, anon_kb: u64, anon_huge_kb: u64, overhead: f64) -> Self {
            self.memory
                .insert(pid, MemorySample::new(anon_kb, anon_huge_kb));
            self.overhead.insert(pid, overhead);
            self
        }
    }

    impl MetricsProvider for FakeMetrics {
        fn memory(&self, pid: Pid) -> Result<MemorySample, MetricsError> {
            if self.broken_memory.contains(&pid) {
                return Err(MetricsError::Memory {
                    pid,
                    reason: "gone".into(),
                });
            }
            self.memory.get(&pid).copied().ok_or(MetricsError::Memory {
                pid,
                reason: "unknown".into(),
            })
        }

        fn overhead(&self, pid: Pid) -> Result<f64, MetricsError> {
            if self.broken_overhead.contains(&pid) {
                return Err(MetricsError::Overhead {
                    pid,
                    reason: "counters unavailable".into(),
                });
            }
            self.overhead
                .get(&pid)
                .copied()
                .ok_or(MetricsError::Overhead {
                    pid,
                    reason: "unknown".into(),
                })
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        calls: RefCell<Vec<(Pid, i32)>>,
    }

    impl HugePagePriority for RecordingNotifier {
        fn set_priority(&self, pid: Pid, priority: i32) {
            self.calls.borrow_mut().push((pid, priority));
        }
    }

    #[test]
    fn first_contact_above_threshold_is_tracked() {
        let metrics = FakeMetrics::new().with(10, 4096, 0, 64.0);
        let notifier = RecordingNotifier::default();
        let mut registry = Registry::with_threshold(1024);

        let outcome = registry.upsert(10, 0, &metrics, &notifier);
        assert_eq!(outcome, UpsertOutcome::NewlyEligible);
        assert_eq!(registry.len(), 1);
        assert!(!registry.get(10).unwrap().ineligible);
    }

    #[test]
    fn first_contact_at_or_below_threshold_is_never_inserted() {
        let metrics = FakeMetrics::new()
            .with(11, 512, 0, 900.0)
            .with(12, 1024, 0, 900.0);
        let notifier = RecordingNotifier::default();
        let mut registry = Registry::with_threshold(1024);

        assert_eq!(registry.upsert(11, 0, &metrics, &notifier), UpsertOutcome::Rejected);
        assert_eq!(registry.upsert(12, 0, &metrics, &notifier), UpsertOutcome::Rejected);
        assert!(registry.is_empty());
        // Rejected first contacts produce no notification.
        assert!(notifier.calls.borrow().is_empty());
    }

    #[test]
    fn fresh_insert_notifies_baseline_then_computed() {
        let metrics = FakeMetrics::new().with(10, 4096, 0, 64.0);
        let notifier = RecordingNotifier::default();
        let mut registry = Registry::with_threshold(1024);

        registry.upsert(10, 0, &metrics, &notifier);
        assert_eq!(*notifier.calls.borrow(), vec![(10, BASELINE_PRIORITY), (10, 64)]);
    }

    #[test]
    fn refresh_notifies_once_with_computed_priority() {
        let metrics = FakeMetrics::new().with(10, 4096, 0, 64.0);
        let notifier = RecordingNotifier::default();
        let mut registry = Registry::with_threshold(1024);

        registry.upsert(10, 0, &metrics, &notifier);
        notifier.calls.borrow_mut().clear();

        let outcome = registry.upsert(10, 1, &metrics, &notifier);
        assert_eq!(outcome, UpsertOutcome::Refreshed { eligible: true });
        assert_eq!(*notifier.calls.borrow(), vec![(10, 64)]);
        assert_eq!(registry.get(10).unwrap().last_seen, 1);
    }

    #[test]
    fn overhead_failure_on_first_contact_rejects() {
        let mut metrics = FakeMetrics::new().with(10, 4096, 0, 64.0);
        metrics.broken_overhead.push(10);
        let notifier = RecordingNotifier::default();
        let mut registry = Registry::with_threshold(1024);

        assert_eq!(registry.upsert(10, 0, &metrics, &notifier), UpsertOutcome::Rejected);
        assert!(registry.is_empty());
    }

    #[test]
    fn tracked_pid_survives_later_measurement_failure() {
        let mut metrics = FakeMetrics::new().with(10, 4096, 0, 64.0);
        let notifier = RecordingNotifier::default();
        let mut registry = Registry::with_threshold(1024);

        registry.upsert(10, 0, &metrics, &notifier);

        metrics.broken_overhead.push(10);
        let outcome = registry.upsert(10, 1, &metrics, &notifier);
        assert_eq!(outcome, UpsertOutcome::Refreshed { eligible: false });

        let record = registry.get(10).unwrap();
        assert!(record.ineligible);
        // Previous overhead figure is kept, and still drives the refresh
        // notification.
        assert_eq!(record.overhead, 64.0);
        assert_eq!(notifier.calls.borrow().last(), Some(&(10, 64)));
        // Excluded from selection but not deleted.
        assert_eq!(registry.select_best(), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn memory_failure_on_refresh_keeps_previous_figures() {
        let mut metrics = FakeMetrics::new().with(10, 4096, 1024, 64.0);
        let notifier = RecordingNotifier::default();
        let mut registry = Registry::with_threshold(1024);

        registry.upsert(10, 0, &metrics, &notifier);
        metrics.broken_memory.push(10);
        registry.upsert(10, 1, &metrics, &notifier);

        let record = registry.get(10).unwrap();
        assert_eq!(record.anon_kb, 4096);
        assert_eq!(record.anon_huge_kb, 1024);
        assert!(record.ineligible);
        assert_eq!(record.last_seen, 1);
    }

    #[test]
    fn shrinking_below_threshold_marks_ineligible_but_keeps_record() {
        let mut metrics = FakeMetrics::new().with(10, 4096, 0, 64.0);
        let notifier = RecordingNotifier::default();
        let mut registry = Registry::with_threshold(1024);

        registry.upsert(10, 0, &metrics, &notifier);
        metrics.memory.insert(10, MemorySample::new(512, 0));
        let outcome = registry.upsert(10, 1, &metrics, &notifier);

        assert_eq!(outcome, UpsertOutcome::Refreshed { eligible: false });
        assert_eq!(registry.len(), 1);
        assert!(registry.get(10).unwrap().ineligible);
    }

    #[test]
    fn expire_removes_only_stale_records() {
        let metrics = FakeMetrics::new()
            .with(10, 4096, 0, 64.0)
            .with(11, 8192, 0, 32.0);
        let notifier = RecordingNotifier::default();
        let mut registry = Registry::with_threshold(1024);

        registry.upsert(10, 0, &metrics, &notifier);
        registry.upsert(11, 0, &metrics, &notifier);

        // Sweep 1 only observes pid 11.
        registry.upsert(11, 1, &metrics, &notifier);
        let removed = registry.expire(1);

        assert_eq!(removed, 1);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(10).is_none());
        assert!(registry.get(11).is_some());
    }

    #[test]
    fn reobserved_pid_after_expiry_is_a_fresh_insert() {
        let metrics = FakeMetrics::new().with(10, 4096, 0, 64.0);
        let notifier = RecordingNotifier::default();
        let mut registry = Registry::with_threshold(1024);

        registry.upsert(10, 0, &metrics, &notifier);
        registry.expire(1);
        assert!(registry.is_empty());

        notifier.calls.borrow_mut().clear();
        let outcome = registry.upsert(10, 2, &metrics, &notifier);
        assert_eq!(outcome, UpsertOutcome::NewlyEligible);
        // Fresh insert semantics include the baseline reset.
        assert_eq!(*notifier.calls.borrow(), vec![(10, BASELINE_PRIORITY), (10, 64)]);
    }

    #[test]
    fn huge_backed_figure_is_clamped_to_anon() {
        let metrics = FakeMetrics::new().with(10, 4096, 9999, 64.0);
        let notifier = RecordingNotifier::default();
        let mut registry = Registry::with_threshold(1024);

        registry.upsert(10, 0, &metrics, &notifier);
        let record = registry.get(10).unwrap();
        assert_eq!(record.anon_huge_kb, record.anon_kb);
        assert_eq!(record.net_kb(), 0);
    }
}
