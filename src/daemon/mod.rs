/*!
 * Profiler Control Loop
 * Ties sampling, registry maintenance, candidate selection, and kernel
 * notification into one steady-state cycle
 */

mod daemonize;

pub use daemonize::daemonize;

use crate::core::types::{DaemonResult, Tick};
use crate::lister::{is_excluded, ProcessLister};
use crate::metrics::MetricsProvider;
use crate::monitoring;
use crate::notify::HugePagePriority;
use crate::registry::Registry;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

/// The sampling loop
///
/// Single steady state; strictly sequential. One sweep completes in full
/// before the next begins, so the registry needs no locking: it is owned
/// here and nothing else ever sees a record.
pub struct Profiler<L, M, N> {
    lister: L,
    metrics: M,
    notifier: N,
    registry: Registry,
    tick: Tick,
    interval: Duration,
}

impl<L, M, N> Profiler<L, M, N>
where
    L: ProcessLister,
    M: MetricsProvider,
    N: HugePagePriority,
{
    #[must_use]
    pub fn new(lister: L, metrics: M, notifier: N, interval: Duration) -> Self {
        Self {
            lister,
            metrics,
            notifier,
            registry: Registry::new(),
            tick: 0,
            interval,
        }
    }

    /// Replace the default registry (custom eligibility threshold)
    #[must_use]
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Run one sampling cycle at the current tick
    ///
    /// Enumeration failure is the only fatal outcome; everything below it
    /// recovers per process. Expiry runs after every upsert of the sweep so
    /// selection only sees records refreshed at this tick.
    pub fn sweep(&mut self) -> DaemonResult<()> {
        let observed = self.lister.list()?;

        for entry in &observed {
            if is_excluded(&entry.name) {
                continue;
            }
            self.registry
                .upsert(entry.pid, self.tick, &self.metrics, &self.notifier);
        }

        let expired = self.registry.expire(self.tick);
        let candidate = self.registry.select_best();
        monitoring::log_sweep(self.tick, &self.registry, expired, candidate.as_ref());
        Ok(())
    }

    /// Advance the logical clock to the next sweep
    pub fn advance(&mut self) {
        self.tick += 1;
    }

    /// Run sweeps until a fatal error or a termination signal
    pub async fn run(&mut self) -> DaemonResult<()> {
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        loop {
            self.sweep()?;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => self.advance(),
                _ = sigterm.recv() => {
                    info!("received SIGTERM, shutting down");
                    return Ok(());
                }
                _ = sigint.recv() => {
                    info!("received SIGINT, shutting down");
                    return Ok(());
                }
            }
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn tick(&self) -> Tick {
        self.tick
    }
}
