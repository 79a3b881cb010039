/*!
 * Monitoring
 * Structured tracing setup and per-sweep diagnostic output
 */

use crate::core::limits::KB_PER_HUGE_PAGE;
use crate::core::types::Tick;
use crate::registry::{Candidate, Registry};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: log level filter (default: info)
/// - THPD_TRACE_JSON: enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("THPD_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).compact())
            .init();
    }
}

/// Emit the per-sweep diagnostic block: one line per tracked process, then a
/// sweep summary with the selected candidate (if any)
///
/// Purely observational; nothing downstream consumes these lines.
pub fn log_sweep(tick: Tick, registry: &Registry, expired: usize, candidate: Option<&Candidate>) {
    for record in registry.iter() {
        info!(
            pid = record.pid,
            thp_required = record.anon_kb / KB_PER_HUGE_PAGE,
            thp_backed = record.anon_huge_kb / KB_PER_HUGE_PAGE,
            overhead = record.overhead as i64,
            ineligible = record.ineligible,
            "tracked process"
        );
    }

    match candidate {
        Some(c) => debug!(
            tick,
            tracked = registry.len(),
            expired,
            candidate_pid = c.pid,
            candidate_weight = c.weight,
            "sweep complete"
        ),
        None => debug!(tick, tracked = registry.len(), expired, "sweep complete"),
    }
}
