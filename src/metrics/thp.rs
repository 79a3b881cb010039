/*!
 * Anonymous Memory Accounting
 * Reads resident anonymous and huge-page-backed figures from procfs
 */

use crate::core::errors::MetricsError;
use crate::core::types::{MemorySample, Pid};
use std::fs;

const RSS_ANON_FIELD: &str = "RssAnon:";
const ANON_HUGE_FIELD: &str = "AnonHugePages:";

/// Read the anonymous-memory sample for a pid from `/proc/<pid>/status`
///
/// Fails when the process has exited or procfs is missing either field
/// (pre-4.5 kernels do not report `RssAnon`).
pub fn read_memory_sample(pid: Pid) -> Result<MemorySample, MetricsError> {
    let path = format!("/proc/{}/status", pid);
    let status = fs::read_to_string(&path).map_err(|e| MetricsError::Memory {
        pid,
        reason: e.to_string(),
    })?;
    parse_status(&status).ok_or_else(|| MetricsError::Memory {
        pid,
        reason: format!("missing {} or {} in {}", RSS_ANON_FIELD, ANON_HUGE_FIELD, path),
    })
}

/// Extract `RssAnon` and `AnonHugePages` (both kB) from a status blob
fn parse_status(status: &str) -> Option<MemorySample> {
    let mut anon_kb = None;
    let mut anon_huge_kb = None;

    for line in status.lines() {
        if let Some(rest) = line.strip_prefix(RSS_ANON_FIELD) {
            anon_kb = parse_kb(rest);
        } else if let Some(rest) = line.strip_prefix(ANON_HUGE_FIELD) {
            anon_huge_kb = parse_kb(rest);
        }
        if anon_kb.is_some() && anon_huge_kb.is_some() {
            break;
        }
    }

    Some(MemorySample::new(anon_kb?, anon_huge_kb?))
}

fn parse_kb(rest: &str) -> Option<u64> {
    rest.trim().trim_end_matches("kB").trim().parse().ok()
}
