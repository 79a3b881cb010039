/*!
 * Weight Engine
 * Scores tracked processes and selects the promotion candidate
 */

use super::record::ProcessRecord;
use crate::core::limits::{KB_PER_MIB, MIN_CONSIDERABLE_OVERHEAD, WEIGHT_NOT_COMPARABLE, WEIGHT_SCALE};
use crate::core::types::Pid;
use serde::{Deserialize, Serialize};

/// The single best-scoring eligible process of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Candidate {
    pub pid: Pid,
    pub weight: f64,
}

/// Score one record: overhead per MiB of huge-page-promotable memory
///
/// A record whose anonymous memory is already fully huge-backed has nothing
/// left to promote and scores the [`WEIGHT_NOT_COMPARABLE`] sentinel,
/// excluding it from selection regardless of other fields.
#[must_use]
pub fn weight(record: &ProcessRecord) -> f64 {
    let net_mib = record.net_kb() / KB_PER_MIB;
    if net_mib == 0 {
        return WEIGHT_NOT_COMPARABLE;
    }
    record.overhead / net_mib as f64 * WEIGHT_SCALE
}

/// Select the highest-weight participant among the given records
///
/// A record participates only when eligible and its overhead is at or above
/// the considerable threshold. Strictly greater weight wins; equal weights
/// resolve in favor of the most recently inserted record. Returns `None`
/// when no record participates.
pub fn select_best<'a, I>(records: I) -> Option<Candidate>
where
    I: IntoIterator<Item = &'a ProcessRecord>,
{
    let mut best: Option<(&ProcessRecord, f64)> = None;

    for record in records {
        if record.ineligible || record.overhead < MIN_CONSIDERABLE_OVERHEAD {
            continue;
        }
        let w = weight(record);
        if w <= 0.0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((b, bw)) => w > bw || (w == bw && record.seq > b.seq),
        };
        if better {
            best = Some((record, w));
        }
    }

    best.map(|(record, weight)| Candidate {
        pid: record.pid,
        weight,
    })
}
