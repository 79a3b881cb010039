/*!
 * Processor Families
 * Raw DTLB page-walk event encodings per supported microarchitecture
 */

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported CPU microarchitecture families
///
/// The page-walk events differ per generation; an unrecognized family is a
/// fatal configuration error at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorFamily {
    /// Haswell / Haswell-EP
    #[value(name = "haswell")]
    Haswell,
    /// Skylake Scalable (Skylake-SP)
    #[value(name = "skylakesp")]
    SkylakeScalable,
}

/// Raw perf event encodings for one family: (umask << 8) | event, with the
/// cmask in bits 24-31 where the generation requires it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMasks {
    /// Cycles spent walking after a DTLB load miss
    pub walk_cycles_load: u64,
    /// Cycles spent walking after a DTLB store miss
    pub walk_cycles_store: u64,
}

impl ProcessorFamily {
    /// Event encodings for this family
    ///
    /// Haswell counts DTLB_{LOAD,STORE}_MISSES.WALK_DURATION directly;
    /// Skylake-SP replaced WALK_DURATION with WALK_PENDING and needs
    /// cmask=1 to recover active-walk cycles.
    #[must_use]
    pub const fn event_masks(&self) -> EventMasks {
        match self {
            Self::Haswell => EventMasks {
                walk_cycles_load: 0x1008,
                walk_cycles_store: 0x1049,
            },
            Self::SkylakeScalable => EventMasks {
                walk_cycles_load: 0x0100_1008,
                walk_cycles_store: 0x0100_1049,
            },
        }
    }
}

impl fmt::Display for ProcessorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Haswell => write!(f, "haswell"),
            Self::SkylakeScalable => write!(f, "skylakesp"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn families_parse_by_cli_name() {
        assert_eq!(
            ProcessorFamily::from_str("haswell", false).unwrap(),
            ProcessorFamily::Haswell
        );
        assert_eq!(
            ProcessorFamily::from_str("skylakesp", false).unwrap(),
            ProcessorFamily::SkylakeScalable
        );
        assert!(ProcessorFamily::from_str("zen4", false).is_err());
    }

    #[test]
    fn event_masks_differ_per_generation() {
        let haswell = ProcessorFamily::Haswell.event_masks();
        let skylake = ProcessorFamily::SkylakeScalable.event_masks();
        assert_ne!(haswell, skylake);
        // Same base event/umask; Skylake adds the cmask.
        assert_eq!(haswell.walk_cycles_load, skylake.walk_cycles_load & 0xffff);
    }
}
