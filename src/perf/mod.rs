/*!
 * Perf Module
 * Microarchitecture event tables and hardware counter access
 */

mod counter;
mod family;
mod overhead;

pub use family::{EventMasks, ProcessorFamily};
pub use overhead::OverheadSampler;
