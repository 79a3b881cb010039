/*!
 * Process Enumeration
 * Typed (name, pid) discovery over procfs with a regex name filter
 */

use crate::core::errors::ListerError;
use crate::core::types::{Pid, ProcEntry};
use regex::Regex;
use std::fs;

/// Command names never considered for tracking: the daemon itself and the
/// shell/login plumbing every interactive host runs
pub const EXCLUDED_COMMS: &[&str] = &["thpd", "sshd", "bash", "login"];

/// Per-sweep process discovery boundary
///
/// Yields every currently running process whose command name matches the
/// configured filter. Failure here is the one dependency the control loop
/// cannot route around.
pub trait ProcessLister {
    fn list(&self) -> Result<Vec<ProcEntry>, ListerError>;
}

/// Whether a command name is in the fixed exclusion set
#[inline]
#[must_use]
pub fn is_excluded(name: &str) -> bool {
    EXCLUDED_COMMS.contains(&name)
}

/// Production lister scanning `/proc`
pub struct ProcScanner {
    pattern: Regex,
}

impl ProcScanner {
    #[must_use]
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    fn read_comm(pid: Pid) -> Option<String> {
        let comm = fs::read_to_string(format!("/proc/{}/comm", pid)).ok()?;
        Some(comm.trim_end().to_string())
    }
}

impl ProcessLister for ProcScanner {
    fn list(&self) -> Result<Vec<ProcEntry>, ListerError> {
        let mut entries = Vec::new();
        // Only the directory scan itself is fatal; individual processes may
        // exit between readdir and the comm read.
        for dirent in fs::read_dir("/proc")? {
            let Ok(dirent) = dirent else { continue };
            let Some(pid) = dirent
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<Pid>().ok())
            else {
                continue;
            };
            let Some(name) = Self::read_comm(pid) else {
                continue;
            };
            if self.pattern.is_match(&name) {
                entries.push(ProcEntry::new(pid, name));
            }
        }
        Ok(entries)
    }
}
