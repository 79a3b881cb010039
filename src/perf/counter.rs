/*!
 * Perf Counter Adapter
 * Minimal perf_event_open(2) wrapper for per-process counting
 *
 * The attr layout and ioctl numbers are kernel ABI; they are isolated to
 * this file so nothing else in the crate touches raw perf plumbing.
 */

use crate::core::types::Pid;
use std::io;
use std::mem;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

const PERF_TYPE_HARDWARE: u32 = 0;
const PERF_TYPE_RAW: u32 = 4;

pub(super) const PERF_COUNT_HW_CPU_CYCLES: u64 = 0;

const PERF_FLAG_FD_CLOEXEC: libc::c_ulong = 1 << 3;

const PERF_EVENT_IOC_ENABLE: libc::c_ulong = 0x2400;
const PERF_EVENT_IOC_DISABLE: libc::c_ulong = 0x2401;
const PERF_EVENT_IOC_RESET: libc::c_ulong = 0x2403;

// attr_flags bits (perf_event_attr bitfield word)
const ATTR_DISABLED: u64 = 1 << 0;
const ATTR_EXCLUDE_HV: u64 = 1 << 6;

/// perf_event_attr up to PERF_ATTR_SIZE_VER1 (72 bytes); the kernel accepts
/// any size it knows, zero-extending the rest
#[repr(C)]
#[derive(Default)]
struct PerfEventAttr {
    type_: u32,
    size: u32,
    config: u64,
    sample_period: u64,
    sample_type: u64,
    read_format: u64,
    attr_flags: u64,
    wakeup_events: u32,
    bp_type: u32,
    config1: u64,
    config2: u64,
}

/// One counting event attached to a process, any CPU
pub(super) struct Counter {
    fd: OwnedFd,
}

impl Counter {
    /// Open a generic hardware event for `pid`
    pub(super) fn open_hardware(config: u64, pid: Pid) -> io::Result<Self> {
        Self::open(PERF_TYPE_HARDWARE, config, pid)
    }

    /// Open a raw (family-encoded) event for `pid`
    pub(super) fn open_raw(config: u64, pid: Pid) -> io::Result<Self> {
        Self::open(PERF_TYPE_RAW, config, pid)
    }

    fn open(type_: u32, config: u64, pid: Pid) -> io::Result<Self> {
        let attr = PerfEventAttr {
            type_,
            size: mem::size_of::<PerfEventAttr>() as u32,
            config,
            attr_flags: ATTR_DISABLED | ATTR_EXCLUDE_HV,
            ..PerfEventAttr::default()
        };

        // SAFETY: attr outlives the call; the kernel copies it before
        // returning. pid/cpu/group/flags are plain integers.
        let fd = unsafe {
            libc::syscall(
                libc::SYS_perf_event_open,
                &attr as *const PerfEventAttr,
                pid as libc::pid_t,
                -1 as libc::c_int,
                -1 as libc::c_int,
                PERF_FLAG_FD_CLOEXEC,
            )
        };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: fd is a freshly returned, owned descriptor.
        Ok(Self {
            fd: unsafe { OwnedFd::from_raw_fd(fd as i32) },
        })
    }

    pub(super) fn reset_and_enable(&self) -> io::Result<()> {
        self.ioctl(PERF_EVENT_IOC_RESET)?;
        self.ioctl(PERF_EVENT_IOC_ENABLE)
    }

    pub(super) fn disable(&self) -> io::Result<()> {
        self.ioctl(PERF_EVENT_IOC_DISABLE)
    }

    /// Read the current count
    pub(super) fn read(&self) -> io::Result<u64> {
        let mut value: u64 = 0;
        // SAFETY: reading exactly 8 bytes into an owned u64.
        let n = unsafe {
            libc::read(
                self.fd.as_raw_fd(),
                &mut value as *mut u64 as *mut libc::c_void,
                mem::size_of::<u64>(),
            )
        };
        if n != mem::size_of::<u64>() as isize {
            return Err(io::Error::last_os_error());
        }
        Ok(value)
    }

    fn ioctl(&self, op: libc::c_ulong) -> io::Result<()> {
        // SAFETY: counter ioctls with no argument payload.
        let ret = unsafe { libc::ioctl(self.fd.as_raw_fd(), op as _, 0) };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}
