//! The invocation primitive: issue one kernel call, classify the raw return,
//! apply the call's cancellation and retry policy.
//!
//! Policy is chosen per [`SyscallKind`], never globally:
//!
//! | Policy | Kinds | On `EINTR` | On `EBUSY` |
//! |--------|-------|------------|------------|
//! | `Cancel::Trap` | close, read, write, pread, pwrite, openat, waitid | surfaced, logged | surfaced |
//! | `Retry::OnBusy` | dup2 | surfaced | re-issued, bounded |
//! | plain | everything else | surfaced | surfaced |
//!
//! The primitive never retries past `EINTR`. A cancellation-trapped call that
//! is interrupted returns the error so a cooperative cancel stays observable;
//! for `close` a retry could release a descriptor number another thread has
//! already reused.

use sysbase_abi::SyscallKind;

use super::error::{Errno, SysResult, demux};
use super::raw;
use crate::config::DUP2_BUSY_RETRY_LIMIT;
use crate::{klog_debug, klog_trace};

/// Whether an interruption of the call is a legitimate cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cancel {
    /// The call is a cancellation point; `EINTR` is reported as such.
    Trap,
    /// Ordinary call; `EINTR` is still surfaced, but not treated specially.
    Pass,
}

/// Which transient errors the primitive re-issues the call for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Retry {
    Never,
    /// Re-issue on `EBUSY`, up to [`DUP2_BUSY_RETRY_LIMIT`] attempts.
    OnBusy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Policy {
    pub cancel: Cancel,
    pub retry: Retry,
}

impl Policy {
    const PLAIN: Self = Self {
        cancel: Cancel::Pass,
        retry: Retry::Never,
    };

    pub const fn of(kind: SyscallKind) -> Self {
        match kind {
            SyscallKind::Close
            | SyscallKind::Read
            | SyscallKind::Write
            | SyscallKind::Pread
            | SyscallKind::Pwrite
            | SyscallKind::Open
            | SyscallKind::Waitid => Self {
                cancel: Cancel::Trap,
                retry: Retry::Never,
            },
            SyscallKind::Dup2 => Self {
                cancel: Cancel::Pass,
                retry: Retry::OnBusy,
            },
            _ => Self::PLAIN,
        }
    }
}

/// Issue `kind` with up to six arguments and apply its policy.
///
/// Missing arguments are passed as zero.
///
/// # Safety
///
/// The arguments must be valid for the call: pointers must reference memory
/// of the size and mutability the kernel expects, for the duration of the
/// call.
pub unsafe fn call(kind: SyscallKind, args: &[u64]) -> SysResult<u64> {
    debug_assert!(args.len() <= 6, "{} takes at most six arguments", kind.name());
    let mut a = [0u64; 6];
    for (slot, arg) in a.iter_mut().zip(args) {
        *slot = *arg;
    }

    let policy = Policy::of(kind);
    let mut attempts = 0usize;
    loop {
        attempts += 1;
        trace_entry(kind, &a);
        let ret = demux(unsafe { raw::syscall6(kind.nr(), a[0], a[1], a[2], a[3], a[4], a[5]) });
        trace_exit(kind, &ret);

        match ret {
            Err(Errno::EBUSY)
                if policy.retry == Retry::OnBusy && attempts < DUP2_BUSY_RETRY_LIMIT =>
            {
                klog_debug!("{}: EBUSY, retrying (attempt {})", kind.name(), attempts);
            }
            Err(Errno::EINTR) if policy.cancel == Cancel::Trap => {
                klog_debug!("{}: interrupted at cancellation point", kind.name());
                return ret;
            }
            _ => return ret,
        }
    }
}

#[inline(always)]
fn trace_entry(kind: SyscallKind, args: &[u64; 6]) {
    if cfg!(feature = "syscall-trace") {
        klog_trace!("{}({:#x?})", kind.name(), args);
    }
}

#[inline(always)]
fn trace_exit(kind: SyscallKind, ret: &SysResult<u64>) {
    if cfg!(feature = "syscall-trace") {
        klog_trace!("{} -> {:?}", kind.name(), ret);
    }
}
