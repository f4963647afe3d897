//! Signal mask control.
//!
//! Signals 32 and 33 belong to the C threading runtime (thread cancellation
//! and set*id broadcast). They are removed from every set before it reaches
//! the kernel, whatever `how` is, so application code can neither block nor
//! unblock them. This is fixed policy, not an option.

use core::mem::size_of;

use sysbase_abi::{How, SigSet, SyscallKind};

use super::error::SysResult;
use super::invoke::call;

/// Change the calling thread's signal mask. Returns the previous mask.
///
/// # Errors
/// * `EINVAL` - never for valid `How` values; reported if the kernel
///   disagrees on the `sigset_t` size
pub fn sigprocmask(how: How, set: &SigSet) -> SysResult<SigSet> {
    let submitted = set.without_reserved();
    let mut old = SigSet::empty();
    unsafe {
        call(
            SyscallKind::SigProcMask,
            &[
                how as u64,
                &submitted as *const SigSet as u64,
                &mut old as *mut SigSet as u64,
                size_of::<SigSet>() as u64,
            ],
        )
    }?;
    Ok(old)
}

/// The calling thread's current signal mask, unchanged.
pub fn current_mask() -> SysResult<SigSet> {
    let mut cur = SigSet::empty();
    unsafe {
        call(
            SyscallKind::SigProcMask,
            &[
                How::Block as u64,
                0,
                &mut cur as *mut SigSet as u64,
                size_of::<SigSet>() as u64,
            ],
        )
    }?;
    Ok(cur)
}
