//! Memory-backed descriptors: `memfd_create`, `memfd_secret`.

use sysbase_abi::fs::MEMFD_SECRET_CLOEXEC;
use sysbase_abi::{MemfdFlags, RawFd, SyscallKind};

use super::arg::PathArg;
use super::error::SysResult;
use super::invoke::call;

/// Create an anonymous memory-backed file.
///
/// `name` shows up in `/proc/self/fd` as `memfd:<name>`; it may be a literal
/// (`c"buf"`) or a runtime string. The file starts empty; size it with
/// [`ftruncate`](super::fs::ftruncate).
///
/// # Errors
/// * `EINVAL` - name too long, contains NUL, or unknown flag bits
/// * `EMFILE` - descriptor table full
pub fn memfd_create<P: PathArg + ?Sized>(name: &P, flags: MemfdFlags) -> SysResult<RawFd> {
    let name = name.to_c_str()?;
    unsafe {
        call(
            SyscallKind::MemfdCreate,
            &[name.as_ptr() as u64, flags.bits() as u64],
        )
    }
    .map(|fd| fd as RawFd)
}

/// Create a descriptor for memory that is never swapped and is removed from
/// the kernel direct map, so other processes (and the kernel) cannot read it.
///
/// # Errors
/// * `ENOSYS` - kernel built without `CONFIG_SECRETMEM`, or secretmem disabled
pub fn memfd_secret(cloexec: bool) -> SysResult<RawFd> {
    let flags = if cloexec { MEMFD_SECRET_CLOEXEC } else { 0 };
    unsafe { call(SyscallKind::MemfdSecret, &[flags as u64]) }.map(|fd| fd as RawFd)
}
