//! Memory mapping syscalls: mmap, munmap, msync.
//!
//! Raw and unsafe; [`Mapping`](crate::wrappers::mmap::Mapping) is the owning
//! form.

use core::ffi::c_void;

use sysbase_abi::{MapFlags, MsyncFlags, Prot, RawFd, Share, SyscallKind};

use super::error::SysResult;
use super::invoke::call;

/// Map `len` bytes of `fd` starting at `offset`.
///
/// Pass `fd = -1` with `MapFlags::ANONYMOUS` for memory not backed by a file.
///
/// # Safety
///
/// The mapping aliases whatever the descriptor refers to. With
/// `MapFlags::FIXED` it silently replaces existing mappings at `addr`.
pub unsafe fn mmap(
    addr: *mut c_void,
    len: usize,
    prot: Prot,
    share: Share,
    flags: MapFlags,
    fd: RawFd,
    offset: u64,
) -> SysResult<*mut c_void> {
    let flags = share as u64 | flags.bits() as u64;
    unsafe {
        call(
            SyscallKind::Mmap,
            &[
                addr as u64,
                len as u64,
                prot.bits() as u64,
                flags,
                fd as u64,
                offset,
            ],
        )
    }
    .map(|addr| addr as *mut c_void)
}

/// Remove a mapping.
///
/// # Safety
///
/// No reference into `[addr, addr + len)` may be used afterwards.
pub unsafe fn munmap(addr: *mut c_void, len: usize) -> SysResult<()> {
    unsafe { call(SyscallKind::Munmap, &[addr as u64, len as u64]) }.map(|_| ())
}

/// Write dirty pages of a shared file mapping back to the file.
///
/// # Safety
///
/// `[addr, addr + len)` must lie inside a mapping; `addr` must be page
/// aligned.
pub unsafe fn msync(addr: *mut c_void, len: usize, flags: MsyncFlags) -> SysResult<()> {
    unsafe { call(SyscallKind::Msync, &[addr as u64, len as u64, flags.bits() as u64]) }
        .map(|_| ())
}
