//! Memory mapping RAII wrapper.

use core::ffi::c_void;
use core::ptr::NonNull;
use std::os::fd::AsRawFd;

use sysbase_abi::{MapFlags, MsyncFlags, Prot, RawFd, Share};

use crate::config::PAGE_SIZE;
use crate::klog_warn;
use crate::syscall::error::{Errno, SysResult};
use crate::syscall::memory;

/// An owned mapping of `len` bytes, unmapped on drop.
///
/// Every mapping is readable; writable views require `Prot::WRITE`.
pub struct Mapping {
    ptr: NonNull<u8>,
    len: usize,
    prot: Prot,
    share: Share,
}

// SAFETY: the mapping is plain memory owned by this value; shared access only
// hands out `&[u8]`, mutable access needs `&mut self`.
unsafe impl Send for Mapping {}
unsafe impl Sync for Mapping {}

impl Mapping {
    /// Map `len` bytes of `fd` from `offset` (a multiple of the page size).
    ///
    /// The mapping stays valid after `fd` is closed. Touching pages past the
    /// end of the file raises `SIGBUS`; size the file first.
    ///
    /// # Errors
    /// * `EINVAL` - `len` is zero, `prot` lacks `READ`, or `offset` is unaligned
    /// * `EACCES` - `fd` not open for reading, or `Shared` + `WRITE` on a
    ///   read-only descriptor
    pub fn map(
        fd: &impl AsRawFd,
        len: usize,
        offset: u64,
        prot: Prot,
        share: Share,
    ) -> SysResult<Self> {
        Self::create(fd.as_raw_fd(), len, offset, prot, share, MapFlags::empty())
    }

    /// Private zero-filled memory not backed by a file.
    pub fn anonymous(len: usize, prot: Prot) -> SysResult<Self> {
        Self::create(-1, len, 0, prot, Share::Private, MapFlags::ANONYMOUS)
    }

    fn create(
        fd: RawFd,
        len: usize,
        offset: u64,
        prot: Prot,
        share: Share,
        flags: MapFlags,
    ) -> SysResult<Self> {
        if len == 0 || !prot.contains(Prot::READ) || offset % PAGE_SIZE as u64 != 0 {
            return Err(Errno::EINVAL);
        }
        let addr = unsafe {
            memory::mmap(core::ptr::null_mut(), len, prot, share, flags, fd, offset)
        }?;
        let ptr = NonNull::new(addr.cast::<u8>()).ok_or(Errno::ENOMEM)?;
        Ok(Self {
            ptr,
            len,
            prot,
            share,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: empty mappings cannot be created.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn prot(&self) -> Prot {
        self.prot
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.prot.contains(Prot::WRITE)
    }

    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Mutable view. `EACCES` if the mapping was created without `WRITE`.
    #[inline]
    pub fn as_mut_slice(&mut self) -> SysResult<&mut [u8]> {
        if !self.is_writable() {
            return Err(Errno::EACCES);
        }
        Ok(unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) })
    }

    #[inline]
    pub fn slice(&self, start: usize, len: usize) -> Option<&[u8]> {
        if start.saturating_add(len) <= self.len {
            Some(&self.as_slice()[start..start + len])
        } else {
            None
        }
    }

    /// Write dirty pages of a shared mapping back to the file and wait.
    ///
    /// A no-op for private mappings.
    pub fn flush(&self) -> SysResult<()> {
        if self.share == Share::Private {
            return Ok(());
        }
        unsafe { memory::msync(self.ptr.as_ptr().cast::<c_void>(), self.len, MsyncFlags::SYNC) }
    }
}

impl Drop for Mapping {
    fn drop(&mut self) {
        if let Err(err) = unsafe { memory::munmap(self.ptr.as_ptr().cast::<c_void>(), self.len) } {
            klog_warn!("munmap({:p}, {}) on drop failed: {}", self.ptr, self.len, err);
        }
    }
}

impl core::fmt::Debug for Mapping {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Mapping")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("prot", &self.prot)
            .field("share", &self.share)
            .finish()
    }
}
