//! File descriptor RAII wrapper.
//!
//! An [`FdGuard`] owns exactly one descriptor and closes it exactly once: on
//! drop, or through [`FdGuard::close`] when the caller wants the error.
//! It is move-only, so two guards can only share a descriptor number through
//! `unsafe` [`FdGuard::from_raw`].

use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, IntoRawFd, OwnedFd};

use sysbase_abi::{KernelStat, MemfdFlags, Mode, OpenFlags, Pid, PidfdFlags, RawFd, Whence};

use crate::klog_warn;
use crate::syscall::error::{Errno, SysResult};
use crate::syscall::fs::{self, Dir};
use crate::syscall::{PathArg, memfd, process};

pub struct FdGuard {
    fd: RawFd,
}

impl FdGuard {
    #[inline]
    pub fn open<P: PathArg + ?Sized>(path: &P, flags: OpenFlags, mode: Mode) -> SysResult<Self> {
        fs::open(path, flags, mode).map(|fd| Self { fd })
    }

    /// Open `path` relative to the directory this guard refers to.
    #[inline]
    pub fn openat<P: PathArg + ?Sized>(
        &self,
        path: &P,
        flags: OpenFlags,
        mode: Mode,
    ) -> SysResult<Self> {
        fs::openat(Dir::Fd(self.fd), path, flags, mode).map(|fd| Self { fd })
    }

    #[inline]
    pub fn memfd<P: PathArg + ?Sized>(name: &P, flags: MemfdFlags) -> SysResult<Self> {
        memfd::memfd_create(name, flags).map(|fd| Self { fd })
    }

    #[inline]
    pub fn memfd_secret(cloexec: bool) -> SysResult<Self> {
        memfd::memfd_secret(cloexec).map(|fd| Self { fd })
    }

    #[inline]
    pub fn pidfd(pid: Pid, flags: PidfdFlags) -> SysResult<Self> {
        process::pidfd_open(pid, flags).map(|fd| Self { fd })
    }

    /// Create a pipe. Returns `(read_end, write_end)`.
    pub fn pipe(flags: OpenFlags) -> SysResult<(Self, Self)> {
        let [r, w] = fs::pipe2(flags)?;
        Ok((Self { fd: r }, Self { fd: w }))
    }

    /// Take ownership of a raw descriptor.
    ///
    /// # Safety
    ///
    /// `fd` must be open and not owned by anything else that will close it.
    #[inline]
    pub const unsafe fn from_raw(fd: RawFd) -> Self {
        Self { fd }
    }

    #[inline]
    pub const fn as_raw(&self) -> RawFd {
        self.fd
    }

    /// Give up ownership without closing.
    #[inline]
    pub fn into_raw(self) -> RawFd {
        let fd = self.fd;
        core::mem::forget(self);
        fd
    }

    /// Close now and report the result.
    ///
    /// The descriptor is released even when this returns an error (including
    /// `EINTR`), and it is never closed a second time.
    #[inline]
    pub fn close(self) -> SysResult<()> {
        fs::close(self.into_raw())
    }

    /// A new guard for a duplicate of this descriptor.
    #[inline]
    pub fn try_clone(&self) -> SysResult<Self> {
        fs::dup(self.fd).map(|fd| Self { fd })
    }

    /// Make `target` refer to the same open file as `self`.
    ///
    /// The file `target` referred to before is closed by the kernel
    /// atomically; `target` keeps owning its descriptor number.
    #[inline]
    pub fn dup_onto(&self, target: &mut FdGuard) -> SysResult<()> {
        fs::dup2(self.fd, target.fd).map(|_| ())
    }

    #[inline]
    pub fn read(&self, buf: &mut [u8]) -> SysResult<usize> {
        fs::read(self.fd, buf)
    }

    #[inline]
    pub fn write(&self, buf: &[u8]) -> SysResult<usize> {
        fs::write(self.fd, buf)
    }

    #[inline]
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> SysResult<usize> {
        fs::pread(self.fd, buf, offset)
    }

    #[inline]
    pub fn write_at(&self, buf: &[u8], offset: u64) -> SysResult<usize> {
        fs::pwrite(self.fd, buf, offset)
    }

    /// Write all of `buf`, looping over short writes.
    pub fn write_all(&self, mut buf: &[u8]) -> SysResult<()> {
        while !buf.is_empty() {
            match self.write(buf)? {
                0 => return Err(Errno::EIO),
                n => buf = &buf[n..],
            }
        }
        Ok(())
    }

    #[inline]
    pub fn seek(&self, offset: i64, whence: Whence) -> SysResult<u64> {
        fs::lseek(self.fd, offset, whence)
    }

    #[inline]
    pub fn set_len(&self, len: u64) -> SysResult<()> {
        fs::ftruncate(self.fd, len)
    }

    #[inline]
    pub fn stat(&self) -> SysResult<KernelStat> {
        fs::fstat(self.fd)
    }
}

impl Drop for FdGuard {
    #[inline]
    fn drop(&mut self) {
        if let Err(err) = fs::close(self.fd) {
            klog_warn!("close({}) on drop failed: {}", self.fd, err);
        }
    }
}

impl core::fmt::Debug for FdGuard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("FdGuard").field(&self.fd).finish()
    }
}

impl AsRawFd for FdGuard {
    #[inline]
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl AsFd for FdGuard {
    #[inline]
    fn as_fd(&self) -> BorrowedFd<'_> {
        // SAFETY: the descriptor is open for as long as `self` is borrowed.
        unsafe { BorrowedFd::borrow_raw(self.fd) }
    }
}

impl IntoRawFd for FdGuard {
    #[inline]
    fn into_raw_fd(self) -> RawFd {
        self.into_raw()
    }
}

impl FromRawFd for FdGuard {
    #[inline]
    unsafe fn from_raw_fd(fd: RawFd) -> Self {
        unsafe { Self::from_raw(fd) }
    }
}

impl From<OwnedFd> for FdGuard {
    #[inline]
    fn from(fd: OwnedFd) -> Self {
        Self {
            fd: fd.into_raw_fd(),
        }
    }
}

impl From<FdGuard> for OwnedFd {
    #[inline]
    fn from(guard: FdGuard) -> Self {
        // SAFETY: ownership moves out of the guard, which will not close it.
        unsafe { OwnedFd::from_raw_fd(guard.into_raw()) }
    }
}

impl io::Read for FdGuard {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        FdGuard::read(self, buf).map_err(io::Error::from)
    }
}

impl io::Write for FdGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        FdGuard::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Seek for FdGuard {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let (offset, whence) = match pos {
            io::SeekFrom::Start(n) => {
                (i64::try_from(n).map_err(|_| io::Error::from(Errno::EINVAL))?, Whence::Set)
            }
            io::SeekFrom::Current(n) => (n, Whence::Cur),
            io::SeekFrom::End(n) => (n, Whence::End),
        };
        FdGuard::seek(self, offset, whence).map_err(io::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syscall::raw::script;
    use sysbase_abi::syscall::SYS_CLOSE;

    #[test]
    fn drop_closes_exactly_once() {
        script::reset();
        script::push(SYS_CLOSE, &[Ok(0), Ok(0)]);
        let guard = unsafe { FdGuard::from_raw(9_001) };
        let moved = guard;
        drop(moved);
        assert_eq!(script::remaining(SYS_CLOSE), 1);
        script::reset();
    }

    #[test]
    fn into_raw_releases_nothing() {
        script::reset();
        script::push(SYS_CLOSE, &[Ok(0)]);
        let guard = unsafe { FdGuard::from_raw(9_002) };
        assert_eq!(guard.into_raw(), 9_002);
        assert_eq!(script::remaining(SYS_CLOSE), 1);
        script::reset();
    }

    #[test]
    fn explicit_close_reports_interruption_without_second_close() {
        script::reset();
        script::push(SYS_CLOSE, &[Err(Errno::EINTR), Ok(0)]);
        let guard = unsafe { FdGuard::from_raw(9_003) };
        assert_eq!(guard.close(), Err(Errno::EINTR));
        assert_eq!(script::remaining(SYS_CLOSE), 1);
        script::reset();
    }

    #[test]
    fn failed_drop_close_is_swallowed() {
        script::reset();
        script::push(SYS_CLOSE, &[Err(Errno::EBADF)]);
        drop(unsafe { FdGuard::from_raw(9_004) });
        assert_eq!(script::remaining(SYS_CLOSE), 0);
        script::reset();
    }

    #[test]
    fn std_io_traits() {
        use std::io::{Read, Seek, SeekFrom, Write};

        let mut fd = FdGuard::memfd(c"std-io", MemfdFlags::CLOEXEC).unwrap();
        fd.write_all(b"abcdef").unwrap();
        assert_eq!(Seek::seek(&mut fd, SeekFrom::Start(2)).unwrap(), 2);
        let mut out = String::new();
        Read::read_to_string(&mut fd, &mut out).unwrap();
        assert_eq!(out, "cdef");
        Write::flush(&mut fd).unwrap();
    }
}
