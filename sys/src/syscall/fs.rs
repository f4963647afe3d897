//! File descriptor operations.
//!
//! Free functions over raw descriptors. They carry no ownership; use
//! [`FdGuard`](crate::wrappers::fd::FdGuard) to tie a descriptor's lifetime to
//! a value.

use sysbase_abi::fs::AT_REMOVEDIR;
use sysbase_abi::{AT_FDCWD, KernelStat, Mode, OpenFlags, RawFd, SyscallKind, Whence};

use super::arg::PathArg;
use super::error::{Errno, SysResult};
use super::invoke::call;

/// Directory a relative path passed to [`openat`] is resolved against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    /// The current working directory (`AT_FDCWD`).
    Cwd,
    /// An open directory descriptor.
    Fd(RawFd),
}

impl Dir {
    #[inline]
    pub const fn raw(self) -> RawFd {
        match self {
            Dir::Cwd => AT_FDCWD,
            Dir::Fd(fd) => fd,
        }
    }
}

/// Open a file relative to the current directory.
///
/// `O_LARGEFILE` is always added to `flags`.
///
/// # Errors
/// * `ENOENT` - a path component does not exist and `CREAT` was not given
/// * `EACCES` - permission denied
/// * `EINTR` - interrupted (cancellation point, never retried)
#[inline]
pub fn open<P: PathArg + ?Sized>(path: &P, flags: OpenFlags, mode: Mode) -> SysResult<RawFd> {
    openat(Dir::Cwd, path, flags, mode)
}

/// Open a file relative to `dir`.
pub fn openat<P: PathArg + ?Sized>(
    dir: Dir,
    path: &P,
    flags: OpenFlags,
    mode: Mode,
) -> SysResult<RawFd> {
    let path = path.to_c_str()?;
    let flags = flags | OpenFlags::LARGEFILE;
    unsafe {
        call(
            SyscallKind::Open,
            &[
                dir.raw() as u64,
                path.as_ptr() as u64,
                flags.bits() as u64,
                mode.bits() as u64,
            ],
        )
    }
    .map(|fd| fd as RawFd)
}

/// Remove a directory entry relative to `dir`. With `remove_dir`, the entry
/// must be an empty directory.
pub fn unlinkat<P: PathArg + ?Sized>(dir: Dir, path: &P, remove_dir: bool) -> SysResult<()> {
    let path = path.to_c_str()?;
    let flags = if remove_dir { AT_REMOVEDIR } else { 0 };
    unsafe {
        call(
            SyscallKind::Unlink,
            &[dir.raw() as u64, path.as_ptr() as u64, flags as u64],
        )
    }
    .map(|_| ())
}

/// Close a file descriptor.
///
/// Cancellation-trapped: `EINTR` is returned, never retried. The kernel has
/// released the descriptor by then, so the caller must not close it again.
///
/// # Errors
/// * `EBADF` - not an open descriptor
/// * `EINTR` - interrupted
/// * `EIO` - deferred write error
#[inline]
pub fn close(fd: RawFd) -> SysResult<()> {
    unsafe { call(SyscallKind::Close, &[fd as u64]) }.map(|_| ())
}

/// Duplicate `fd` onto the lowest free descriptor number.
#[inline]
pub fn dup(fd: RawFd) -> SysResult<RawFd> {
    unsafe { call(SyscallKind::Dup, &[fd as u64]) }.map(|fd| fd as RawFd)
}

/// Make `new` refer to the same open file as `old`, closing `new` first if
/// it was open.
///
/// `EBUSY` (a race with a concurrent `open`) is retried a bounded number of
/// times; every other error is returned immediately.
#[inline]
pub fn dup2(old: RawFd, new: RawFd) -> SysResult<RawFd> {
    unsafe { call(SyscallKind::Dup2, &[old as u64, new as u64]) }.map(|fd| fd as RawFd)
}

/// Reposition the file offset. Returns the new offset from the start.
///
/// # Errors
/// * `EINVAL` - resulting offset would be negative
/// * `ESPIPE` - `fd` is a pipe, socket or FIFO
/// * `ENXIO` - no data/hole past `offset` for `Whence::Data`/`Whence::Hole`
#[inline]
pub fn lseek(fd: RawFd, offset: i64, whence: Whence) -> SysResult<u64> {
    unsafe { call(SyscallKind::Lseek, &[fd as u64, offset as u64, whence as u64]) }
}

/// Set the size of the file to exactly `len` bytes.
///
/// # Errors
/// * `EINVAL` - `fd` is not open for writing or not a regular file/memfd
/// * `EBADF` - not an open descriptor
#[inline]
pub fn ftruncate(fd: RawFd, len: u64) -> SysResult<()> {
    if len > i64::MAX as u64 {
        return Err(Errno::EINVAL);
    }
    unsafe { call(SyscallKind::Ftruncate, &[fd as u64, len]) }.map(|_| ())
}

/// Read into `buf`. Returns the number of bytes read, `0` at end of file.
#[inline]
pub fn read(fd: RawFd, buf: &mut [u8]) -> SysResult<usize> {
    unsafe {
        call(
            SyscallKind::Read,
            &[fd as u64, buf.as_mut_ptr() as u64, buf.len() as u64],
        )
    }
    .map(|n| n as usize)
}

/// Write from `buf`. Returns the number of bytes written.
#[inline]
pub fn write(fd: RawFd, buf: &[u8]) -> SysResult<usize> {
    unsafe {
        call(
            SyscallKind::Write,
            &[fd as u64, buf.as_ptr() as u64, buf.len() as u64],
        )
    }
    .map(|n| n as usize)
}

/// Read at `offset` without moving the file offset.
#[inline]
pub fn pread(fd: RawFd, buf: &mut [u8], offset: u64) -> SysResult<usize> {
    unsafe {
        call(
            SyscallKind::Pread,
            &[fd as u64, buf.as_mut_ptr() as u64, buf.len() as u64, offset],
        )
    }
    .map(|n| n as usize)
}

/// Write at `offset` without moving the file offset.
#[inline]
pub fn pwrite(fd: RawFd, buf: &[u8], offset: u64) -> SysResult<usize> {
    unsafe {
        call(
            SyscallKind::Pwrite,
            &[fd as u64, buf.as_ptr() as u64, buf.len() as u64, offset],
        )
    }
    .map(|n| n as usize)
}

/// Create a pipe. Returns `[read_end, write_end]`.
///
/// Only `CLOEXEC`, `NONBLOCK` and `DIRECT` are meaningful in `flags`.
pub fn pipe2(flags: OpenFlags) -> SysResult<[RawFd; 2]> {
    let mut fds: [RawFd; 2] = [-1; 2];
    unsafe {
        call(
            SyscallKind::Pipe2,
            &[fds.as_mut_ptr() as u64, flags.bits() as u64],
        )
    }?;
    Ok(fds)
}

/// File status of an open descriptor.
pub fn fstat(fd: RawFd) -> SysResult<KernelStat> {
    let mut stat = KernelStat::default();
    unsafe {
        call(
            SyscallKind::Fstat,
            &[fd as u64, &mut stat as *mut KernelStat as u64],
        )
    }?;
    Ok(stat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syscall::raw::script;
    use sysbase_abi::syscall::{SYS_CLOSE, SYS_DUP2};

    #[test]
    fn dup2_rides_out_busy() {
        script::reset();
        script::push(
            SYS_DUP2,
            &[Err(Errno::EBUSY), Err(Errno::EBUSY), Err(Errno::EBUSY), Ok(7)],
        );
        assert_eq!(dup2(3, 7), Ok(7));
        assert_eq!(script::remaining(SYS_DUP2), 0);
        script::reset();
    }

    #[test]
    fn dup2_does_not_retry_other_errors() {
        script::reset();
        script::push(SYS_DUP2, &[Err(Errno::EBADF), Ok(7)]);
        assert_eq!(dup2(3, 7), Err(Errno::EBADF));
        assert_eq!(script::remaining(SYS_DUP2), 1);
        script::reset();
    }

    #[test]
    fn interrupted_close_is_surfaced_once() {
        script::reset();
        script::push(SYS_CLOSE, &[Err(Errno::EINTR), Ok(0)]);
        assert_eq!(close(42), Err(Errno::EINTR));
        assert_eq!(script::remaining(SYS_CLOSE), 1);
        script::reset();
    }

    #[test]
    fn dir_sentinel() {
        assert_eq!(Dir::Cwd.raw(), -100);
        assert_eq!(Dir::Fd(5).raw(), 5);
    }

    #[test]
    fn pipe_round_trip() {
        let [r, w] = pipe2(OpenFlags::CLOEXEC).unwrap();
        assert_eq!(write(w, b"ping").unwrap(), 4);
        let mut buf = [0u8; 8];
        assert_eq!(read(r, &mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], b"ping");
        assert_eq!(lseek(r, 0, Whence::Set), Err(Errno::ESPIPE));
        let st = fstat(r).unwrap();
        assert_eq!(st.st_mode & sysbase_abi::fs::S_IFMT, sysbase_abi::fs::S_IFIFO);
        close(r).unwrap();
        close(w).unwrap();
    }

    #[test]
    fn bad_descriptor() {
        assert_eq!(fstat(-1).unwrap_err(), Errno::EBADF);
        assert_eq!(dup(-1), Err(Errno::EBADF));
    }
}
