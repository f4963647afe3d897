//! File and descriptor ABI types: open flags, modes, seek origins, memfd and
//! pidfd flags, and the kernel `struct stat` layout.

use bitflags::bitflags;

/// Raw descriptor value. Carries no ownership.
pub type RawFd = i32;

/// `dirfd` sentinel meaning "relative to the current working directory".
pub const AT_FDCWD: RawFd = -100;

/// `unlinkat` flag: remove a directory instead of a file.
pub const AT_REMOVEDIR: u32 = 0x200;

/// Standard input descriptor
pub const STDIN_FILENO: RawFd = 0;
/// Standard output descriptor
pub const STDOUT_FILENO: RawFd = 1;
/// Standard error descriptor
pub const STDERR_FILENO: RawFd = 2;

bitflags! {
    /// `open(2)` flags, Linux x86_64 values.
    ///
    /// `RDONLY` is zero, so test the access mode with [`OpenFlags::access_mode`]
    /// rather than `contains`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct OpenFlags: u32 {
        const RDONLY    = 0o0;
        const WRONLY    = 0o1;
        const RDWR      = 0o2;
        const CREAT     = 0o100;
        const EXCL      = 0o200;
        const NOCTTY    = 0o400;
        const TRUNC     = 0o1000;
        const APPEND    = 0o2000;
        const NONBLOCK  = 0o4000;
        const DSYNC     = 0o10000;
        const DIRECT    = 0o40000;
        /// Allow offsets past 2 GiB. Always forced on by the open wrappers.
        const LARGEFILE = 0o100000;
        const DIRECTORY = 0o200000;
        const NOFOLLOW  = 0o400000;
        const NOATIME   = 0o1000000;
        const CLOEXEC   = 0o2000000;
        const SYNC      = 0o4010000;
        const PATH      = 0o10000000;
        const TMPFILE   = 0o20200000;
    }
}

impl OpenFlags {
    const ACCMODE: u32 = 0o3;

    /// The access-mode bits only (`RDONLY`, `WRONLY` or `RDWR`).
    #[inline]
    pub const fn access_mode(self) -> u32 {
        self.bits() & Self::ACCMODE
    }
}

bitflags! {
    /// File permission bits passed as `mode` to `open(2)`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Mode: u32 {
        const SUID = 0o4000;
        const SGID = 0o2000;
        const SVTX = 0o1000;
        const RWXU = 0o700;
        const RUSR = 0o400;
        const WUSR = 0o200;
        const XUSR = 0o100;
        const RWXG = 0o070;
        const RGRP = 0o040;
        const WGRP = 0o020;
        const XGRP = 0o010;
        const RWXO = 0o007;
        const ROTH = 0o004;
        const WOTH = 0o002;
        const XOTH = 0o001;
    }
}

impl Mode {
    /// Build a mode from octal permission bits, e.g. `Mode::octal(0o644)`.
    #[inline]
    pub const fn octal(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }
}

/// Origin for `lseek(2)`.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Whence {
    /// Absolute offset
    Set = 0,
    /// Relative to the current offset
    Cur = 1,
    /// Relative to the end of the file
    End = 2,
    /// Next data region at or after the offset
    Data = 3,
    /// Next hole at or after the offset
    Hole = 4,
}

bitflags! {
    /// `memfd_create(2)` flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MemfdFlags: u32 {
        const CLOEXEC       = 0x0001;
        const ALLOW_SEALING = 0x0002;
        const HUGETLB       = 0x0004;
        const NOEXEC_SEAL   = 0x0008;
        const EXEC          = 0x0010;
    }
}

/// Flag value `memfd_secret(2)` accepts for close-on-exec (it reuses `O_CLOEXEC`).
pub const MEMFD_SECRET_CLOEXEC: u32 = OpenFlags::CLOEXEC.bits();

bitflags! {
    /// `pidfd_open(2)` flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PidfdFlags: u32 {
        /// Return a non-blocking pidfd (`O_NONBLOCK`).
        const NONBLOCK = 0o4000;
        /// Refer to a thread rather than a thread-group leader (`O_EXCL`).
        const THREAD   = 0o200;
    }
}

/// Kernel `struct stat` as filled by `fstat(2)` on x86_64.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KernelStat {
    pub st_dev: u64,
    pub st_ino: u64,
    pub st_nlink: u64,
    pub st_mode: u32,
    pub st_uid: u32,
    pub st_gid: u32,
    pub __pad0: i32,
    pub st_rdev: u64,
    pub st_size: i64,
    pub st_blksize: i64,
    pub st_blocks: i64,
    pub st_atime: i64,
    pub st_atime_nsec: i64,
    pub st_mtime: i64,
    pub st_mtime_nsec: i64,
    pub st_ctime: i64,
    pub st_ctime_nsec: i64,
    pub __unused: [i64; 3],
}

const _: () = assert!(core::mem::size_of::<KernelStat>() == 144);

/// File type mask within `st_mode`.
pub const S_IFMT: u32 = 0o170000;
/// Regular file
pub const S_IFREG: u32 = 0o100000;
/// Directory
pub const S_IFDIR: u32 = 0o040000;
/// FIFO / pipe
pub const S_IFIFO: u32 = 0o010000;
