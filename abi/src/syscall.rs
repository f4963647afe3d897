//! Syscall number definitions (Linux x86_64).
//!
//! This module is the **single source of truth** for the syscall numbers the
//! workspace issues. The `SYS_` constants are the kernel's table entries; the
//! [`SyscallKind`] enum is the closed set of calls the wrapper layer knows how
//! to issue, so per-call policy can be selected with a `match` instead of a
//! raw integer.
//!
//! # Adding New Syscalls
//!
//! 1. Add the `SYS_` constant here, grouped with related calls
//! 2. Add a [`SyscallKind`] variant and extend `nr()` / `name()`
//! 3. Give it a policy in `sysbase_sys::syscall::invoke`

// =============================================================================
// File descriptors
// =============================================================================

pub const SYS_READ: u64 = 0;
pub const SYS_WRITE: u64 = 1;
pub const SYS_CLOSE: u64 = 3;
pub const SYS_FSTAT: u64 = 5;
pub const SYS_LSEEK: u64 = 8;
pub const SYS_PREAD64: u64 = 17;
pub const SYS_PWRITE64: u64 = 18;
pub const SYS_DUP: u64 = 32;
pub const SYS_DUP2: u64 = 33;
pub const SYS_FTRUNCATE: u64 = 77;
pub const SYS_OPENAT: u64 = 257;
pub const SYS_UNLINKAT: u64 = 263;
pub const SYS_PIPE2: u64 = 293;
pub const SYS_MEMFD_CREATE: u64 = 319;
pub const SYS_MEMFD_SECRET: u64 = 447;

// =============================================================================
// Memory
// =============================================================================

pub const SYS_MMAP: u64 = 9;
pub const SYS_MUNMAP: u64 = 11;
pub const SYS_MSYNC: u64 = 26;

// =============================================================================
// Signals
// =============================================================================

pub const SYS_RT_SIGPROCMASK: u64 = 14;

// =============================================================================
// Process control
// =============================================================================

pub const SYS_GETPID: u64 = 39;
pub const SYS_CLONE: u64 = 56;
pub const SYS_EXECVE: u64 = 59;
pub const SYS_EXIT_GROUP: u64 = 231;
pub const SYS_WAITID: u64 = 247;
pub const SYS_PIDFD_SEND_SIGNAL: u64 = 424;
pub const SYS_PIDFD_OPEN: u64 = 434;

/// Every kernel call the wrapper layer issues through the invocation primitive.
///
/// `fork` is absent: it goes through the C runtime and reports failure
/// through `errno`, not through an inline return code. The vfork-style
/// `clone` is issued from a single asm block so the child never returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyscallKind {
    Read,
    Write,
    Pread,
    Pwrite,
    Open,
    Unlink,
    Close,
    Dup,
    Dup2,
    Lseek,
    Ftruncate,
    Fstat,
    Pipe2,
    MemfdCreate,
    MemfdSecret,
    Mmap,
    Munmap,
    Msync,
    SigProcMask,
    GetPid,
    Execve,
    ExitGroup,
    Waitid,
    PidfdOpen,
    PidfdSendSignal,
}

impl SyscallKind {
    /// Kernel syscall number.
    pub const fn nr(self) -> u64 {
        match self {
            Self::Read => SYS_READ,
            Self::Write => SYS_WRITE,
            Self::Pread => SYS_PREAD64,
            Self::Pwrite => SYS_PWRITE64,
            Self::Open => SYS_OPENAT,
            Self::Unlink => SYS_UNLINKAT,
            Self::Close => SYS_CLOSE,
            Self::Dup => SYS_DUP,
            Self::Dup2 => SYS_DUP2,
            Self::Lseek => SYS_LSEEK,
            Self::Ftruncate => SYS_FTRUNCATE,
            Self::Fstat => SYS_FSTAT,
            Self::Pipe2 => SYS_PIPE2,
            Self::MemfdCreate => SYS_MEMFD_CREATE,
            Self::MemfdSecret => SYS_MEMFD_SECRET,
            Self::Mmap => SYS_MMAP,
            Self::Munmap => SYS_MUNMAP,
            Self::Msync => SYS_MSYNC,
            Self::SigProcMask => SYS_RT_SIGPROCMASK,
            Self::GetPid => SYS_GETPID,
            Self::Execve => SYS_EXECVE,
            Self::ExitGroup => SYS_EXIT_GROUP,
            Self::Waitid => SYS_WAITID,
            Self::PidfdOpen => SYS_PIDFD_OPEN,
            Self::PidfdSendSignal => SYS_PIDFD_SEND_SIGNAL,
        }
    }

    /// Kernel name of the call, for logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Pread => "pread64",
            Self::Pwrite => "pwrite64",
            Self::Open => "openat",
            Self::Unlink => "unlinkat",
            Self::Close => "close",
            Self::Dup => "dup",
            Self::Dup2 => "dup2",
            Self::Lseek => "lseek",
            Self::Ftruncate => "ftruncate",
            Self::Fstat => "fstat",
            Self::Pipe2 => "pipe2",
            Self::MemfdCreate => "memfd_create",
            Self::MemfdSecret => "memfd_secret",
            Self::Mmap => "mmap",
            Self::Munmap => "munmap",
            Self::Msync => "msync",
            Self::SigProcMask => "rt_sigprocmask",
            Self::GetPid => "getpid",
            Self::Execve => "execve",
            Self::ExitGroup => "exit_group",
            Self::Waitid => "waitid",
            Self::PidfdOpen => "pidfd_open",
            Self::PidfdSendSignal => "pidfd_send_signal",
        }
    }
}
