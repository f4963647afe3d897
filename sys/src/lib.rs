//! sysbase: typed Linux x86_64 system calls.
//!
//! Every kernel call is issued by [`syscall::invoke::call`], which classifies
//! the raw return into a [`SysResult`] and applies that call's cancellation
//! and retry policy. On top sit typed wrappers ([`syscall`]), owning handles
//! ([`FdGuard`], [`Mapping`]) and buffered I/O ([`io`]).
//!
//! ```ignore
//! use sysbase_sys::{FdGuard, Whence};
//! use sysbase_abi::MemfdFlags;
//!
//! let fd = FdGuard::memfd(c"scratch", MemfdFlags::CLOEXEC)?;
//! fd.write_all(b"hello")?;
//! fd.seek(0, Whence::Set)?;
//! ```

pub mod config;
pub mod io;
pub mod klog;
pub mod syscall;
pub mod util;
pub mod wrappers;

pub use syscall::{Errno, PathArg, SysResult, SysResultExt};
pub use sysbase_abi::{How, MemfdFlags, Mode, OpenFlags, Prot, RawFd, Share, SigSet, Whence};
pub use wrappers::fd::FdGuard;
pub use wrappers::mmap::Mapping;
