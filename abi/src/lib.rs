//! sysbase kernel ABI types
//!
//! This crate provides the canonical definitions of everything the wrapper
//! layer exchanges with the Linux kernel: error numbers, syscall numbers,
//! flag bit values and `#[repr(C)]` structure layouts. Having a single source
//! of truth keeps the values bit-for-bit identical to the kernel's and keeps
//! `unsafe` out of this crate entirely.

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

#[cfg(not(all(target_os = "linux", target_arch = "x86_64")))]
compile_error!("sysbase-abi describes the Linux x86_64 kernel ABI only");

pub mod errno;
pub mod fs;
pub mod mmap;
pub mod signal;
pub mod syscall;
pub mod wait;

pub use errno::Errno;
pub use fs::{AT_FDCWD, KernelStat, MemfdFlags, Mode, OpenFlags, PidfdFlags, RawFd, Whence};
pub use mmap::{MapFlags, MsyncFlags, PAGE_SIZE, Prot, Share};
pub use signal::{How, RESERVED_SIGNALS, SIGCANCEL, SIGSETXID, SigSet};
pub use syscall::SyscallKind;
pub use wait::{ChildState, IdType, Pid, SigInfo, WaitOptions};
