//! Layered syscall API for Linux x86_64.
//!
//! - **Layer 1** (`raw`): inline assembly primitives
//! - **Layer 2** (`error`): `SysResult` and the `demux()` conversion point
//! - **Layer 3** (`invoke`): per-call cancellation and retry policy
//! - **Layer 4** (domain modules): typed wrappers
//! - **Layer 5** (`crate::wrappers`): owning types
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `raw` | Inline asm syscall primitives |
//! | `error` | `SysResult`, `demux()`, `last_errno()` |
//! | `invoke` | `call()`, `Policy` |
//! | `arg` | NUL-terminated string arguments |
//! | `fs` | open, close, dup, dup2, lseek, ftruncate, read/write, pipe2, fstat |
//! | `memfd` | memfd_create, memfd_secret |
//! | `memory` | mmap, munmap, msync |
//! | `process` | fork, vfork_exec, spawn, execve, waitid, exit, pidfd |
//! | `signal` | sigprocmask |

pub mod arg;
pub mod error;
pub mod fs;
pub mod invoke;
pub mod memfd;
pub mod memory;
pub mod process;
pub mod raw;
pub mod signal;

pub use arg::PathArg;
pub use error::{Errno, SysResult, SysResultExt, demux, last_errno};
pub use fs::Dir;
pub use process::{Fork, WaitOn, WaitStatus};
