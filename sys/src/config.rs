//! Compile-time tunables.

/// Attempts `dup2` makes while the kernel keeps answering `EBUSY` before the
/// error is surfaced to the caller.
pub const DUP2_BUSY_RETRY_LIMIT: usize = 1024;

/// Default buffer size of [`BufReader`](crate::io::BufReader) and
/// [`BufWriter`](crate::io::BufWriter).
pub const DEFAULT_BUF_CAPACITY: usize = 8 * 1024;

/// Environment variable read by [`klog::init_from_env`](crate::klog::init_from_env).
pub const SYSPROBE_LOG_ENV: &str = "SYSBASE_LOG";

pub use sysbase_abi::PAGE_SIZE;
