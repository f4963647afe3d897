//! Helpers for binaries built on this crate.

use crate::io::{FdRef, Sink};
use crate::syscall::error::Errno;
use crate::syscall::process;

/// Print `error: <context>: <description>` to standard error and exit with
/// status 1.
pub fn die(context: &str, err: Errno) -> ! {
    let line = format!("error: {context}: {err}\n");
    let mut bytes = line.as_bytes();
    let mut stderr = FdRef::STDERR;
    while let Ok(n @ 1..) = stderr.write_bytes(bytes) {
        bytes = &bytes[n..];
        if bytes.is_empty() {
            break;
        }
    }
    process::exit(1)
}

/// Unwrap a [`SysResult`](crate::SysResult) or [`die`] with a context message.
///
/// ```ignore
/// let fd = unwrap_or_exit!(FdGuard::open(path, flags, mode), "open");
/// ```
#[macro_export]
macro_rules! unwrap_or_exit {
    ($result:expr, $($ctx:tt)+) => {
        match $result {
            Ok(v) => v,
            Err(e) => $crate::util::die(&::std::format!($($ctx)+), e),
        }
    };
}
