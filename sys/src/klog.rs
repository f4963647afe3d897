//! Logging for the syscall layer.
//!
//! All library log output goes through the `klog_*!` macros, which forward to
//! the [`log`] facade under the `sysbase` target. Applications that already
//! install a `log` implementation see these records like any other;
//! applications that do not can install [`StderrBackend`] with [`init`] or
//! [`init_from_env`].
//!
//! # Backend contract
//!
//! [`StderrBackend`] formats each record into one line and writes it to
//! descriptor 2 with this crate's own `write` wrapper, so logging never
//! bypasses the invocation primitive. A per-thread guard drops records
//! emitted while a record is being written (the `syscall-trace` feature
//! would otherwise log the backend's own `write`).
//!
//! ```ignore
//! sysbase_sys::klog::init_from_env()?;
//! ```

use std::cell::Cell;
use std::str::FromStr;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use sysbase_abi::fs::STDERR_FILENO;

use crate::config::SYSPROBE_LOG_ENV;
use crate::syscall::error::{Errno, SysResult};
use crate::syscall::fs;

#[doc(hidden)]
pub use log as __log;

/// Target every record from this crate is logged under.
pub const TARGET: &str = "sysbase";

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

thread_local! {
    static IN_BACKEND: Cell<bool> = const { Cell::new(false) };
}

/// `log` backend writing one line per record to standard error.
pub struct StderrBackend {
    level: LevelFilter,
}

impl StderrBackend {
    pub const fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Log for StderrBackend {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        IN_BACKEND.with(|busy| {
            if busy.replace(true) {
                return;
            }
            let line = format!("[{:<5} {}] {}\n", record.level(), record.target(), record.args());
            let _ = write_stderr(line.as_bytes());
            busy.set(false);
        });
    }

    fn flush(&self) {}
}

fn write_stderr(mut bytes: &[u8]) -> SysResult<()> {
    while !bytes.is_empty() {
        match fs::write(STDERR_FILENO, bytes) {
            Ok(0) => return Err(Errno::EIO),
            Ok(n) => bytes = &bytes[n..],
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Install [`StderrBackend`] as the process-wide logger at `level`.
///
/// Fails if another logger is already installed.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(StderrBackend::new(level)))?;
    log::set_max_level(level);
    Ok(())
}

/// Install [`StderrBackend`] at the level named by `SYSBASE_LOG`
/// (`off`, `error`, `warn`, `info`, `debug`, `trace`; default `warn`).
pub fn init_from_env() -> Result<(), SetLoggerError> {
    init(level_from_env())
}

fn level_from_env() -> LevelFilter {
    std::env::var(SYSPROBE_LOG_ENV)
        .ok()
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or(LevelFilter::Warn)
}

pub fn set_level(level: LevelFilter) {
    log::set_max_level(level);
}

pub fn level() -> LevelFilter {
    log::max_level()
}

// ---------------------------------------------------------------------------
// Macros
// ---------------------------------------------------------------------------

#[macro_export]
macro_rules! klog_error {
    ($($arg:tt)*) => {
        $crate::klog::__log::error!(target: $crate::klog::TARGET, $($arg)*)
    };
}

#[macro_export]
macro_rules! klog_warn {
    ($($arg:tt)*) => {
        $crate::klog::__log::warn!(target: $crate::klog::TARGET, $($arg)*)
    };
}

#[macro_export]
macro_rules! klog_info {
    ($($arg:tt)*) => {
        $crate::klog::__log::info!(target: $crate::klog::TARGET, $($arg)*)
    };
}

#[macro_export]
macro_rules! klog_debug {
    ($($arg:tt)*) => {
        $crate::klog::__log::debug!(target: $crate::klog::TARGET, $($arg)*)
    };
}

#[macro_export]
macro_rules! klog_trace {
    ($($arg:tt)*) => {
        $crate::klog::__log::trace!(target: $crate::klog::TARGET, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn backend_filters_by_level() {
        let backend = StderrBackend::new(LevelFilter::Warn);
        let warn = Metadata::builder().level(Level::Warn).target(TARGET).build();
        let debug = Metadata::builder().level(Level::Debug).target(TARGET).build();
        assert!(backend.enabled(&warn));
        assert!(!backend.enabled(&debug));
    }

    #[test]
    fn reentrant_records_are_dropped() {
        IN_BACKEND.with(|busy| busy.set(true));
        let backend = StderrBackend::new(LevelFilter::Trace);
        // Would write to stderr if the guard did not hold.
        backend.log(&Record::builder().level(Level::Error).target(TARGET).args(format_args!("x")).build());
        IN_BACKEND.with(|busy| assert!(busy.get()));
        IN_BACKEND.with(|busy| busy.set(false));
    }
}
