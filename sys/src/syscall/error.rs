//! Syscall result algebra.
//!
//! Every wrapper returns a [`SysResult`]. The `demux()` function is the single
//! point where a raw kernel return becomes `Ok` or `Err`; nothing else in the
//! crate builds an `Ok` from a kernel value.

use std::io;

pub use sysbase_abi::Errno;

/// Result type for syscall operations.
pub type SysResult<T> = Result<T, Errno>;

/// Convert a raw syscall return value to a Result (SINGLE CONVERSION POINT).
///
/// Linux convention: values in `[-4095, -1]` are `-errno`. Everything else is
/// a value, including addresses returned by `mmap` that look negative when
/// reinterpreted as signed.
#[inline]
pub fn demux(value: u64) -> SysResult<u64> {
    let signed = value as i64;
    if signed >= -(Errno::MAX_ERRNO as i64) && signed < 0 {
        Err(Errno::from_raw((-signed) as i32))
    } else {
        Ok(value)
    }
}

/// Convert a Result back to a raw syscall return value.
///
/// This is the inverse of `demux()`.
#[inline]
pub fn mux(result: SysResult<u64>) -> u64 {
    match result {
        Ok(v) => v,
        Err(e) => (-(e.raw() as i64)) as u64,
    }
}

/// Read the calling thread's C-runtime `errno`.
///
/// Only meaningful right after a libc call that reported failure through its
/// own sentinel (`fork`).
#[inline]
pub fn last_errno() -> Errno {
    // SAFETY: `__errno_location` always returns a valid pointer to the
    // calling thread's errno slot.
    Errno::from_raw(unsafe { *libc::__errno_location() })
}

/// Adapter from the explicit-value error model to `std::io`.
pub trait SysResultExt<T> {
    /// Convert to an `io::Result`, keeping the raw OS error number.
    fn into_io(self) -> io::Result<T>;
}

impl<T> SysResultExt<T> for SysResult<T> {
    #[inline]
    fn into_io(self) -> io::Result<T> {
        self.map_err(io::Error::from)
    }
}
