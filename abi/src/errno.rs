//! Linux error numbers.
//!
//! [`Errno`] is the vocabulary every syscall wrapper reports failures in. The
//! values are the kernel's own (`include/uapi/asm-generic/errno-base.h` and
//! `errno.h`), so a raw `-errno` return converts without a lookup table.

use core::fmt;

/// An OS error number with a fixed human-readable description.
#[derive(Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Errno(i32);

impl Errno {
    /// Operation not permitted
    pub const EPERM: Self = Self(1);
    /// No such file or directory
    pub const ENOENT: Self = Self(2);
    /// No such process
    pub const ESRCH: Self = Self(3);
    /// Interrupted system call
    pub const EINTR: Self = Self(4);
    /// I/O error
    pub const EIO: Self = Self(5);
    /// No such device or address
    pub const ENXIO: Self = Self(6);
    /// Argument list too long
    pub const E2BIG: Self = Self(7);
    /// Exec format error
    pub const ENOEXEC: Self = Self(8);
    /// Bad file descriptor
    pub const EBADF: Self = Self(9);
    /// No child processes
    pub const ECHILD: Self = Self(10);
    /// Try again / Resource temporarily unavailable
    pub const EAGAIN: Self = Self(11);
    /// Operation would block (same value as `EAGAIN` on Linux)
    pub const EWOULDBLOCK: Self = Self::EAGAIN;
    /// Out of memory
    pub const ENOMEM: Self = Self(12);
    /// Permission denied
    pub const EACCES: Self = Self(13);
    /// Bad address
    pub const EFAULT: Self = Self(14);
    /// Block device required
    pub const ENOTBLK: Self = Self(15);
    /// Device or resource busy
    pub const EBUSY: Self = Self(16);
    /// File exists
    pub const EEXIST: Self = Self(17);
    /// Cross-device link
    pub const EXDEV: Self = Self(18);
    /// No such device
    pub const ENODEV: Self = Self(19);
    /// Not a directory
    pub const ENOTDIR: Self = Self(20);
    /// Is a directory
    pub const EISDIR: Self = Self(21);
    /// Invalid argument
    pub const EINVAL: Self = Self(22);
    /// File table overflow
    pub const ENFILE: Self = Self(23);
    /// Too many open files
    pub const EMFILE: Self = Self(24);
    /// Not a typewriter
    pub const ENOTTY: Self = Self(25);
    /// Text file busy
    pub const ETXTBSY: Self = Self(26);
    /// File too large
    pub const EFBIG: Self = Self(27);
    /// No space left on device
    pub const ENOSPC: Self = Self(28);
    /// Illegal seek
    pub const ESPIPE: Self = Self(29);
    /// Read-only file system
    pub const EROFS: Self = Self(30);
    /// Too many links
    pub const EMLINK: Self = Self(31);
    /// Broken pipe
    pub const EPIPE: Self = Self(32);
    /// Math argument out of domain
    pub const EDOM: Self = Self(33);
    /// Math result not representable
    pub const ERANGE: Self = Self(34);
    /// Resource deadlock would occur
    pub const EDEADLK: Self = Self(35);
    /// File name too long
    pub const ENAMETOOLONG: Self = Self(36);
    /// No record locks available
    pub const ENOLCK: Self = Self(37);
    /// Function not implemented
    pub const ENOSYS: Self = Self(38);
    /// Directory not empty
    pub const ENOTEMPTY: Self = Self(39);
    /// Too many symbolic links encountered
    pub const ELOOP: Self = Self(40);
    /// No data available
    pub const ENODATA: Self = Self(61);
    /// Value too large for defined data type
    pub const EOVERFLOW: Self = Self(75);
    /// Illegal byte sequence
    pub const EILSEQ: Self = Self(84);
    /// Operation not supported
    pub const EOPNOTSUPP: Self = Self(95);
    /// Address already in use
    pub const EADDRINUSE: Self = Self(98);
    /// Connection reset by peer
    pub const ECONNRESET: Self = Self(104);
    /// Connection timed out
    pub const ETIMEDOUT: Self = Self(110);
    /// Connection refused
    pub const ECONNREFUSED: Self = Self(111);
    /// Operation canceled
    pub const ECANCELED: Self = Self(125);

    /// Largest magnitude the kernel uses for an error return.
    ///
    /// Raw returns in `[-MAX_ERRNO, -1]` are errors; anything else is a value.
    pub const MAX_ERRNO: i32 = 4095;

    /// Create an `Errno` from a raw (positive) errno value.
    #[inline]
    pub const fn from_raw(errno: i32) -> Self {
        Self(errno)
    }

    /// Get the raw errno value.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Get a human-readable description of the error.
    pub const fn as_str(self) -> &'static str {
        match self.0 {
            1 => "Operation not permitted",
            2 => "No such file or directory",
            3 => "No such process",
            4 => "Interrupted system call",
            5 => "I/O error",
            6 => "No such device or address",
            7 => "Argument list too long",
            8 => "Exec format error",
            9 => "Bad file descriptor",
            10 => "No child processes",
            11 => "Resource temporarily unavailable",
            12 => "Out of memory",
            13 => "Permission denied",
            14 => "Bad address",
            15 => "Block device required",
            16 => "Device or resource busy",
            17 => "File exists",
            18 => "Cross-device link",
            19 => "No such device",
            20 => "Not a directory",
            21 => "Is a directory",
            22 => "Invalid argument",
            23 => "Too many open files in system",
            24 => "Too many open files",
            25 => "Inappropriate ioctl for device",
            26 => "Text file busy",
            27 => "File too large",
            28 => "No space left on device",
            29 => "Illegal seek",
            30 => "Read-only file system",
            31 => "Too many links",
            32 => "Broken pipe",
            33 => "Numerical argument out of domain",
            34 => "Numerical result out of range",
            35 => "Resource deadlock avoided",
            36 => "File name too long",
            37 => "No locks available",
            38 => "Function not implemented",
            39 => "Directory not empty",
            40 => "Too many levels of symbolic links",
            61 => "No data available",
            75 => "Value too large for defined data type",
            84 => "Invalid or incomplete multibyte or wide character",
            95 => "Operation not supported",
            98 => "Address already in use",
            104 => "Connection reset by peer",
            110 => "Connection timed out",
            111 => "Connection refused",
            125 => "Operation canceled",
            _ => "Unknown error",
        }
    }
}

impl fmt::Debug for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Errno({}: {})", self.0, self.as_str())
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::error::Error for Errno {}

#[cfg(feature = "std")]
impl From<Errno> for std::io::Error {
    fn from(err: Errno) -> Self {
        std::io::Error::from_raw_os_error(err.raw())
    }
}
