//! String arguments passed to the kernel.
//!
//! Paths, memfd names and `execve` arguments must reach the kernel as
//! NUL-terminated strings. [`PathArg`] accepts a borrowed `&CStr` (including
//! `c"literal"`, no allocation) or any runtime string, which is copied into a
//! `CString`. A runtime string with an interior NUL is rejected with `EINVAL`
//! before any kernel call.

use std::borrow::Cow;
use std::ffi::{CStr, CString, OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use super::error::{Errno, SysResult};

pub trait PathArg {
    fn to_c_str(&self) -> SysResult<Cow<'_, CStr>>;
}

fn owned(bytes: &[u8]) -> SysResult<Cow<'static, CStr>> {
    CString::new(bytes)
        .map(Cow::Owned)
        .map_err(|_| Errno::EINVAL)
}

impl PathArg for CStr {
    #[inline]
    fn to_c_str(&self) -> SysResult<Cow<'_, CStr>> {
        Ok(Cow::Borrowed(self))
    }
}

impl PathArg for CString {
    #[inline]
    fn to_c_str(&self) -> SysResult<Cow<'_, CStr>> {
        Ok(Cow::Borrowed(self.as_c_str()))
    }
}

impl PathArg for str {
    fn to_c_str(&self) -> SysResult<Cow<'_, CStr>> {
        owned(self.as_bytes())
    }
}

impl PathArg for String {
    fn to_c_str(&self) -> SysResult<Cow<'_, CStr>> {
        owned(self.as_bytes())
    }
}

impl PathArg for OsStr {
    fn to_c_str(&self) -> SysResult<Cow<'_, CStr>> {
        owned(self.as_bytes())
    }
}

impl PathArg for OsString {
    fn to_c_str(&self) -> SysResult<Cow<'_, CStr>> {
        owned(self.as_bytes())
    }
}

impl PathArg for Path {
    fn to_c_str(&self) -> SysResult<Cow<'_, CStr>> {
        owned(self.as_os_str().as_bytes())
    }
}

impl PathArg for PathBuf {
    fn to_c_str(&self) -> SysResult<Cow<'_, CStr>> {
        owned(self.as_os_str().as_bytes())
    }
}

impl<T: PathArg + ?Sized> PathArg for &T {
    #[inline]
    fn to_c_str(&self) -> SysResult<Cow<'_, CStr>> {
        (**self).to_c_str()
    }
}

/// A NULL-terminated array of C string pointers for `execve`.
///
/// Owns the converted strings so the pointers stay valid while it lives.
pub(crate) struct CStrVec<'a> {
    _strings: Vec<Cow<'a, CStr>>,
    ptrs: Vec<*const libc::c_char>,
}

impl<'a> CStrVec<'a> {
    pub fn new<A: PathArg + 'a>(items: &'a [A]) -> SysResult<Self> {
        let strings = items
            .iter()
            .map(PathArg::to_c_str)
            .collect::<SysResult<Vec<_>>>()?;
        let mut ptrs: Vec<*const libc::c_char> = strings.iter().map(|s| s.as_ptr()).collect();
        ptrs.push(core::ptr::null());
        Ok(Self {
            _strings: strings,
            ptrs,
        })
    }

    #[inline]
    pub fn as_ptr(&self) -> *const *const libc::c_char {
        self.ptrs.as_ptr()
    }
}
