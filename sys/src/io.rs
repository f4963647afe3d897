//! Buffered sequential I/O over descriptors and mappings.
//!
//! [`Source`] and [`Sink`] are the byte-moving seams; [`BufReader`] and
//! [`BufWriter`] add buffering on top. A reader refill issues exactly one
//! `Source::read_bytes`; a writer reaches its sink only when the buffer is
//! full, on [`BufWriter::flush`], or on drop.

use core::fmt;

use sysbase_abi::RawFd;

use crate::config::DEFAULT_BUF_CAPACITY;
use crate::klog_warn;
use crate::syscall::error::{Errno, SysResult};
use crate::syscall::fs;
use crate::wrappers::fd::FdGuard;
use crate::wrappers::mmap::Mapping;

pub trait Source {
    /// Read up to `buf.len()` bytes; `Ok(0)` means end of input.
    fn read_bytes(&mut self, buf: &mut [u8]) -> SysResult<usize>;
}

pub trait Sink {
    /// Write some prefix of `buf`; returns how much was accepted.
    fn write_bytes(&mut self, buf: &[u8]) -> SysResult<usize>;
}

impl<T: Source + ?Sized> Source for &mut T {
    #[inline]
    fn read_bytes(&mut self, buf: &mut [u8]) -> SysResult<usize> {
        (**self).read_bytes(buf)
    }
}

impl<T: Sink + ?Sized> Sink for &mut T {
    #[inline]
    fn write_bytes(&mut self, buf: &[u8]) -> SysResult<usize> {
        (**self).write_bytes(buf)
    }
}

impl Source for FdGuard {
    #[inline]
    fn read_bytes(&mut self, buf: &mut [u8]) -> SysResult<usize> {
        self.read(buf)
    }
}

impl Sink for FdGuard {
    #[inline]
    fn write_bytes(&mut self, buf: &[u8]) -> SysResult<usize> {
        self.write(buf)
    }
}

/// A descriptor used without ownership, e.g. standard output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FdRef(pub RawFd);

impl FdRef {
    pub const STDIN: Self = Self(sysbase_abi::fs::STDIN_FILENO);
    pub const STDOUT: Self = Self(sysbase_abi::fs::STDOUT_FILENO);
    pub const STDERR: Self = Self(sysbase_abi::fs::STDERR_FILENO);
}

impl Source for FdRef {
    #[inline]
    fn read_bytes(&mut self, buf: &mut [u8]) -> SysResult<usize> {
        fs::read(self.0, buf)
    }
}

impl Sink for FdRef {
    #[inline]
    fn write_bytes(&mut self, buf: &[u8]) -> SysResult<usize> {
        fs::write(self.0, buf)
    }
}

/// Sequential cursor over a [`Mapping`]. No kernel calls.
///
/// Writing past the end fails with `ENOSPC`; writing to a read-only mapping
/// fails with `EACCES`.
#[derive(Debug)]
pub struct MapCursor<'a> {
    map: &'a mut Mapping,
    pos: usize,
}

impl<'a> MapCursor<'a> {
    pub fn new(map: &'a mut Mapping) -> Self {
        Self { map, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move to `pos`, clamped to the mapping length.
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.map.len());
    }
}

impl Source for MapCursor<'_> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> SysResult<usize> {
        let rest = &self.map.as_slice()[self.pos..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl Sink for MapCursor<'_> {
    fn write_bytes(&mut self, buf: &[u8]) -> SysResult<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let pos = self.pos;
        let rest = &mut self.map.as_mut_slice()?[pos..];
        if rest.is_empty() {
            return Err(Errno::ENOSPC);
        }
        let n = rest.len().min(buf.len());
        rest[..n].copy_from_slice(&buf[..n]);
        self.pos += n;
        Ok(n)
    }
}

// =============================================================================
// BufReader
// =============================================================================

pub struct BufReader<S: Source> {
    inner: S,
    buf: Box<[u8]>,
    pos: usize,
    filled: usize,
}

impl<S: Source> BufReader<S> {
    pub fn new(inner: S) -> Self {
        Self::with_capacity(DEFAULT_BUF_CAPACITY, inner)
    }

    pub fn with_capacity(capacity: usize, inner: S) -> Self {
        Self {
            inner,
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            pos: 0,
            filled: 0,
        }
    }

    /// Buffered bytes, refilling with one read if the buffer is empty.
    pub fn fill_buf(&mut self) -> SysResult<&[u8]> {
        if self.pos >= self.filled {
            self.filled = self.inner.read_bytes(&mut self.buf)?;
            self.pos = 0;
        }
        Ok(&self.buf[self.pos..self.filled])
    }

    #[inline]
    pub fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.filled);
    }

    /// Read up to `out.len()` bytes.
    ///
    /// Large reads into an empty buffer go straight to the source.
    pub fn read(&mut self, out: &mut [u8]) -> SysResult<usize> {
        if self.pos >= self.filled && out.len() >= self.buf.len() {
            return self.inner.read_bytes(out);
        }
        let avail = self.fill_buf()?;
        let n = avail.len().min(out.len());
        out[..n].copy_from_slice(&avail[..n]);
        self.consume(n);
        Ok(n)
    }

    /// Fill `out` completely. `ENODATA` if the input ends first.
    pub fn read_exact(&mut self, mut out: &mut [u8]) -> SysResult<()> {
        while !out.is_empty() {
            match self.read(out)? {
                0 => return Err(Errno::ENODATA),
                n => out = &mut out[n..],
            }
        }
        Ok(())
    }

    /// Append bytes up to and including `delim` to `out`. Returns the number
    /// appended; `0` at end of input.
    pub fn read_until(&mut self, delim: u8, out: &mut Vec<u8>) -> SysResult<usize> {
        let mut total = 0;
        loop {
            let avail = self.fill_buf()?;
            if avail.is_empty() {
                return Ok(total);
            }
            match avail.iter().position(|&b| b == delim) {
                Some(i) => {
                    out.extend_from_slice(&avail[..=i]);
                    self.consume(i + 1);
                    return Ok(total + i + 1);
                }
                None => {
                    let n = avail.len();
                    out.extend_from_slice(avail);
                    self.consume(n);
                    total += n;
                }
            }
        }
    }

    /// Append one line (including `\n`) to `out`.
    ///
    /// `EILSEQ` if the line is not UTF-8; `out` is left unchanged then.
    pub fn read_line(&mut self, out: &mut String) -> SysResult<usize> {
        let mut bytes = Vec::new();
        let n = self.read_until(b'\n', &mut bytes)?;
        let line = String::from_utf8(bytes).map_err(|_| Errno::EILSEQ)?;
        out.push_str(&line);
        Ok(n)
    }

    #[inline]
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Unwrap the source. Buffered but unread bytes are lost.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

// =============================================================================
// BufWriter
// =============================================================================

pub struct BufWriter<S: Sink> {
    inner: S,
    buf: Vec<u8>,
    capacity: usize,
}

impl<S: Sink> BufWriter<S> {
    pub fn new(inner: S) -> Self {
        Self::with_capacity(DEFAULT_BUF_CAPACITY, inner)
    }

    pub fn with_capacity(capacity: usize, inner: S) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner,
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Bytes waiting in the buffer.
    #[inline]
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Buffer all of `data`, writing through when it does not fit.
    pub fn write_all(&mut self, data: &[u8]) -> SysResult<()> {
        if self.buf.len() + data.len() > self.capacity {
            self.flush_buf()?;
        }
        if data.len() >= self.capacity {
            write_fully(&mut self.inner, data)
        } else {
            self.buf.extend_from_slice(data);
            Ok(())
        }
    }

    /// Formatted append, for `write!(w, ...)`.
    ///
    /// Shadows `fmt::Write::write_fmt` so the sink's error is returned
    /// instead of `fmt::Error`.
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> SysResult<()> {
        let mut adapter = FmtAdapter {
            writer: self,
            error: None,
        };
        match fmt::write(&mut adapter, args) {
            Ok(()) => Ok(()),
            Err(_) => Err(adapter.error.unwrap_or(Errno::EINVAL)),
        }
    }

    /// Write out everything buffered.
    pub fn flush(&mut self) -> SysResult<()> {
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> SysResult<()> {
        let mut written = 0;
        let result = loop {
            if written == self.buf.len() {
                break Ok(());
            }
            match self.inner.write_bytes(&self.buf[written..]) {
                Ok(0) => break Err(Errno::EIO),
                Ok(n) => written += n,
                Err(e) => break Err(e),
            }
        };
        self.buf.drain(..written);
        result
    }

    /// Flush and unwrap the sink.
    ///
    /// If the flush fails, the unwritten bytes are discarded with the sink
    /// and the error is returned; nothing is written again on the way out.
    pub fn into_inner(mut self) -> SysResult<S> {
        if let Err(err) = self.flush_buf() {
            klog_warn!("BufWriter: {} buffered bytes lost: {}", self.buf.len(), err);
            self.buf.clear();
            return Err(err);
        }
        let this = core::mem::ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped; `inner` is moved out exactly once
        // and `buf` is dropped here.
        let (inner, buf) = unsafe { (core::ptr::read(&this.inner), core::ptr::read(&this.buf)) };
        drop(buf);
        Ok(inner)
    }
}

fn write_fully<S: Sink + ?Sized>(sink: &mut S, mut data: &[u8]) -> SysResult<()> {
    while !data.is_empty() {
        match sink.write_bytes(data)? {
            0 => return Err(Errno::EIO),
            n => data = &data[n..],
        }
    }
    Ok(())
}

struct FmtAdapter<'w, S: Sink> {
    writer: &'w mut BufWriter<S>,
    error: Option<Errno>,
}

impl<S: Sink> fmt::Write for FmtAdapter<'_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.writer.write_all(s.as_bytes()).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}

impl<S: Sink> fmt::Write for BufWriter<S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

impl<S: Sink> Drop for BufWriter<S> {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        if let Err(err) = self.flush_buf() {
            klog_warn!("BufWriter: {} buffered bytes lost on drop: {}", self.buf.len(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Source handing out at most `chunk` bytes per read and counting reads.
    struct Chunked<'a> {
        data: &'a [u8],
        chunk: usize,
        reads: usize,
    }

    impl Source for Chunked<'_> {
        fn read_bytes(&mut self, buf: &mut [u8]) -> SysResult<usize> {
            self.reads += 1;
            let n = self.data.len().min(buf.len()).min(self.chunk);
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[derive(Default)]
    struct Recorder {
        out: Vec<u8>,
        writes: usize,
        limit: Option<usize>,
        fail_first: Option<Errno>,
    }

    impl Sink for Recorder {
        fn write_bytes(&mut self, buf: &[u8]) -> SysResult<usize> {
            self.writes += 1;
            if let Some(err) = self.fail_first.take() {
                return Err(err);
            }
            let n = self.limit.map_or(buf.len(), |l| l.min(buf.len()));
            self.out.extend_from_slice(&buf[..n]);
            Ok(n)
        }
    }

    #[test]
    fn lines_across_refills() {
        let src = Chunked {
            data: b"alpha\nbeta\ngamma",
            chunk: 4,
            reads: 0,
        };
        let mut r = BufReader::with_capacity(4, src);
        let mut line = String::new();
        assert_eq!(r.read_line(&mut line).unwrap(), 6);
        assert_eq!(line, "alpha\n");
        line.clear();
        r.read_line(&mut line).unwrap();
        assert_eq!(line, "beta\n");
        line.clear();
        r.read_line(&mut line).unwrap();
        assert_eq!(line, "gamma");
        assert_eq!(r.read_line(&mut line).unwrap(), 0);
    }

    #[test]
    fn one_refill_serves_many_small_reads() {
        let src = Chunked {
            data: b"0123456789",
            chunk: 64,
            reads: 0,
        };
        let mut r = BufReader::new(src);
        let mut b = [0u8; 2];
        for _ in 0..5 {
            r.read_exact(&mut b).unwrap();
        }
        assert_eq!(&b, b"89");
        assert_eq!(r.get_ref().reads, 1);
        assert_eq!(r.read_exact(&mut b), Err(Errno::ENODATA));
    }

    #[test]
    fn invalid_utf8_line() {
        let src = Chunked {
            data: b"\xff\xfe\n",
            chunk: 8,
            reads: 0,
        };
        let mut r = BufReader::new(src);
        let mut line = String::new();
        assert_eq!(r.read_line(&mut line), Err(Errno::EILSEQ));
        assert!(line.is_empty());
    }

    #[test]
    fn writes_are_deferred_until_flush() {
        let mut w = BufWriter::with_capacity(16, Recorder::default());
        write!(w, "{}-{}", 12, "ab").unwrap();
        w.write_all(b"!").unwrap();
        assert_eq!(w.get_ref().writes, 0);
        assert_eq!(w.buffered(), b"12-ab!");
        let sink = w.into_inner().unwrap();
        assert_eq!(sink.out, b"12-ab!");
        assert_eq!(sink.writes, 1);
    }

    #[test]
    fn short_writes_are_completed() {
        let sink = Recorder {
            limit: Some(3),
            ..Recorder::default()
        };
        let mut w = BufWriter::with_capacity(4, sink);
        w.write_all(b"abcdefghij").unwrap();
        let sink = w.into_inner().unwrap();
        assert_eq!(sink.out, b"abcdefghij");
        assert_eq!(sink.writes, 4);
    }

    #[test]
    fn interrupted_flush_in_into_inner_is_not_reissued() {
        let mut sink = Recorder {
            fail_first: Some(Errno::EINTR),
            ..Recorder::default()
        };
        let mut w = BufWriter::new(&mut sink);
        w.write_all(b"data").unwrap();
        assert_eq!(w.into_inner().err(), Some(Errno::EINTR));
        assert_eq!(sink.writes, 1);
        assert!(sink.out.is_empty());
    }

    #[test]
    fn cursor_over_mapping() {
        let mut map = Mapping::anonymous(4096, sysbase_abi::Prot::READ_WRITE).unwrap();
        {
            let mut w = BufWriter::new(MapCursor::new(&mut map));
            writeln!(w, "hello {}", 42).unwrap();
        }
        let mut r = BufReader::new(MapCursor::new(&mut map));
        let mut line = String::new();
        r.read_line(&mut line).unwrap();
        assert_eq!(line, "hello 42\n");
    }

    #[test]
    fn cursor_reports_full_mapping() {
        let mut map = Mapping::anonymous(4096, sysbase_abi::Prot::READ_WRITE).unwrap();
        let mut cur = MapCursor::new(&mut map);
        cur.set_position(4094);
        assert_eq!(cur.write_bytes(b"xyz"), Ok(2));
        assert_eq!(cur.write_bytes(b"z"), Err(Errno::ENOSPC));
    }
}
