//! Memory-mapping ABI: protection, sharing and `msync` flags.

use bitflags::bitflags;

/// Standard 4KB page size.
pub const PAGE_SIZE: usize = 0x1000;

bitflags! {
    /// `mmap(2)` protection bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Prot: u32 {
        const NONE  = 0x0;
        const READ  = 0x1;
        const WRITE = 0x2;
        const EXEC  = 0x4;
    }
}

impl Prot {
    /// Read and write.
    pub const READ_WRITE: Self = Self::READ.union(Self::WRITE);
}

/// Sharing mode of a mapping: exactly one must be chosen.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Share {
    /// Writes are visible to other mappings of the object and reach the file.
    Shared = 0x01,
    /// Copy-on-write; writes stay in this process.
    Private = 0x02,
}

bitflags! {
    /// Additional `mmap(2)` flags OR-ed onto the sharing mode.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MapFlags: u32 {
        const FIXED     = 0x10;
        const ANONYMOUS = 0x20;
        const NORESERVE = 0x4000;
        const POPULATE  = 0x8000;
    }
}

bitflags! {
    /// `msync(2)` flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MsyncFlags: u32 {
        const ASYNC      = 0x1;
        const INVALIDATE = 0x2;
        const SYNC       = 0x4;
    }
}
