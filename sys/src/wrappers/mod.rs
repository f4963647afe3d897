//! Owning wrappers over kernel resources.

pub mod fd;
pub mod mmap;
