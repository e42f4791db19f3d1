//! Demand-paged virtual memory over a fixed pool of physical frames.
//!
//! [`PagingEngine`] resolves virtual pages to frames, faulting pages in from a
//! [`disk::BackingStore`] and evicting in FIFO order when [`memory::PhysicalMemory`]
//! has no free frame left.

use std::fmt;

use disk::DiskError;
use memory::MemoryError;

pub mod page;
pub mod page_table;
pub mod vm;

pub use page::{PageMut, PageRef};
pub use page_table::{PageTable, PageTableEntry, PageTableError};
pub use vm::{PagingEngine, Stats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmError {
    InvalidPageNumber(usize),
    InvalidAddress(usize),
    FreeFrame(usize),
    Memory(MemoryError),
    Disk(DiskError),
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmError::InvalidPageNumber(page) => write!(f, "invalid page number {}", page),
            VmError::InvalidAddress(address) => write!(f, "invalid virtual address {:#x}", address),
            VmError::FreeFrame(frame) => write!(f, "frame {} holds no page", frame),
            VmError::Memory(e) => write!(f, "memory: {}", e),
            VmError::Disk(e) => write!(f, "backing store: {}", e),
        }
    }
}

impl std::error::Error for VmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VmError::Memory(e) => Some(e),
            VmError::Disk(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PageTableError> for VmError {
    fn from(e: PageTableError) -> Self {
        match e {
            PageTableError::InvalidPageNumber(page) => VmError::InvalidPageNumber(page),
        }
    }
}

impl From<MemoryError> for VmError {
    fn from(e: MemoryError) -> Self {
        VmError::Memory(e)
    }
}

impl From<DiskError> for VmError {
    fn from(e: DiskError) -> Self {
        VmError::Disk(e)
    }
}
