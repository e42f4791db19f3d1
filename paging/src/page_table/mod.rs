mod iter;
mod page_table_entry;

use std::fmt;

pub use iter::PageTableIterator;
pub use page_table_entry::PageTableEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTableError {
    InvalidPageNumber(usize),
}

impl fmt::Display for PageTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageTableError::InvalidPageNumber(page_number) => {
                write!(f, "page number {} is not a valid virtual page", page_number)
            }
        }
    }
}

impl std::error::Error for PageTableError {}

/// One entry per virtual page in `0..PAGES`. Holds no policy, the engine
/// changes entries through [`PageTable::get`].
#[derive(Debug, Clone)]
pub struct PageTable<const PAGES: usize> {
    entries: Vec<PageTableEntry>,
}

impl<const PAGES: usize> PageTable<PAGES> {
    pub fn init() -> Self {
        Self {
            entries: vec![PageTableEntry::zero(); PAGES],
        }
    }

    pub fn get(&mut self, page_number: usize) -> Result<&mut PageTableEntry, PageTableError> {
        self.entries
            .get_mut(page_number)
            .ok_or(PageTableError::InvalidPageNumber(page_number))
    }

    pub fn entry(&self, page_number: usize) -> Result<&PageTableEntry, PageTableError> {
        self.entries
            .get(page_number)
            .ok_or(PageTableError::InvalidPageNumber(page_number))
    }

    pub fn iter(&self) -> PageTableIterator<'_> {
        PageTableIterator::new(&self.entries)
    }
}

impl<const PAGES: usize> Default for PageTable<PAGES> {
    fn default() -> Self {
        Self::init()
    }
}
