use std::ops::{Deref, DerefMut};

use crate::page_table::PageTableEntry;

/// Read-only view of a resident page's frame.
pub struct PageRef<'a, const PAGE_SIZE: usize> {
    pub page_number: usize,
    pub frame_number: usize,
    buffer: &'a [u8; PAGE_SIZE],
}

impl<'a, const PAGE_SIZE: usize> PageRef<'a, PAGE_SIZE> {
    pub(crate) fn init(
        page_number: usize,
        frame_number: usize,
        buffer: &'a [u8; PAGE_SIZE],
    ) -> Self {
        Self {
            page_number,
            frame_number,
            buffer,
        }
    }
}

impl<const PAGE_SIZE: usize> Deref for PageRef<'_, PAGE_SIZE> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.buffer[..]
    }
}

/// Writable view of a resident page's frame. Taking a mutable borrow of the
/// bytes marks the page dirty.
pub struct PageMut<'a, const PAGE_SIZE: usize> {
    pub page_number: usize,
    pub frame_number: usize,
    entry: &'a mut PageTableEntry,
    buffer: &'a mut [u8; PAGE_SIZE],
}

impl<'a, const PAGE_SIZE: usize> PageMut<'a, PAGE_SIZE> {
    pub(crate) fn init(
        page_number: usize,
        frame_number: usize,
        entry: &'a mut PageTableEntry,
        buffer: &'a mut [u8; PAGE_SIZE],
    ) -> Self {
        Self {
            page_number,
            frame_number,
            entry,
            buffer,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.entry.is_dirty()
    }
}

impl<const PAGE_SIZE: usize> Deref for PageMut<'_, PAGE_SIZE> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.buffer[..]
    }
}

impl<const PAGE_SIZE: usize> DerefMut for PageMut<'_, PAGE_SIZE> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.entry.set_dirty();
        &mut self.buffer[..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_does_not_dirty() {
        let mut entry = PageTableEntry::zero();
        entry.map_to_frame(0);
        let mut buffer = [7u8; 4];
        let page: PageMut<4> = PageMut::init(0, 0, &mut entry, &mut buffer);
        assert_eq!(&page[..], &[7, 7, 7, 7]);
        assert!(!page.is_dirty());
    }

    #[test]
    fn write_marks_dirty() {
        let mut entry = PageTableEntry::zero();
        entry.map_to_frame(0);
        let mut buffer = [0u8; 4];
        {
            let mut page: PageMut<4> = PageMut::init(0, 0, &mut entry, &mut buffer);
            page[1] = 9;
            assert!(page.is_dirty());
        }
        assert!(entry.is_dirty());
        assert_eq!(buffer, [0, 9, 0, 0]);
    }

    #[test]
    fn page_ref_derefs_to_buffer() {
        let buffer = [1u8, 2, 3];
        let page: PageRef<3> = PageRef::init(4, 2, &buffer);
        assert_eq!(page.len(), 3);
        assert_eq!(page[2], 3);
        assert_eq!(page.page_number, 4);
        assert_eq!(page.frame_number, 2);
    }
}
