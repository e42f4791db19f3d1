
use std::collections::VecDeque;

use disk::BackingStore;
use log::{debug, trace};
use memory::{MemoryError, PhysicalMemory};

use crate::{
    page::{PageMut, PageRef},
    page_table::{PageTable, PageTableEntry},
    VmError,
};

/// Counters kept by [`PagingEngine`]. `writebacks` counts every block written
/// to the backing store, by eviction or by [`PagingEngine::flush`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub accesses: u64,
    pub hits: u64,
    pub faults: u64,
    pub evictions: u64,
    pub writebacks: u64,
}

/// Single-address-space virtual memory with demand paging and FIFO replacement.
///
/// The engine is not internally synchronized. Sharing it between threads means
/// putting the whole engine behind one lock, since a fault updates the page
/// table, the free pool, the frame owners and the FIFO queue in several steps.
#[derive(Debug, Clone)]
pub struct PagingEngine<
    const PAGE_SIZE: usize,
    const VIRTUAL_PAGES: usize,
    const PHYSICAL_FRAMES: usize,
> {
    page_table: PageTable<VIRTUAL_PAGES>,
    memory: PhysicalMemory<PAGE_SIZE, PHYSICAL_FRAMES>,
    disk: BackingStore<PAGE_SIZE, VIRTUAL_PAGES>,
    // frame -> owning page
    frame_to_page: Vec<Option<usize>>,
    // resident frames, oldest load first
    fifo: VecDeque<usize>,
    stats: Stats,
}

impl<const PAGE_SIZE: usize, const VIRTUAL_PAGES: usize, const PHYSICAL_FRAMES: usize>
    PagingEngine<PAGE_SIZE, VIRTUAL_PAGES, PHYSICAL_FRAMES>
{
    pub fn new() -> Self {
        assert!(VIRTUAL_PAGES > 0, "Address space needs at least one page");
        Self {
            page_table: PageTable::init(),
            memory: PhysicalMemory::create(),
            disk: BackingStore::create(),
            frame_to_page: vec![None; PHYSICAL_FRAMES],
            fifo: VecDeque::with_capacity(PHYSICAL_FRAMES),
            stats: Stats::default(),
        }
    }

    /// Makes `page_number` resident and returns its frame.
    ///
    /// A hit has no side effects besides the counters. A fault takes a free
    /// frame if there is one, otherwise evicts the oldest loaded page, then
    /// loads the page from the backing store clean and queues its frame last.
    pub fn ensure_resident(&mut self, page_number: usize) -> Result<usize, VmError> {
        let entry = self.page_table.entry(page_number)?;
        self.stats.accesses += 1;
        if let Some(frame) = entry.frame() {
            trace!("Hit page[{}] in frame[{}]", page_number, frame);
            self.stats.hits += 1;
            return Ok(frame);
        }

        debug!("Page fault on page[{}]", page_number);
        self.stats.faults += 1;
        let frame = if self.memory.has_free_frame() {
            self.memory.alloc_frame()?
        } else {
            self.evict()?
        };

        self.memory.load_frame(frame, self.disk.read_block(page_number)?)?;
        self.page_table.get(page_number)?.map_to_frame(frame);
        self.frame_to_page[frame] = Some(page_number);
        self.fifo.push_back(frame);
        debug!("Loaded page[{}] into frame[{}]", page_number, frame);
        Ok(frame)
    }

    /// Frees the frame at the head of the FIFO queue and hands it back
    /// without going through the free pool.
    fn evict(&mut self) -> Result<usize, VmError> {
        let frame = *self
            .fifo
            .front()
            .ok_or(VmError::Memory(MemoryError::OutOfFrames))?;
        let victim = self.frame_to_page[frame].ok_or(VmError::Memory(MemoryError::OutOfFrames))?;

        let entry = self.page_table.get(victim)?;
        if entry.is_dirty() {
            debug!("Writing back dirty page[{}] from frame[{}]", victim, frame);
            self.disk.write_block(victim, self.memory.frame(frame)?)?;
            self.stats.writebacks += 1;
        }
        entry.unmap();

        self.fifo.pop_front();
        self.frame_to_page[frame] = None;
        self.stats.evictions += 1;
        debug!("Evicted page[{}] from frame[{}]", victim, frame);
        Ok(frame)
    }

    /// Splits a virtual address into page number and offset.
    pub fn translate(&self, address: usize) -> Result<(usize, usize), VmError> {
        if address >= VIRTUAL_PAGES * PAGE_SIZE {
            return Err(VmError::InvalidAddress(address));
        }
        Ok((address / PAGE_SIZE, address % PAGE_SIZE))
    }

    pub fn read_byte(&mut self, address: usize) -> Result<u8, VmError> {
        let (page_number, offset) = self.translate(address)?;
        let frame = self.ensure_resident(page_number)?;
        Ok(self.memory.read_byte(frame, offset)?)
    }

    pub fn write_byte(&mut self, address: usize, value: u8) -> Result<(), VmError> {
        let (page_number, offset) = self.translate(address)?;
        let frame = self.ensure_resident(page_number)?;
        self.memory.write_byte(frame, offset, value)?;
        self.page_table.get(page_number)?.set_dirty();
        Ok(())
    }

    fn check_range(&self, address: usize, len: usize) -> Result<(), VmError> {
        match address.checked_add(len) {
            Some(end) if end <= VIRTUAL_PAGES * PAGE_SIZE => Ok(()),
            _ => Err(VmError::InvalidAddress(address)),
        }
    }

    /// Fills `buf` from consecutive virtual addresses starting at `address`.
    pub fn read_bytes(&mut self, address: usize, buf: &mut [u8]) -> Result<(), VmError> {
        self.check_range(address, buf.len())?;
        let mut done = 0;
        while done < buf.len() {
            let (page_number, offset) = self.translate(address + done)?;
            let n = (PAGE_SIZE - offset).min(buf.len() - done);
            let page = self.page(page_number)?;
            buf[done..done + n].copy_from_slice(&page[offset..offset + n]);
            done += n;
        }
        Ok(())
    }

    pub fn write_bytes(&mut self, address: usize, buf: &[u8]) -> Result<(), VmError> {
        self.check_range(address, buf.len())?;
        let mut done = 0;
        while done < buf.len() {
            let (page_number, offset) = self.translate(address + done)?;
            let n = (PAGE_SIZE - offset).min(buf.len() - done);
            let mut page = self.page_mut(page_number)?;
            page[offset..offset + n].copy_from_slice(&buf[done..done + n]);
            done += n;
        }
        Ok(())
    }

    pub fn page(&mut self, page_number: usize) -> Result<PageRef<'_, PAGE_SIZE>, VmError> {
        let frame = self.ensure_resident(page_number)?;
        Ok(PageRef::init(page_number, frame, self.memory.frame(frame)?))
    }

    pub fn page_mut(&mut self, page_number: usize) -> Result<PageMut<'_, PAGE_SIZE>, VmError> {
        let frame = self.ensure_resident(page_number)?;
        let entry = self.page_table.get(page_number)?;
        let buffer = self.memory.frame_mut(frame)?;
        Ok(PageMut::init(page_number, frame, entry, buffer))
    }

    fn owner_of(&self, frame: usize) -> Result<usize, VmError> {
        if frame >= PHYSICAL_FRAMES {
            return Err(VmError::Memory(MemoryError::IndexOutOfRange));
        }
        self.frame_to_page[frame].ok_or(VmError::FreeFrame(frame))
    }

    /// Byte access for callers already holding a frame from
    /// [`PagingEngine::ensure_resident`]. Free frames are refused.
    pub fn read_frame_byte(&self, frame: usize, offset: usize) -> Result<u8, VmError> {
        self.owner_of(frame)?;
        Ok(self.memory.read_byte(frame, offset)?)
    }

    /// Writes into a resident frame and marks its page dirty.
    pub fn write_frame_byte(
        &mut self,
        frame: usize,
        offset: usize,
        value: u8,
    ) -> Result<(), VmError> {
        let page_number = self.owner_of(frame)?;
        self.memory.write_byte(frame, offset, value)?;
        self.page_table.get(page_number)?.set_dirty();
        Ok(())
    }

    /// Writes every dirty resident page back and marks it clean. Residency and
    /// FIFO order are untouched. Returns how many pages were written.
    pub fn flush(&mut self) -> Result<usize, VmError> {
        let mut written = 0;
        for &frame in &self.fifo {
            let Some(page_number) = self.frame_to_page[frame] else {
                continue;
            };
            let entry = self.page_table.get(page_number)?;
            if entry.is_dirty() {
                self.disk.write_block(page_number, self.memory.frame(frame)?)?;
                entry.clear_dirty();
                written += 1;
            }
        }
        self.stats.writebacks += written as u64;
        debug!("Flushed {} dirty pages", written);
        Ok(written)
    }

    pub fn entry(&self, page_number: usize) -> Result<PageTableEntry, VmError> {
        Ok(*self.page_table.entry(page_number)?)
    }

    pub fn is_resident(&self, page_number: usize) -> Result<bool, VmError> {
        Ok(self.page_table.entry(page_number)?.is_present())
    }

    pub fn page_table(&self) -> &PageTable<VIRTUAL_PAGES> {
        &self.page_table
    }

    pub fn frame_owner(&self, frame: usize) -> Option<usize> {
        self.frame_to_page.get(frame).copied().flatten()
    }

    /// Resident frames, next victim first.
    pub fn fifo_order(&self) -> impl Iterator<Item = usize> + '_ {
        self.fifo.iter().copied()
    }

    pub fn free_frame_count(&self) -> usize {
        self.memory.free_frame_count()
    }

    pub fn backing_block(&self, page_number: usize) -> Result<&[u8; PAGE_SIZE], VmError> {
        self.page_table.entry(page_number)?;
        Ok(self.disk.read_block(page_number)?)
    }

    pub fn memory(&self) -> &PhysicalMemory<PAGE_SIZE, PHYSICAL_FRAMES> {
        &self.memory
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }
}

impl<const PAGE_SIZE: usize, const VIRTUAL_PAGES: usize, const PHYSICAL_FRAMES: usize> Default
    for PagingEngine<PAGE_SIZE, VIRTUAL_PAGES, PHYSICAL_FRAMES>
{
    fn default() -> Self {
        Self::new()
    }
}
