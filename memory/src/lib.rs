use std::fmt;

pub use frame_allocator::FrameAllocator;

mod frame_allocator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    OutOfFrames,
    IndexOutOfRange,
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::OutOfFrames => write!(f, "no free frames available"),
            MemoryError::IndexOutOfRange => write!(f, "frame or offset out of range"),
        }
    }
}

impl std::error::Error for MemoryError {}

/// `FRAMES` frames of `PAGE_SIZE` bytes each, plus the pool of frames nobody owns.
///
/// Frame contents are left as they are when a frame goes back to the pool.
#[derive(Debug, Clone)]
pub struct PhysicalMemory<const PAGE_SIZE: usize, const FRAMES: usize> {
    frames: Vec<[u8; PAGE_SIZE]>,
    allocator: FrameAllocator<FRAMES>,
}

impl<const PAGE_SIZE: usize, const FRAMES: usize> PhysicalMemory<PAGE_SIZE, FRAMES> {
    pub fn create() -> Self {
        assert!(PAGE_SIZE > 0, "Page size must not be zero");
        assert!(FRAMES > 0, "Physical memory needs at least one frame");
        Self {
            frames: vec![[0; PAGE_SIZE]; FRAMES],
            allocator: FrameAllocator::init(),
        }
    }

    pub fn has_free_frame(&self) -> bool {
        self.allocator.has_free_frame()
    }

    pub fn free_frame_count(&self) -> usize {
        self.allocator.free_count()
    }

    pub fn is_free(&self, frame: usize) -> bool {
        self.allocator.contains(frame)
    }

    pub fn alloc_frame(&mut self) -> Result<usize, MemoryError> {
        self.allocator
            .allocate_frame()
            .ok_or(MemoryError::OutOfFrames)
    }

    pub fn free_frame(&mut self, frame: usize) {
        self.allocator.deallocate_frame(frame);
    }

    pub fn check_address(&self, frame: usize, offset: usize) -> Result<(), MemoryError> {
        if frame >= FRAMES || offset >= PAGE_SIZE {
            return Err(MemoryError::IndexOutOfRange);
        }
        Ok(())
    }

    pub fn read_byte(&self, frame: usize, offset: usize) -> Result<u8, MemoryError> {
        self.check_address(frame, offset)?;
        Ok(self.frames[frame][offset])
    }

    pub fn write_byte(
        &mut self,
        frame: usize,
        offset: usize,
        value: u8,
    ) -> Result<(), MemoryError> {
        self.check_address(frame, offset)?;
        self.frames[frame][offset] = value;
        Ok(())
    }

    pub fn frame(&self, frame: usize) -> Result<&[u8; PAGE_SIZE], MemoryError> {
        self.frames.get(frame).ok_or(MemoryError::IndexOutOfRange)
    }

    pub fn frame_mut(&mut self, frame: usize) -> Result<&mut [u8; PAGE_SIZE], MemoryError> {
        self.frames.get_mut(frame).ok_or(MemoryError::IndexOutOfRange)
    }

    /// Overwrites the whole frame with `block`.
    pub fn load_frame(&mut self, frame: usize, block: &[u8; PAGE_SIZE]) -> Result<(), MemoryError> {
        self.frame_mut(frame)?.copy_from_slice(block);
        Ok(())
    }
}

impl<const PAGE_SIZE: usize, const FRAMES: usize> Default for PhysicalMemory<PAGE_SIZE, FRAMES> {
    fn default() -> Self {
        Self::create()
    }
}
