use std::collections::VecDeque;

/// Pool of free frame numbers, handed out in the order they were returned.
#[derive(Debug, Clone)]
pub struct FrameAllocator<const FRAMES: usize> {
    free: VecDeque<usize>,
}

impl<const FRAMES: usize> FrameAllocator<FRAMES> {
    pub fn init() -> Self {
        Self {
            free: (0..FRAMES).collect(),
        }
    }

    pub fn has_free_frame(&self) -> bool {
        !self.free.is_empty()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn allocate_frame(&mut self) -> Option<usize> {
        let frame = self.free.pop_front();
        if frame.is_none() {
            log::debug!("No free frames");
        }
        frame
    }

    /// Puts `frame` back at the tail of the pool.
    ///
    /// Double frees are not detected, the caller owns that bookkeeping.
    pub fn deallocate_frame(&mut self, frame: usize) {
        self.free.push_back(frame);
    }

    pub fn contains(&self, frame: usize) -> bool {
        self.free.contains(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_in_order() {
        let mut allocator = FrameAllocator::<4>::init();
        assert_eq!(allocator.allocate_frame(), Some(0));
        assert_eq!(allocator.allocate_frame(), Some(1));
        assert_eq!(allocator.free_count(), 2);
    }

    #[test]
    fn test_allocate_frame_full() {
        let mut allocator = FrameAllocator::<2>::init();
        allocator.allocate_frame();
        allocator.allocate_frame();
        assert!(!allocator.has_free_frame());
        assert_eq!(allocator.allocate_frame(), None);
    }

    #[test]
    fn test_deallocated_frame_goes_to_tail() {
        let mut allocator = FrameAllocator::<3>::init();
        let first = allocator.allocate_frame().unwrap();
        allocator.deallocate_frame(first);
        assert_eq!(allocator.allocate_frame(), Some(1));
        assert_eq!(allocator.allocate_frame(), Some(2));
        assert_eq!(allocator.allocate_frame(), Some(first));
    }
}
