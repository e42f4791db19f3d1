/// Residency state of one virtual page.
///
/// A page is present exactly when it has a frame, and only a present page can be dirty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageTableEntry {
    frame: Option<usize>,
    dirty: bool,
}

impl PageTableEntry {
    pub fn zero() -> Self {
        PageTableEntry {
            frame: None,
            dirty: false,
        }
    }

    pub fn is_present(&self) -> bool {
        self.frame.is_some()
    }

    pub fn frame(&self) -> Option<usize> {
        self.frame
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the page resident and clean in `frame_number`.
    pub fn map_to_frame(&mut self, frame_number: usize) {
        self.frame = Some(frame_number);
        self.dirty = false;
    }

    pub fn unmap(&mut self) {
        *self = Self::zero();
    }

    /// No effect on an absent page.
    pub fn set_dirty(&mut self) {
        if self.is_present() {
            self.dirty = true;
        }
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
