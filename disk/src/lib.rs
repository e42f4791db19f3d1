use std::fmt;

use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskError {
    IncorrectBlockSize,
    OverCapacity,
}

impl fmt::Display for DiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiskError::IncorrectBlockSize => write!(f, "block size does not match the store"),
            DiskError::OverCapacity => write!(f, "block number past the end of the store"),
        }
    }
}

impl std::error::Error for DiskError {}

/// In-memory stand-in for a swap device: one `BLOCKSIZE` block per virtual page.
///
/// Every block starts zero-filled and lives as long as the store.
#[derive(Debug, Clone)]
pub struct BackingStore<const BLOCKSIZE: usize, const BLOCKS: usize> {
    blocks: Vec<[u8; BLOCKSIZE]>,
}

impl<const BLOCKSIZE: usize, const BLOCKS: usize> BackingStore<BLOCKSIZE, BLOCKS> {
    pub fn create() -> Self {
        assert!(BLOCKSIZE > 0, "Block size must not be zero");
        Self {
            blocks: vec![[0; BLOCKSIZE]; BLOCKS],
        }
    }

    pub fn capacity(&self) -> usize {
        BLOCKS
    }

    pub fn read_block(&self, block_number: usize) -> Result<&[u8; BLOCKSIZE], DiskError> {
        info!("Start reading block[{}]", block_number);
        let block = self.blocks.get(block_number).ok_or(DiskError::OverCapacity)?;
        info!("Done reading block[{}]", block_number);
        Ok(block)
    }

    pub fn write_block(&mut self, block_number: usize, block: &[u8]) -> Result<(), DiskError> {
        info!("Start writing block[{}]", block_number);
        if block.len() != BLOCKSIZE {
            return Err(DiskError::IncorrectBlockSize);
        }
        let slot = self
            .blocks
            .get_mut(block_number)
            .ok_or(DiskError::OverCapacity)?;
        slot.copy_from_slice(block);
        info!("Done writing block[{}]", block_number);
        Ok(())
    }
}

impl<const BLOCKSIZE: usize, const BLOCKS: usize> Default for BackingStore<BLOCKSIZE, BLOCKS> {
    fn default() -> Self {
        Self::create()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_create_zeroed() {
        let disk = BackingStore::<512, 2>::create();
        assert_eq!(disk.capacity(), 2);
        assert_eq!(disk.read_block(0).unwrap(), &[0; 512]);
        assert_eq!(disk.read_block(1).unwrap(), &[0; 512]);
    }

    #[test]
    fn test_read_write() {
        let mut disk = BackingStore::<512, 2>::create();
        let mut block = Box::new([0; 512]);
        block[0] = 1;
        disk.write_block(0, &*block).unwrap();
        let block = disk.read_block(0).unwrap();
        assert_eq!(block[0], 1);
        assert_eq!(disk.read_block(1).unwrap()[0], 0);
    }

    #[test]
    fn test_read_write_over_capacity() {
        let mut disk = BackingStore::<512, 2>::create();
        let mut block = Box::new([0; 512]);
        block[0] = 1;
        assert_eq!(disk.write_block(2, &*block), Err(DiskError::OverCapacity));
        assert_eq!(disk.read_block(2), Err(DiskError::OverCapacity));
    }

    #[test]
    fn test_read_write_incorrect_block_size() {
        let mut disk = BackingStore::<512, 2>::create();
        let block = Box::new([1; 256]);
        assert_eq!(
            disk.write_block(0, &*block),
            Err(DiskError::IncorrectBlockSize)
        );
        assert_eq!(disk.read_block(0).unwrap(), &[0; 512]);
    }

    #[test]
    fn test_read_write_incorrect_block_size2() {
        let mut disk = BackingStore::<512, 2>::create();
        let block = Box::new([1; 1024]);
        assert_eq!(
            disk.write_block(0, &*block),
            Err(DiskError::IncorrectBlockSize)
        );
    }
}
