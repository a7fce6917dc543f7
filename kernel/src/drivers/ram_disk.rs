use crate::block::block_core::{BlockOp, BlockSector, BLOCK_SECTOR_SIZE};
use crate::block::block_error::BlockError;
use alloc::{vec, vec::Vec};

/// A block device backed by kernel memory.
///
/// Used as the swap disk when the machine has no IDE controller, and by the
/// unit tests. Writes can be switched off to emulate a failing disk.
pub struct RamDisk {
    data: Vec<u8>,
    read_only: bool,
}

impl RamDisk {
    pub fn new(sectors: BlockSector) -> Self {
        Self {
            data: vec![0; sectors as usize * BLOCK_SECTOR_SIZE],
            read_only: false,
        }
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn sector_range(&self, sector: BlockSector) -> Result<core::ops::Range<usize>, BlockError> {
        let start = sector as usize * BLOCK_SECTOR_SIZE;
        let end = start + BLOCK_SECTOR_SIZE;
        if end > self.data.len() {
            return Err(BlockError::SectorOutOfBounds);
        }
        Ok(start..end)
    }
}

impl BlockOp for RamDisk {
    fn read(&mut self, sector: BlockSector, buf: &mut [u8]) -> Result<(), BlockError> {
        let range = self.sector_range(sector)?;
        buf.copy_from_slice(&self.data[range]);
        Ok(())
    }

    fn write(&mut self, sector: BlockSector, buf: &[u8]) -> Result<(), BlockError> {
        if self.read_only {
            return Err(BlockError::WriteError);
        }
        let range = self.sector_range(sector)?;
        self.data[range].copy_from_slice(buf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sectors_do_not_overlap() {
        let mut disk = RamDisk::new(2);
        disk.write(0, &[1u8; BLOCK_SECTOR_SIZE]).unwrap();
        disk.write(1, &[2u8; BLOCK_SECTOR_SIZE]).unwrap();

        let mut buf = [0u8; BLOCK_SECTOR_SIZE];
        disk.read(0, &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == 1));
        disk.read(1, &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == 2));
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let mut disk = RamDisk::new(1);
        disk.set_read_only(true);
        assert_eq!(
            disk.write(0, &[0u8; BLOCK_SECTOR_SIZE]),
            Err(BlockError::WriteError)
        );
        let mut buf = [0u8; BLOCK_SECTOR_SIZE];
        assert_eq!(disk.read(1, &mut buf), Err(BlockError::SectorOutOfBounds));
    }
}
