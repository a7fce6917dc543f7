pub const KB: usize = 1024;

/// Size of one disk block. A page occupies exactly `BLOCKS_PER_PAGE` of them.
pub const SECTOR_SIZE: u32 = 512;
pub const BLOCKS_PER_PAGE: u32 = crate::mem::PAGE_FRAME_SIZE as u32 / SECTOR_SIZE;

/// Blocks at the front of the disk holding the boot block and the superblock.
pub const RESERVED_SECTORS: u32 = 2;
pub const SWAP_SLOTS: usize = 800;
pub const SWAP_SECTORS: u32 = SWAP_SLOTS as u32 * BLOCKS_PER_PAGE;
