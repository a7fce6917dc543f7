//! Placement of swap slots on the swap device.
//!
//! Sectors 0 and 1 hold the boot block and the superblock. Slot `n` occupies
//! the `BLOCKS_PER_PAGE` sectors starting at `RESERVED_SECTORS + n * BLOCKS_PER_PAGE`.

// Slot indices are below `SWAP_SLOTS`, far inside `u32`.
#![allow(clippy::cast_possible_truncation)]

use super::swap_error::SwapError;
use crate::block::block_core::{BlockManager, BlockSector, BLOCK_SECTOR_SIZE};
use crate::block::block_error::BlockError;
use crate::sync::mutex::Mutex;
use core::ops::Range;
use pageswap_shared::mem::PAGE_FRAME_SIZE;
use pageswap_shared::sizes::{BLOCKS_PER_PAGE, RESERVED_SECTORS, SWAP_SECTORS, SWAP_SLOTS};

/// Sectors a swap device must have to hold every slot.
pub const SWAP_DEVICE_SECTORS: BlockSector = RESERVED_SECTORS + SWAP_SECTORS;

/// The sectors backing `slot`.
pub fn slot_sectors(slot: usize) -> Range<BlockSector> {
    assert!(slot < SWAP_SLOTS, "swap slot {slot} out of range");
    let start = RESERVED_SECTORS + slot as u32 * BLOCKS_PER_PAGE;
    start..start + BLOCKS_PER_PAGE
}

/// Writes a whole page into `slot`, one sector at a time.
pub fn write_slot(
    blocks: &Mutex<BlockManager>,
    device: usize,
    slot: usize,
    page: &[u8],
) -> Result<(), SwapError> {
    assert_eq!(page.len(), PAGE_FRAME_SIZE);
    let mut blocks = blocks.lock();
    let swap = blocks.by_id(device).ok_or(BlockError::NoDevice)?;

    for (sector, chunk) in slot_sectors(slot).zip(page.chunks_exact(BLOCK_SECTOR_SIZE)) {
        swap.write(sector, chunk)?;
    }
    Ok(())
}

/// Reads `slot` back into a page-sized buffer.
pub fn read_slot(
    blocks: &Mutex<BlockManager>,
    device: usize,
    slot: usize,
    page: &mut [u8],
) -> Result<(), SwapError> {
    assert_eq!(page.len(), PAGE_FRAME_SIZE);
    let mut blocks = blocks.lock();
    let swap = blocks.by_id(device).ok_or(BlockError::NoDevice)?;

    for (sector, chunk) in slot_sectors(slot).zip(page.chunks_exact_mut(BLOCK_SECTOR_SIZE)) {
        swap.read(sector, chunk)?;
    }
    Ok(())
}
