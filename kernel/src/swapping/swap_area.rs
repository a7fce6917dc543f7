use super::swap_error::SwapError;
use crate::sync::mutex::Mutex;
use alloc::{boxed::Box, vec};
use arbitrary_int::u12;
use bitbybit::bitfield;

/// Descriptor of one page-sized slot on the swap device.
#[bitfield(u16, default = 0)]
pub struct SwapSlot {
    /// Low flag bits of the page table entry the slot was written from.
    #[bits(0..=11, rw)]
    page_perm: u12,
    #[bit(12, rw)]
    in_use: bool,
}

/// Fixed-capacity allocator of swap slots.
///
/// The lock is held only for the scan and the descriptor update, never across
/// disk I/O.
pub struct SlotTable {
    slots: Mutex<Box<[SwapSlot]>>,
}

impl SlotTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(vec![SwapSlot::default(); capacity].into_boxed_slice()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.lock().len()
    }

    /// Claims the lowest free slot.
    pub fn allocate(&self) -> Result<usize, SwapError> {
        let mut slots = self.slots.lock();
        let (index, slot) = slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| !slot.in_use())
            .ok_or(SwapError::NoFreeSlot)?;
        *slot = SwapSlot::default().with_in_use(true);
        Ok(index)
    }

    /// Returns a slot to the free pool. Out-of-range indices are ignored.
    pub fn release(&self, index: usize) {
        if let Some(slot) = self.slots.lock().get_mut(index) {
            *slot = SwapSlot::default();
        }
    }

    pub fn save_permission(&self, index: usize, perm: u12) {
        if let Some(slot) = self.slots.lock().get_mut(index) {
            *slot = slot.with_page_perm(perm);
        }
    }

    /// Saved permission bits, or `None` for a free or out-of-range slot.
    pub fn read_permission(&self, index: usize) -> Option<u12> {
        let slots = self.slots.lock();
        let slot = slots.get(index)?;
        slot.in_use().then(|| slot.page_perm())
    }

    pub fn is_allocated(&self, index: usize) -> bool {
        self.slots.lock().get(index).is_some_and(|slot| slot.in_use())
    }

    pub fn free_slots(&self) -> usize {
        self.slots.lock().iter().filter(|slot| !slot.in_use()).count()
    }
}
