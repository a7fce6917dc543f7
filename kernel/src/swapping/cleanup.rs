use super::pte_codec::PageState;
use super::swap_area::SlotTable;
use crate::paging::PageManager;
use pageswap_shared::paging::PageTableEntry;

/// Gives back every swap slot still referenced by `page_manager` and clears
/// those entries. Present and never-mapped entries are left alone.
///
/// Returns the number of slots released. A second call finds nothing.
pub fn cleanup(slots: &SlotTable, page_manager: &mut PageManager) -> usize {
    let capacity = slots.capacity();
    let mut released = 0;

    for (_, entry) in page_manager.user_entries_mut() {
        if let PageState::Swapped { slot, .. } = PageState::decode(*entry) {
            if slot < capacity {
                slots.release(slot);
                released += 1;
            }
            *entry = PageTableEntry::default();
        }
    }

    released
}
