use super::pte_codec::PageState;
use super::swap_error::SwapError;
use super::swapping_utils::write_slot;
use crate::mem::FrameNumber;
use crate::paging::PageManager;
use crate::system::SystemState;
use pageswap_shared::mem::PAGE_FRAME_SIZE;

/// Writes the page at `va` (backed by `frame`) to a fresh swap slot and turns
/// its entry into a swapped entry.
///
/// The frame is left allocated and `rss` untouched; both belong to the caller.
/// If the device write fails the slot is given back and the entry still maps
/// the frame.
pub fn swap_out(
    system: &SystemState,
    page_manager: &mut PageManager,
    va: usize,
    frame: FrameNumber,
) -> Result<(), SwapError> {
    let flags = match page_manager.entry(va).map(PageState::decode) {
        Some(PageState::Present { frame: mapped, flags }) if mapped == frame => flags,
        _ => return Err(SwapError::NotPresent),
    };

    let slots = &system.swap.slots;
    let slot = slots.allocate()?;
    slots.save_permission(slot, flags);

    let mut page = [0u8; PAGE_FRAME_SIZE];
    page.copy_from_slice(system.frames.lock().frame(frame));

    if let Err(err) = write_slot(&system.block_manager, system.swap.device(), slot, &page) {
        slots.release(slot);
        return Err(err);
    }

    let Some(entry) = page_manager.entry_mut(va, false) else {
        slots.release(slot);
        return Err(SwapError::NotPresent);
    };
    *entry = PageState::Swapped { slot, flags }.encode();
    page_manager.flush_tlb();

    system.swap.record_swap_out();
    swap_trace!("swapped out {:#x} (frame {}) to slot {}", va, frame, slot);
    Ok(())
}
