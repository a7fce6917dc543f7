use super::adaptive::maybe_swap;
use super::pte_codec::PageState;
use super::swap_error::SwapError;
use super::swapping_utils::read_slot;
use crate::mem::FrameNumber;
use crate::paging::PageManager;
use crate::system::SystemState;
use crate::threading::process::Pid;
use pageswap_shared::{
    eprintln,
    mem::{page_round_down, PAGE_FRAME_SIZE},
};

/// Brings the swapped page at `va` of process `pid` back into memory.
///
/// The frame is allocated without the process lock, since that may run an
/// eviction pass. The lock is then held from re-reading the entry until the
/// slot is released, so the slot cannot be freed and refilled underneath us.
pub fn swap_in(system: &SystemState, pid: Pid, va: usize) -> Result<(), SwapError> {
    let va = page_round_down(va);
    let process = system
        .process
        .table
        .lock()
        .get(pid)
        .ok_or(SwapError::NoProcess(pid))?;

    match lookup(&process.lock().page_manager, va) {
        PageState::Swapped { .. } => {}
        PageState::Present { .. } => return Err(SwapError::AlreadyPresent),
        PageState::Unmapped => return Err(SwapError::NoMapping),
    }

    let frame = alloc_frame_with_retry(system)?;

    let mut pcb = process.lock();
    let slot = match install(system, &mut pcb.page_manager, pid, va, frame) {
        Ok(slot) => slot,
        Err(err) => {
            system.frames.lock().free_frame(frame);
            return Err(err);
        }
    };
    pcb.rss += 1;
    drop(pcb);

    system.swap.record_swap_in();
    swap_trace!("swapped in {:#x} (frame {}) from slot {}", va, frame, slot);
    Ok(())
}

/// Reads the slot `va` currently names into `frame`, maps it and releases the
/// slot. Returns the slot. On error the entry is untouched and `frame` is
/// still the caller's.
fn install(
    system: &SystemState,
    page_manager: &mut PageManager,
    pid: Pid,
    va: usize,
    frame: FrameNumber,
) -> Result<usize, SwapError> {
    // Another fault may have resolved the entry while the frame was found.
    let slot = match lookup(page_manager, va) {
        PageState::Swapped { slot, .. } => slot,
        PageState::Present { .. } => return Err(SwapError::AlreadyPresent),
        PageState::Unmapped => return Err(SwapError::NoMapping),
    };

    let Some(perm) = system.swap.slots.read_permission(slot) else {
        eprintln!("swap_in: pid {pid} va {va:#x} names invalid swap slot {slot}");
        return Err(SwapError::Corrupt(slot));
    };

    let mut page = [0u8; PAGE_FRAME_SIZE];
    read_slot(&system.block_manager, system.swap.device(), slot, &mut page)?;
    system.frames.lock().frame_mut(frame).copy_from_slice(&page);

    let entry = page_manager
        .entry_mut(va, false)
        .ok_or(SwapError::NoMapping)?;
    *entry = PageState::Present { frame, flags: perm }.encode();
    page_manager.flush_tlb();
    system.swap.slots.release(slot);
    Ok(slot)
}

fn lookup(page_manager: &PageManager, va: usize) -> PageState {
    page_manager
        .entry(va)
        .map_or(PageState::Unmapped, PageState::decode)
}

/// One allocation, then one eviction pass and exactly one more allocation.
fn alloc_frame_with_retry(system: &SystemState) -> Result<FrameNumber, SwapError> {
    let first = system.frames.lock().alloc_frame();
    if let Some(frame) = first {
        return Ok(frame);
    }
    maybe_swap(system);
    let second = system.frames.lock().alloc_frame();
    second.ok_or(SwapError::OutOfMemory)
}
