//! Kernel access to user memory.
//!
//! Every access goes through the owning process's page table the way the MMU
//! would: the accessed (and for writes, dirty) bit is set, and a swapped page
//! is faulted back in before it is touched.

use crate::swapping::{pte_codec::PageState, SwapError};
use crate::system::SystemState;
use crate::threading::process::Pid;
use pageswap_shared::mem::{page_round_down, OFFSET, PAGE_FRAME_SIZE};

pub fn copy_to_user(
    system: &SystemState,
    pid: Pid,
    va: usize,
    data: &[u8],
) -> Result<(), SwapError> {
    for_each_page(va, data.len(), |addr, done, len| {
        let offset = addr % PAGE_FRAME_SIZE;
        with_resident_page(system, pid, addr, true, |page| {
            page[offset..offset + len].copy_from_slice(&data[done..done + len]);
        })
    })
}

pub fn copy_from_user(
    system: &SystemState,
    pid: Pid,
    va: usize,
    buf: &mut [u8],
) -> Result<(), SwapError> {
    for_each_page(va, buf.len(), |addr, done, len| {
        let offset = addr % PAGE_FRAME_SIZE;
        with_resident_page(system, pid, addr, false, |page| {
            buf[done..done + len].copy_from_slice(&page[offset..offset + len]);
        })
    })
}

/// Splits `[va, va + count)` at page boundaries and calls `f(addr, done, len)`
/// for each piece.
fn for_each_page(
    va: usize,
    count: usize,
    mut f: impl FnMut(usize, usize, usize) -> Result<(), SwapError>,
) -> Result<(), SwapError> {
    // Trying to touch kernel memory.
    if va.checked_add(count).map_or(true, |end| end > OFFSET) {
        return Err(SwapError::NoMapping);
    }

    let mut done = 0;
    while done < count {
        let addr = va + done;
        let len = (PAGE_FRAME_SIZE - addr % PAGE_FRAME_SIZE).min(count - done);
        f(addr, done, len)?;
        done += len;
    }
    Ok(())
}

fn with_resident_page<R>(
    system: &SystemState,
    pid: Pid,
    va: usize,
    write: bool,
    f: impl FnOnce(&mut [u8]) -> R,
) -> Result<R, SwapError> {
    let page = page_round_down(va);
    let process = system.process_ref(pid)?;

    loop {
        {
            let mut pcb = process.lock();
            let entry = pcb
                .page_manager
                .entry_mut(page, false)
                .ok_or(SwapError::NoMapping)?;
            match PageState::decode(*entry) {
                PageState::Present { frame, .. } => {
                    *entry = entry.with_accessed(true).with_dirty(entry.dirty() || write);
                    let mut frames = system.frames.lock();
                    return Ok(f(frames.frame_mut(frame)));
                }
                PageState::Unmapped => return Err(SwapError::NoMapping),
                PageState::Swapped { .. } => {}
            }
        }

        // The page may be evicted again before the lock is retaken, in which
        // case it simply faults once more.
        match system.handle_page_fault(pid, page) {
            Ok(()) | Err(SwapError::AlreadyPresent) => {}
            Err(err) => return Err(err),
        }
    }
}
