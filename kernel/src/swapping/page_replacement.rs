use crate::mem::FrameNumber;
use crate::paging::PageManager;
use crate::threading::process::{ProcessRef, ProcessStatus, ProcessTable};
use pageswap_shared::paging::PageTableEntry;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VictimPage {
    pub va: usize,
    pub frame: FrameNumber,
}

pub trait PageReplacementPolicy {
    /// Picks a resident user page of `page_manager` to evict, or `None` if the
    /// address space has nothing to give.
    fn select_victim(&self, page_manager: &mut PageManager) -> Option<VictimPage>;
}

enum ClockPhase {
    /// Look for a page whose accessed bit is clear.
    FindUnreferenced,
    /// Clear every accessed bit, then flush once.
    ClearReferences,
    /// Every accessed bit is now clear: take the first candidate.
    TakeFirst,
}

/// Second-chance clock over the user address range, in ascending order.
///
/// Scans at most twice before the final pick, whatever the table contents.
#[derive(Default)]
pub struct ClockReplacement;

impl PageReplacementPolicy for ClockReplacement {
    fn select_victim(&self, page_manager: &mut PageManager) -> Option<VictimPage> {
        let mut phase = ClockPhase::FindUnreferenced;
        loop {
            phase = match phase {
                ClockPhase::FindUnreferenced => {
                    let found = page_manager
                        .user_entries()
                        .find(|(_, entry)| is_candidate(entry) && !entry.accessed());
                    if let Some(found) = found {
                        return Some(victim(found));
                    }
                    ClockPhase::ClearReferences
                }
                ClockPhase::ClearReferences => {
                    let mut cleared = 0usize;
                    for (_, entry) in page_manager.user_entries_mut() {
                        if is_candidate(entry) {
                            *entry = entry.with_accessed(false);
                            cleared += 1;
                        }
                    }
                    if cleared == 0 {
                        return None;
                    }
                    page_manager.flush_tlb();
                    ClockPhase::TakeFirst
                }
                ClockPhase::TakeFirst => {
                    return page_manager
                        .user_entries()
                        .find(|(_, entry)| is_candidate(entry))
                        .map(victim);
                }
            };
        }
    }
}

fn is_candidate(entry: &PageTableEntry) -> bool {
    entry.present() && entry.user_supervisor()
}

fn victim((va, entry): (usize, PageTableEntry)) -> VictimPage {
    VictimPage {
        va,
        frame: entry.page_frame_address(),
    }
}

/// The live process holding the most resident pages. Ties go to the lowest pid.
pub fn find_victim_process(table: &ProcessTable) -> Option<ProcessRef> {
    let mut best: Option<(usize, &ProcessRef)> = None;
    let mut best_pid = 0;

    for process in table.iter() {
        let pcb = process.lock();
        if pcb.status == ProcessStatus::Unused || pcb.pid < 1 || pcb.rss == 0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((rss, _)) => pcb.rss > rss || (pcb.rss == rss && pcb.pid < best_pid),
        };
        if better {
            best = Some((pcb.rss, process));
            best_pid = pcb.pid;
        }
    }

    best.map(|(_, process)| process.clone())
}
