//! Per-process two-level page tables.
//!
//! The page manager owns the page directory and every page table it points
//! at. Only the user half of the address space (`[0, OFFSET)`) is managed
//! here; the kernel half is shared and never swapped.

use crate::mem::FrameNumber;
use alloc::{boxed::Box, vec::Vec};
use arbitrary_int::{u12, u20};
use core::sync::atomic::{AtomicUsize, Ordering};
use pageswap_shared::{
    mem::{page_round_down, page_round_up, OFFSET, PAGE_FRAME_SIZE},
    paging::{
        PageDirectoryEntry, PageTableEntry, VirtualAddress, PAGE_DIRECTORY_LEN, PAGE_TABLE_LEN,
        PAGE_TABLE_SPAN,
    },
};

/// Page directory slots covering user addresses.
const USER_DIRECTORY_LEN: usize = OFFSET / PAGE_TABLE_SPAN;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagingError {
    /// The page is already mapped to a frame.
    AlreadyMapped,
    /// The address or length is not page aligned.
    Unaligned,
    /// The range reaches into kernel space.
    KernelAddress,
}

#[repr(align(4096))]
struct PageDirectory([PageDirectoryEntry; PAGE_DIRECTORY_LEN]);

#[repr(align(4096))]
struct PageTable([PageTableEntry; PAGE_TABLE_LEN]);

impl Default for PageDirectory {
    fn default() -> Self {
        Self([PageDirectoryEntry::default(); PAGE_DIRECTORY_LEN])
    }
}

impl Default for PageTable {
    fn default() -> Self {
        Self([PageTableEntry::default(); PAGE_TABLE_LEN])
    }
}

pub struct PageManager {
    directory: Box<PageDirectory>,
    tables: Vec<Option<Box<PageTable>>>,
    tlb_flushes: AtomicUsize,
}

impl Default for PageManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PageManager {
    pub fn new() -> Self {
        let mut tables = Vec::with_capacity(USER_DIRECTORY_LEN);
        tables.resize_with(USER_DIRECTORY_LEN, || None);
        Self {
            directory: Box::default(),
            tables,
            tlb_flushes: AtomicUsize::new(0),
        }
    }

    /// Returns a copy of the entry for `virt_addr`, or `None` if no page table
    /// covers it.
    pub fn entry(&self, virt_addr: usize) -> Option<PageTableEntry> {
        if virt_addr >= OFFSET {
            return None;
        }
        let va = VirtualAddress::from_usize(virt_addr);
        let table = self.tables[va.directory_index()].as_ref()?;
        Some(table.0[va.table_index()])
    }

    /// Walks to the entry for `virt_addr`, allocating the page table on the
    /// way if `create` is set.
    pub fn entry_mut(&mut self, virt_addr: usize, create: bool) -> Option<&mut PageTableEntry> {
        if virt_addr >= OFFSET {
            return None;
        }
        let va = VirtualAddress::from_usize(virt_addr);
        let dir_index = va.directory_index();

        if self.tables[dir_index].is_none() {
            if !create {
                return None;
            }
            let table = Box::<PageTable>::default();
            self.directory.0[dir_index] = PageDirectoryEntry::default()
                .with_present(true)
                .with_read_write(true)
                .with_user_supervisor(true)
                .with_page_table_address(physical_frame_of(&*table));
            self.tables[dir_index] = Some(table);
        }

        let table = self.tables[dir_index].as_mut()?;
        Some(&mut table.0[va.table_index()])
    }

    /// Maps `size` bytes starting at `virt_addr` onto consecutive frames
    /// starting at `frame`. Entries already present are never overwritten.
    pub fn map_pages(
        &mut self,
        virt_addr: usize,
        size: usize,
        frame: FrameNumber,
        flags: u12,
    ) -> Result<(), PagingError> {
        if virt_addr % PAGE_FRAME_SIZE != 0 {
            return Err(PagingError::Unaligned);
        }
        let end = page_round_up(virt_addr + size);
        if end > OFFSET {
            return Err(PagingError::KernelAddress);
        }

        let pages = (virt_addr..end).step_by(PAGE_FRAME_SIZE);
        if pages
            .clone()
            .any(|va| self.entry(va).is_some_and(|e| e.present()))
        {
            return Err(PagingError::AlreadyMapped);
        }

        for (i, va) in pages.enumerate() {
            let Some(entry) = self.entry_mut(va, true) else {
                return Err(PagingError::KernelAddress);
            };
            #[allow(clippy::cast_possible_truncation)]
            let target = u20::new(frame.value() + i as u32);
            *entry = PageTableEntry::default()
                .with_flag_bits(flags)
                .with_present(true)
                .with_page_frame_address(target);
        }
        Ok(())
    }

    /// Clears the entry for `virt_addr`, returning the frame if one was mapped.
    pub fn unmap(&mut self, virt_addr: usize) -> Option<FrameNumber> {
        let entry = self.entry_mut(page_round_down(virt_addr), false)?;
        let old = core::mem::take(entry);
        old.present().then(|| old.page_frame_address())
    }

    /// Every user entry that lives in an existing page table, in ascending
    /// address order. Entries of missing tables are skipped without a walk.
    pub fn user_entries(&self) -> impl Iterator<Item = (usize, PageTableEntry)> + '_ {
        self.tables
            .iter()
            .enumerate()
            .filter_map(|(dir_index, table)| Some((dir_index, table.as_ref()?)))
            .flat_map(|(dir_index, table)| {
                table
                    .0
                    .iter()
                    .enumerate()
                    .map(move |(i, entry)| (address_of(dir_index, i), *entry))
            })
    }

    pub fn user_entries_mut(&mut self) -> impl Iterator<Item = (usize, &mut PageTableEntry)> + '_ {
        self.tables
            .iter_mut()
            .enumerate()
            .filter_map(|(dir_index, table)| Some((dir_index, table.as_mut()?)))
            .flat_map(|(dir_index, table)| {
                table
                    .0
                    .iter_mut()
                    .enumerate()
                    .map(move |(i, entry)| (address_of(dir_index, i), entry))
            })
    }

    /// Invalidates every cached translation of this address space.
    ///
    /// Synchronous: once this returns no processor can use a stale entry.
    pub fn flush_tlb(&self) {
        self.tlb_flushes.fetch_add(1, Ordering::SeqCst);

        #[cfg(all(target_os = "none", target_arch = "x86"))]
        // SAFETY: Reloading CR3 with this process's own directory only drops
        // cached translations. Kernel mappings are identical in every directory.
        unsafe {
            let phys = (&*self.directory as *const PageDirectory as usize) - OFFSET;
            core::arch::asm!("mov cr3, {}", in(reg) phys, options(nostack));
        }
    }

    pub fn tlb_flushes(&self) -> usize {
        self.tlb_flushes.load(Ordering::SeqCst)
    }
}

fn address_of(dir_index: usize, table_index: usize) -> usize {
    dir_index * PAGE_TABLE_SPAN + table_index * PAGE_FRAME_SIZE
}

/// Physical frame holding a kernel heap object. Kernel memory is mapped at
/// `OFFSET`, so on the hosted build this is only a bookkeeping value.
#[allow(clippy::cast_possible_truncation)]
fn physical_frame_of<T>(object: &T) -> u20 {
    let phys = (object as *const T as usize).wrapping_sub(OFFSET);
    u20::new(((phys / PAGE_FRAME_SIZE) & 0xf_ffff) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_rw() -> u12 {
        u12::new(0b110)
    }

    #[test]
    fn test_walk_without_create() {
        let mut pm = PageManager::new();
        assert!(pm.entry(0x1000).is_none());
        assert!(pm.entry_mut(0x1000, false).is_none());
        assert!(pm.entry_mut(0x1000, true).is_some());
        assert!(pm.entry(0x1000).is_some_and(|e| e.is_zero()));
    }

    #[test]
    fn test_kernel_addresses_are_not_managed() {
        let mut pm = PageManager::new();
        assert!(pm.entry_mut(OFFSET, true).is_none());
        assert_eq!(
            pm.map_pages(OFFSET - PAGE_FRAME_SIZE, 2 * PAGE_FRAME_SIZE, u20::new(1), user_rw()),
            Err(PagingError::KernelAddress)
        );
    }

    #[test]
    fn test_map_pages() {
        let mut pm = PageManager::new();
        pm.map_pages(0x3000, 2 * PAGE_FRAME_SIZE, u20::new(7), user_rw())
            .unwrap();

        let first = pm.entry(0x3000).unwrap();
        assert!(first.present() && first.user_supervisor() && first.read_write());
        assert_eq!(first.page_frame_address().value(), 7);
        assert_eq!(pm.entry(0x4000).unwrap().page_frame_address().value(), 8);

        assert_eq!(
            pm.map_pages(0x4000, PAGE_FRAME_SIZE, u20::new(9), user_rw()),
            Err(PagingError::AlreadyMapped)
        );
        assert_eq!(
            pm.map_pages(0x4010, PAGE_FRAME_SIZE, u20::new(9), user_rw()),
            Err(PagingError::Unaligned)
        );
    }

    #[test]
    fn test_unmap_returns_frame() {
        let mut pm = PageManager::new();
        pm.map_pages(0x5000, PAGE_FRAME_SIZE, u20::new(3), user_rw())
            .unwrap();
        assert_eq!(pm.unmap(0x5abc), Some(u20::new(3)));
        assert_eq!(pm.unmap(0x5000), None);
        assert!(pm.entry(0x5000).unwrap().is_zero());
    }

    #[test]
    fn test_user_entries_ascending() {
        let mut pm = PageManager::new();
        pm.map_pages(0x0080_0000, PAGE_FRAME_SIZE, u20::new(2), user_rw())
            .unwrap();
        pm.map_pages(0x1000, PAGE_FRAME_SIZE, u20::new(1), user_rw())
            .unwrap();

        let present: Vec<usize> = pm
            .user_entries()
            .filter(|(_, e)| e.present())
            .map(|(va, _)| va)
            .collect();
        assert_eq!(present, [0x1000, 0x0080_0000]);
        // Two page tables, nothing else walked.
        assert_eq!(pm.user_entries().count(), 2 * PAGE_TABLE_LEN);
    }

    #[test]
    fn test_flush_counter() {
        let pm = PageManager::new();
        pm.flush_tlb();
        pm.flush_tlb();
        assert_eq!(pm.tlb_flushes(), 2);
    }
}
