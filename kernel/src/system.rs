use crate::block::block_core::{BlockDriver, BlockManager, BlockType};
use crate::block::block_error::BlockError;
use crate::drivers::ram_disk::RamDisk;
use crate::mem::{FrameAllocator, FrameNumber};
use crate::swapping::{
    self, adaptive::SwapConfig, pte_codec::PageState, swapping_utils::SWAP_DEVICE_SECTORS,
    PassReport, SwapError, SwapSpace, SwapStats,
};
use crate::sync::mutex::Mutex;
use crate::threading::process::{
    create_process_state, Pid, ProcessRef, ProcessState, ProcessStatus,
};
use alloc::{boxed::Box, vec::Vec};
use arbitrary_int::u12;
use once_cell::race::OnceBox;
use pageswap_shared::{
    eprintln,
    mem::{is_user_address, page_round_down, PAGE_FRAME_SIZE},
    println,
};

pub struct SystemState {
    pub frames: Mutex<FrameAllocator>,
    pub process: ProcessState,

    pub block_manager: Mutex<BlockManager>,
    pub swap: SwapSpace,
}

static SYSTEM: OnceBox<SystemState> = OnceBox::new();

/// Installs the global system state. Only the first call has an effect.
pub fn init_system(state: SystemState) -> &'static SystemState {
    if SYSTEM.set(Box::new(state)).is_err() {
        eprintln!("init_system: system already initialized");
    }
    unwrap_system()
}

pub fn unwrap_system() -> &'static SystemState {
    SYSTEM.get().expect("System not initialized.")
}

pub fn print_swap_stats() {
    match SYSTEM.get() {
        Some(system) => println!("{}", system.stats()),
        None => println!("Swap: not configured"),
    }
}

impl SystemState {
    /// Builds the system around the first registered swap device.
    pub fn new(
        frames: FrameAllocator,
        mut block_manager: BlockManager,
        config: SwapConfig,
    ) -> Result<Self, SwapError> {
        let swap = block_manager
            .by_type(BlockType::Swap)
            .ok_or(BlockError::NoDevice)?;
        if swap.get_size() < SWAP_DEVICE_SECTORS {
            eprintln!(
                "swap device \"{}\" has {} sectors, {} needed",
                swap.get_name(),
                swap.get_size(),
                SWAP_DEVICE_SECTORS
            );
            return Err(BlockError::SectorOutOfBounds.into());
        }
        let device = swap.get_index();
        Ok(Self::assemble(frames, block_manager, device, config))
    }

    /// A system with `num_frames` frames of user memory and a RAM disk for swap.
    pub fn with_ram_swap(num_frames: usize, config: SwapConfig) -> Self {
        let mut block_manager = BlockManager::new();
        let device = block_manager.register_block(
            BlockType::Swap,
            "ramswap",
            SWAP_DEVICE_SECTORS,
            BlockDriver::Ram(RamDisk::new(SWAP_DEVICE_SECTORS)),
        );
        Self::assemble(FrameAllocator::new(num_frames), block_manager, device, config)
    }

    fn assemble(
        frames: FrameAllocator,
        block_manager: BlockManager,
        device: usize,
        config: SwapConfig,
    ) -> Self {
        Self {
            frames: Mutex::new(frames),
            process: create_process_state(),
            block_manager: Mutex::new(block_manager),
            swap: SwapSpace::new(device, config),
        }
    }

    pub fn process_ref(&self, pid: Pid) -> Result<ProcessRef, SwapError> {
        self.process
            .table
            .lock()
            .get(pid)
            .ok_or(SwapError::NoProcess(pid))
    }

    pub fn maybe_swap(&self) -> Option<PassReport> {
        swapping::maybe_swap(self)
    }

    pub fn swap_in(&self, pid: Pid, va: usize) -> Result<(), SwapError> {
        swapping::swap_in(self, pid, va)
    }

    /// Swaps out one resident page of `pid` and gives its frame back.
    pub fn evict_page(&self, pid: Pid, va: usize) -> Result<(), SwapError> {
        let va = page_round_down(va);
        let process = self.process_ref(pid)?;
        let mut pcb = process.lock();
        let frame = match pcb.page_manager.entry(va).map(PageState::decode) {
            Some(PageState::Present { frame, .. }) => frame,
            _ => return Err(SwapError::NotPresent),
        };

        swapping::swap_out(self, &mut pcb.page_manager, va, frame)?;
        pcb.rss = pcb.rss.saturating_sub(1);
        self.frames.lock().free_frame(frame);
        Ok(())
    }

    /// Resolves a page fault of `pid` at `va`. Only faults on swapped pages
    /// can be resolved; anything else is reported back to the caller.
    pub fn handle_page_fault(&self, pid: Pid, va: usize) -> Result<(), SwapError> {
        if !is_user_address(va) {
            return Err(SwapError::NoMapping);
        }
        let result = self.swap_in(pid, va);
        if let Err(err @ (SwapError::Corrupt(_) | SwapError::OutOfMemory)) = result {
            eprintln!("pid {pid}: unrecoverable page fault at {va:#x}: {err}");
        }
        result
    }

    /// Backs the page at `va` with a fresh zeroed frame, running the swapper
    /// first if memory is low.
    pub fn alloc_user_page(
        &self,
        pid: Pid,
        va: usize,
        perm: u12,
    ) -> Result<FrameNumber, SwapError> {
        let va = page_round_down(va);
        if !is_user_address(va) {
            return Err(SwapError::NoMapping);
        }
        let process = self.process_ref(pid)?;

        self.maybe_swap();

        let frame = self
            .frames
            .lock()
            .alloc_frame()
            .ok_or(SwapError::OutOfMemory)?;

        let mut pcb = process.lock();
        let state = pcb
            .page_manager
            .entry(va)
            .map_or(PageState::Unmapped, PageState::decode);
        if state != PageState::Unmapped {
            self.frames.lock().free_frame(frame);
            return Err(SwapError::AlreadyPresent);
        }
        if pcb
            .page_manager
            .map_pages(va, PAGE_FRAME_SIZE, frame, perm)
            .is_err()
        {
            self.frames.lock().free_frame(frame);
            return Err(SwapError::NoMapping);
        }
        pcb.rss += 1;
        Ok(frame)
    }

    /// Tears down `pid`: releases its swap slots, frees its resident frames
    /// and drops it from the process table. Returns the number of slots freed.
    pub fn reap_process(&self, pid: Pid) -> Result<usize, SwapError> {
        let process = self
            .process
            .table
            .lock()
            .remove(pid)
            .ok_or(SwapError::NoProcess(pid))?;
        let mut pcb = process.lock();
        pcb.status = ProcessStatus::Zombie;

        let released = swapping::cleanup(&self.swap.slots, &mut pcb.page_manager);

        let frames: Vec<FrameNumber> = pcb
            .page_manager
            .user_entries_mut()
            .filter_map(|(_, entry)| {
                let old = core::mem::take(entry);
                old.present().then(|| old.page_frame_address())
            })
            .collect();
        pcb.page_manager.flush_tlb();
        let mut allocator = self.frames.lock();
        for frame in frames {
            allocator.free_frame(frame);
        }
        drop(allocator);

        pcb.rss = 0;
        pcb.status = ProcessStatus::Unused;
        Ok(released)
    }

    pub fn stats(&self) -> SwapStats {
        self.swap.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::user::{copy_from_user, copy_to_user};
    use crate::swapping::adaptive::PAGES_PER_PASS_LIMIT;
    use alloc::sync::Arc;
    use arbitrary_int::u20;
    use core::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    const USER_RW: u16 = 0b110;

    /// A controller that only fires when memory is completely gone.
    fn quiet() -> SwapConfig {
        SwapConfig {
            initial_threshold: 1,
            initial_pages_per_pass: 4,
            alpha: 25,
            beta: 10,
            limit: PAGES_PER_PASS_LIMIT,
        }
    }

    fn pattern(seed: u8) -> Vec<u8> {
        (0..PAGE_FRAME_SIZE)
            .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
            .collect()
    }

    /// Maps a frame at `va` without consulting the swapper.
    fn map_page(system: &SystemState, pid: Pid, va: usize) -> FrameNumber {
        let frame = system.frames.lock().alloc_frame().unwrap();
        let process = system.process_ref(pid).unwrap();
        let mut pcb = process.lock();
        pcb.page_manager
            .map_pages(va, PAGE_FRAME_SIZE, frame, u12::new(USER_RW))
            .unwrap();
        pcb.rss += 1;
        frame
    }

    fn state_of(system: &SystemState, pid: Pid, va: usize) -> PageState {
        let process = system.process_ref(pid).unwrap();
        let pcb = process.lock();
        pcb.page_manager
            .entry(va)
            .map_or(PageState::Unmapped, PageState::decode)
    }

    fn rss_of(system: &SystemState, pid: Pid) -> usize {
        system.process_ref(pid).unwrap().lock().rss
    }

    #[test]
    fn test_requires_swap_device() {
        let frames = FrameAllocator::new(4);
        let result = SystemState::new(frames, BlockManager::new(), quiet());
        assert!(matches!(result, Err(SwapError::Block(BlockError::NoDevice))));

        let mut manager = BlockManager::new();
        manager.register_block(
            BlockType::Swap,
            "tiny",
            64,
            BlockDriver::Ram(RamDisk::new(64)),
        );
        let result = SystemState::new(FrameAllocator::new(4), manager, quiet());
        assert!(matches!(
            result,
            Err(SwapError::Block(BlockError::SectorOutOfBounds))
        ));
    }

    #[test]
    fn test_picks_registered_swap_device() {
        let mut manager = BlockManager::new();
        manager.register_block(BlockType::Raw, "raw", 8, BlockDriver::Ram(RamDisk::new(8)));
        manager.register_block(
            BlockType::Swap,
            "swap",
            SWAP_DEVICE_SECTORS,
            BlockDriver::Ram(RamDisk::new(SWAP_DEVICE_SECTORS)),
        );
        let system = SystemState::new(FrameAllocator::new(4), manager, quiet()).unwrap();
        assert_eq!(system.swap.device(), 1);
    }

    #[test]
    fn test_round_trip() {
        let system = SystemState::with_ram_swap(16, quiet());
        let pid = system.process.spawn().lock().pid;
        system.alloc_user_page(pid, 0x1000, u12::new(USER_RW)).unwrap();

        let data = pattern(7);
        copy_to_user(&system, pid, 0x1000, &data).unwrap();
        let PageState::Present { flags: before, .. } = state_of(&system, pid, 0x1000) else {
            panic!("page should be resident");
        };

        let free = system.frames.lock().free_frames();
        system.evict_page(pid, 0x1000).unwrap();
        assert_eq!(system.frames.lock().free_frames(), free + 1);
        assert_eq!(rss_of(&system, pid), 0);
        assert!(matches!(
            state_of(&system, pid, 0x1000),
            PageState::Swapped { slot: 0, .. }
        ));
        assert_eq!(system.stats().free_slots, 799);

        system.swap_in(pid, 0x1abc).unwrap();
        let PageState::Present { frame, flags } = state_of(&system, pid, 0x1000) else {
            panic!("page should be resident again");
        };
        assert_eq!(flags, before);
        assert_eq!(system.frames.lock().frame(frame), &data[..]);
        assert_eq!(rss_of(&system, pid), 1);
        assert_eq!(system.stats().free_slots, 800);

        let stats = system.stats();
        assert_eq!(stats.pages_swapped_out, 1);
        assert_eq!(stats.pages_swapped_in, 1);
    }

    #[test]
    fn test_swap_in_twice() {
        let system = SystemState::with_ram_swap(16, quiet());
        let pid = system.process.spawn().lock().pid;
        map_page(&system, pid, 0x1000);
        system.evict_page(pid, 0x1000).unwrap();

        system.swap_in(pid, 0x1000).unwrap();
        assert_eq!(system.swap_in(pid, 0x1000), Err(SwapError::AlreadyPresent));
        assert_eq!(rss_of(&system, pid), 1);
        assert_eq!(system.stats().pages_swapped_in, 1);
    }

    #[test]
    fn test_swap_in_misuse() {
        let system = SystemState::with_ram_swap(16, quiet());
        let pid = system.process.spawn().lock().pid;
        assert_eq!(system.swap_in(pid, 0x1000), Err(SwapError::NoMapping));
        assert_eq!(system.swap_in(42, 0x1000), Err(SwapError::NoProcess(42)));
        assert_eq!(system.evict_page(pid, 0x1000), Err(SwapError::NotPresent));
    }

    #[test]
    fn test_corrupt_entries_are_rejected() {
        let system = SystemState::with_ram_swap(16, quiet());
        let pid = system.process.spawn().lock().pid;
        {
            let process = system.process_ref(pid).unwrap();
            let mut pcb = process.lock();
            for (va, slot) in [(0x1000, 5), (0x2000, 900)] {
                *pcb.page_manager.entry_mut(va, true).unwrap() = PageState::Swapped {
                    slot,
                    flags: u12::new(USER_RW),
                }
                .encode();
            }
        }

        assert_eq!(system.swap_in(pid, 0x1000), Err(SwapError::Corrupt(5)));
        assert_eq!(system.swap_in(pid, 0x2000), Err(SwapError::Corrupt(900)));
        assert_eq!(system.frames.lock().free_frames(), 16);
    }

    #[test]
    fn test_swap_out_without_free_slot() {
        let system = SystemState::with_ram_swap(16, quiet());
        let pid = system.process.spawn().lock().pid;
        map_page(&system, pid, 0x1000);
        while system.swap.slots.allocate().is_ok() {}

        assert_eq!(system.evict_page(pid, 0x1000), Err(SwapError::NoFreeSlot));
        assert!(matches!(
            state_of(&system, pid, 0x1000),
            PageState::Present { .. }
        ));
        assert_eq!(rss_of(&system, pid), 1);
    }

    #[test]
    fn test_failed_write_keeps_page_resident() {
        let system = SystemState::with_ram_swap(16, quiet());
        let pid = system.process.spawn().lock().pid;
        map_page(&system, pid, 0x1000);
        if let Some(BlockDriver::Ram(disk)) = system
            .block_manager
            .lock()
            .by_type(BlockType::Swap)
            .map(|block| block.driver_mut())
        {
            disk.set_read_only(true);
        }

        assert_eq!(
            system.evict_page(pid, 0x1000),
            Err(SwapError::Block(BlockError::WriteError))
        );
        assert!(matches!(
            state_of(&system, pid, 0x1000),
            PageState::Present { .. }
        ));
        assert_eq!(system.stats().free_slots, 800);
    }

    #[test]
    fn test_swap_in_evicts_when_memory_is_gone() {
        let system = SystemState::with_ram_swap(4, quiet());
        let pid = system.process.spawn().lock().pid;
        for va in [0x1000, 0x2000, 0x3000, 0x4000] {
            map_page(&system, pid, va);
        }
        system.evict_page(pid, 0x1000).unwrap();
        map_page(&system, pid, 0x5000);
        assert_eq!(system.frames.lock().free_frames(), 0);

        system.swap_in(pid, 0x1000).unwrap();
        assert!(matches!(
            state_of(&system, pid, 0x1000),
            PageState::Present { .. }
        ));
        let stats = system.stats();
        assert_eq!(stats.passes, 1);
        assert_eq!(stats.pages_swapped_out, 5);
        assert_eq!(rss_of(&system, pid), 1);
    }

    #[test]
    fn test_out_of_memory() {
        let system = SystemState::with_ram_swap(1, quiet());
        system.frames.lock().pin_frames(1);
        let pid = system.process.spawn().lock().pid;
        let slot = system.swap.slots.allocate().unwrap();
        {
            let process = system.process_ref(pid).unwrap();
            let mut pcb = process.lock();
            *pcb.page_manager.entry_mut(0x1000, true).unwrap() = PageState::Swapped {
                slot,
                flags: u12::new(USER_RW),
            }
            .encode();
        }

        assert_eq!(system.handle_page_fault(pid, 0x1000), Err(SwapError::OutOfMemory));
        assert!(system.swap.slots.is_allocated(slot));
        assert!(matches!(
            state_of(&system, pid, 0x1000),
            PageState::Swapped { .. }
        ));
    }

    #[test]
    fn test_no_pass_above_watermark() {
        let system = SystemState::with_ram_swap(200, SwapConfig::default());
        system.frames.lock().pin_frames(50);
        assert_eq!(system.frames.lock().free_frames(), 150);

        assert_eq!(system.maybe_swap(), None);
        let stats = system.stats();
        assert_eq!((stats.threshold, stats.pages_per_pass), (100, 4));
        assert_eq!(stats.passes, 0);
    }

    #[test]
    fn test_pass_below_watermark() {
        let system = SystemState::with_ram_swap(200, SwapConfig::default());
        system.frames.lock().pin_frames(140);
        let small = system.process.spawn().lock().pid;
        let big = system.process.spawn().lock().pid;
        map_page(&system, small, 0x1000);
        for i in 0..9 {
            map_page(&system, big, 0x1000 * (i + 1));
        }
        assert_eq!(system.frames.lock().free_frames(), 50);

        let report = system.maybe_swap().unwrap();
        assert_eq!(report.victim, Some(big));
        assert_eq!(report.swapped, 4);
        assert_eq!(rss_of(&system, big), 5);
        assert_eq!(rss_of(&system, small), 1);
        assert_eq!(system.frames.lock().free_frames(), 54);

        let stats = system.stats();
        assert_eq!((stats.threshold, stats.pages_per_pass), (90, 5));
        assert_eq!(stats.passes, 1);
    }

    #[test]
    fn test_pass_without_victim_still_adapts() {
        let system = SystemState::with_ram_swap(8, SwapConfig::default());
        let report = system.maybe_swap().unwrap();
        assert_eq!(
            report,
            PassReport {
                victim: None,
                swapped: 0,
                attempts: 0
            }
        );
        assert_eq!(system.stats().threshold, 90);
    }

    #[test]
    fn test_pass_gives_up_when_every_eviction_fails() {
        let system = SystemState::with_ram_swap(8, SwapConfig::default());
        let pid = system.process.spawn().lock().pid;
        for va in [0x1000, 0x2000, 0x3000] {
            map_page(&system, pid, va);
        }
        while system.swap.slots.allocate().is_ok() {}

        let report = system.maybe_swap().unwrap();
        assert_eq!(
            report,
            PassReport {
                victim: Some(pid),
                swapped: 0,
                attempts: 2 * 4
            }
        );
        assert_eq!(rss_of(&system, pid), 3);
        assert_eq!(system.frames.lock().free_frames(), 5);

        let stats = system.stats();
        assert_eq!((stats.threshold, stats.pages_per_pass), (90, 5));
        assert_eq!(stats.passes, 1);
        assert_eq!(stats.pages_swapped_out, 0);

        assert_eq!(system.maybe_swap().unwrap().attempts, 2 * 5);
    }

    #[test]
    fn test_alloc_user_page() {
        let system = SystemState::with_ram_swap(8, quiet());
        let pid = system.process.spawn().lock().pid;
        let frame = system.alloc_user_page(pid, 0x1234, u12::new(USER_RW)).unwrap();
        assert_eq!(
            state_of(&system, pid, 0x1000),
            PageState::Present {
                frame,
                flags: u12::new(USER_RW | 1)
            }
        );
        assert_eq!(
            system.alloc_user_page(pid, 0x1000, u12::new(USER_RW)),
            Err(SwapError::AlreadyPresent)
        );
        system.evict_page(pid, 0x1000).unwrap();
        assert_eq!(
            system.alloc_user_page(pid, 0x1000, u12::new(USER_RW)),
            Err(SwapError::AlreadyPresent)
        );
        assert_eq!(rss_of(&system, pid), 0);
        assert_eq!(system.frames.lock().free_frames(), 8);
    }

    #[test]
    fn test_fault_on_kernel_address() {
        let system = SystemState::with_ram_swap(8, quiet());
        let pid = system.process.spawn().lock().pid;
        assert_eq!(
            system.handle_page_fault(pid, 0x8000_1000),
            Err(SwapError::NoMapping)
        );
    }

    #[test]
    fn test_reap_process() {
        let system = SystemState::with_ram_swap(16, quiet());
        let victim = system.process.spawn().lock().pid;
        let bystander = system.process.spawn().lock().pid;
        for va in [0x1000, 0x2000, 0x3000] {
            map_page(&system, victim, va);
        }
        map_page(&system, bystander, 0x1000);
        system.evict_page(victim, 0x1000).unwrap();
        system.evict_page(victim, 0x3000).unwrap();
        system.evict_page(bystander, 0x1000).unwrap();
        assert_eq!(system.stats().free_slots, 797);

        assert_eq!(system.reap_process(victim), Ok(2));
        assert_eq!(system.stats().free_slots, 799);
        assert_eq!(system.frames.lock().free_frames(), 16);
        assert!(system.process_ref(victim).is_err());
        assert_eq!(system.reap_process(victim), Err(SwapError::NoProcess(victim)));

        system.swap_in(bystander, 0x1000).unwrap();
    }

    #[test]
    fn test_concurrent_processes() {
        const PAGES: usize = 8;
        let system = Arc::new(SystemState::with_ram_swap(64, quiet()));

        let workers: Vec<_> = (0..4u8)
            .map(|seed| {
                let system = system.clone();
                thread::spawn(move || {
                    let pid = system.process.spawn().lock().pid;
                    for page in 0..PAGES {
                        let va = (page + 1) * PAGE_FRAME_SIZE;
                        system.alloc_user_page(pid, va, u12::new(USER_RW)).unwrap();
                        copy_to_user(&system, pid, va, &pattern(seed + page as u8)).unwrap();
                    }
                    for page in 0..PAGES {
                        system.evict_page(pid, (page + 1) * PAGE_FRAME_SIZE).unwrap();
                    }
                    for page in 0..PAGES {
                        let mut back = vec![0u8; PAGE_FRAME_SIZE];
                        copy_from_user(&system, pid, (page + 1) * PAGE_FRAME_SIZE, &mut back)
                            .unwrap();
                        assert_eq!(back, pattern(seed + page as u8));
                    }
                    system.reap_process(pid).unwrap()
                })
            })
            .collect();

        for worker in workers {
            assert_eq!(worker.join().unwrap(), 0);
        }
        assert_eq!(system.stats().free_slots, 800);
        assert_eq!(system.frames.lock().free_frames(), 64);
    }

    #[test]
    fn test_racing_faults_keep_latest_contents() {
        const ROUNDS: u8 = 200;
        const VA: usize = 0x1000;
        let system = Arc::new(SystemState::with_ram_swap(16, quiet()));
        let pid = system.process.spawn().lock().pid;
        system.alloc_user_page(pid, VA, u12::new(USER_RW)).unwrap();
        let done = Arc::new(AtomicBool::new(false));

        let mut helpers: Vec<_> = (0..2)
            .map(|_| {
                let (system, done) = (system.clone(), done.clone());
                thread::spawn(move || {
                    while !done.load(Ordering::Relaxed) {
                        let _ = system.swap_in(pid, VA);
                    }
                })
            })
            .collect();
        helpers.push({
            let (system, done) = (system.clone(), done.clone());
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    let _ = system.evict_page(pid, VA);
                }
            })
        });

        let mut back = vec![0u8; PAGE_FRAME_SIZE];
        for round in 0..ROUNDS {
            copy_to_user(&system, pid, VA, &pattern(round)).unwrap();
            copy_from_user(&system, pid, VA, &mut back).unwrap();
            assert_eq!(back, pattern(round), "round {round} read stale contents");
        }
        done.store(true, Ordering::Relaxed);
        for helper in helpers {
            helper.join().unwrap();
        }

        let stats = system.stats();
        match state_of(&system, pid, VA) {
            PageState::Present { .. } => {
                assert_eq!(rss_of(&system, pid), 1);
                assert_eq!(stats.free_slots, 800);
            }
            PageState::Swapped { .. } => {
                assert_eq!(rss_of(&system, pid), 0);
                assert_eq!(stats.free_slots, 799);
            }
            PageState::Unmapped => panic!("page lost its mapping"),
        }
        assert_eq!(
            stats.pages_swapped_out - stats.pages_swapped_in,
            800 - stats.free_slots
        );
        copy_from_user(&system, pid, VA, &mut back).unwrap();
        assert_eq!(back, pattern(ROUNDS - 1));
    }

    #[test]
    fn test_frame_field_is_slot() {
        let system = SystemState::with_ram_swap(4, quiet());
        let pid = system.process.spawn().lock().pid;
        map_page(&system, pid, 0x1000);
        map_page(&system, pid, 0x2000);
        system.evict_page(pid, 0x1000).unwrap();
        system.evict_page(pid, 0x2000).unwrap();

        let process = system.process_ref(pid).unwrap();
        let entry = process.lock().page_manager.entry(0x2000).unwrap();
        assert!(!entry.present());
        assert_eq!(entry.page_frame_address(), u20::new(1));
    }
}
