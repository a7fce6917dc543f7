//! Physical frame allocator.
//!
//! Frames are handed out one at a time with a next-fit scan over the core
//! map. The frames themselves live in a single block of memory owned by the
//! allocator, so page contents can be copied in and out without raw pointers.

use alloc::{boxed::Box, vec};
use arbitrary_int::u20;
use bitbybit::bitfield;
use pageswap_shared::mem::PAGE_FRAME_SIZE;

/// Physical frame number, as stored in a page table entry.
pub type FrameNumber = u20;

const MAX_FRAMES: usize = 1 << 20;

#[bitfield(u8, default = 0)]
pub struct CoreMapEntry {
    #[bit(0, rw)]
    allocated: bool,
    /// Reserved for the kernel at boot; never handed out or freed.
    #[bit(1, rw)]
    pinned: bool,
}

pub struct FrameAllocator {
    memory: Box<[u8]>,
    core_map: Box<[CoreMapEntry]>,
    frames_allocated: usize,
    /// The next frame number to start searching from.
    position: usize,
}

impl FrameAllocator {
    pub fn new(num_frames: usize) -> Self {
        assert!(
            num_frames <= MAX_FRAMES,
            "too many frames for a 20-bit frame number"
        );
        Self {
            memory: vec![0; num_frames * PAGE_FRAME_SIZE].into_boxed_slice(),
            core_map: vec![CoreMapEntry::default(); num_frames].into_boxed_slice(),
            frames_allocated: 0,
            position: 0,
        }
    }

    /// Reserves the first `count` frames for the kernel image and boot data.
    pub fn pin_frames(&mut self, count: usize) {
        for entry in self.core_map.iter_mut().take(count) {
            if !entry.allocated() {
                *entry = entry.with_allocated(true).with_pinned(true);
                self.frames_allocated += 1;
            }
        }
    }

    /// Allocates one zeroed frame, or `None` when physical memory is exhausted.
    pub fn alloc_frame(&mut self) -> Option<FrameNumber> {
        let total_frames = self.core_map.len();
        if self.frames_allocated == total_frames {
            return None;
        }

        let index = (0..total_frames)
            .map(|i| (self.position + i) % total_frames)
            .find(|&i| !self.core_map[i].allocated())?;

        self.core_map[index] = self.core_map[index].with_allocated(true);
        self.frames_allocated += 1;
        self.position = (index + 1) % total_frames;

        self.frame_mut(Self::frame_number(index)).fill(0);
        Some(Self::frame_number(index))
    }

    pub fn free_frame(&mut self, frame: FrameNumber) {
        let index = Self::index(frame);
        let entry = self.core_map[index];
        assert!(entry.allocated(), "double free of frame {index:#x}");
        assert!(!entry.pinned(), "freeing pinned frame {index:#x}");

        self.core_map[index] = entry.with_allocated(false);
        self.frames_allocated -= 1;
    }

    /// Number of frames currently available for allocation.
    pub fn free_frames(&self) -> usize {
        self.core_map.len() - self.frames_allocated
    }

    pub fn is_allocated(&self, frame: FrameNumber) -> bool {
        self.core_map
            .get(Self::index(frame))
            .is_some_and(|entry| entry.allocated())
    }

    pub fn frame(&self, frame: FrameNumber) -> &[u8] {
        let start = Self::index(frame) * PAGE_FRAME_SIZE;
        &self.memory[start..start + PAGE_FRAME_SIZE]
    }

    pub fn frame_mut(&mut self, frame: FrameNumber) -> &mut [u8] {
        let start = Self::index(frame) * PAGE_FRAME_SIZE;
        &mut self.memory[start..start + PAGE_FRAME_SIZE]
    }

    fn index(frame: FrameNumber) -> usize {
        frame.value() as usize
    }

    #[allow(clippy::cast_possible_truncation)]
    fn frame_number(index: usize) -> FrameNumber {
        u20::new(index as u32)
    }
}
