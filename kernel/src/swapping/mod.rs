//! Swapping of user pages to a dedicated block device.
//!
//! A page is evicted by writing it to a free slot of the swap area and
//! rewriting its page table entry to remember the slot. The next access
//! faults, and the page is read back into a fresh frame.
//!
//! Lock order: controller, process table, process, then any of frames, slot
//! table and block manager. The eviction pass is never started with a process
//! lock held.

/// Per-page tracing, compiled in with the `debug_swap` feature. Defined ahead
/// of the submodules so they see it in textual scope.
macro_rules! swap_trace {
    ($($arg:tt)*) => {
        if cfg!(feature = "debug_swap") {
            pageswap_shared::println!($($arg)*);
        }
    };
}

pub mod adaptive;
pub mod cleanup;
pub mod page_replacement;
pub mod pte_codec;
pub mod swap_area;
pub mod swap_error;
pub mod swap_in;
pub mod swap_out;
pub mod swapping_utils;

use crate::sync::mutex::Mutex;
use adaptive::{AdaptiveController, SwapConfig};
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};
use pageswap_shared::{println, sizes::SWAP_SLOTS};
use swap_area::SlotTable;

pub use adaptive::{maybe_swap, PassReport};
pub use cleanup::cleanup;
pub use swap_error::SwapError;
pub use swap_in::swap_in;
pub use swap_out::swap_out;

/// The swap area and the controller deciding when to use it.
pub struct SwapSpace {
    pub slots: SlotTable,
    pub controller: Mutex<AdaptiveController>,
    /// Block manager index of the swap device.
    device: usize,

    pages_swapped_out: AtomicUsize,
    pages_swapped_in: AtomicUsize,
    passes: AtomicUsize,
}

impl SwapSpace {
    pub fn new(device: usize, config: SwapConfig) -> Self {
        let swap = Self {
            slots: SlotTable::new(SWAP_SLOTS),
            controller: Mutex::new(AdaptiveController::new(config)),
            device,
            pages_swapped_out: AtomicUsize::new(0),
            pages_swapped_in: AtomicUsize::new(0),
            passes: AtomicUsize::new(0),
        };
        println!("Swap area initialized with {SWAP_SLOTS} slots");
        swap
    }

    pub fn device(&self) -> usize {
        self.device
    }

    pub(crate) fn record_swap_out(&self) {
        self.pages_swapped_out.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_swap_in(&self) {
        self.pages_swapped_in.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_pass(&self) {
        self.passes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> SwapStats {
        let controller = self.controller.lock();
        SwapStats {
            total_slots: self.slots.capacity(),
            free_slots: self.slots.free_slots(),
            pages_swapped_out: self.pages_swapped_out.load(Ordering::Relaxed),
            pages_swapped_in: self.pages_swapped_in.load(Ordering::Relaxed),
            passes: self.passes.load(Ordering::Relaxed),
            threshold: controller.threshold(),
            pages_per_pass: controller.pages_per_pass(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapStats {
    pub total_slots: usize,
    pub free_slots: usize,
    pub pages_swapped_out: usize,
    pub pages_swapped_in: usize,
    pub passes: usize,
    pub threshold: usize,
    pub pages_per_pass: usize,
}

impl fmt::Display for SwapStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let used = self.total_slots - self.free_slots;
        writeln!(f, "=== Swap Statistics ===")?;
        writeln!(f, "  Slots: {} used / {} total", used, self.total_slots)?;
        writeln!(f, "  Out:   {} pages", self.pages_swapped_out)?;
        writeln!(f, "  In:    {} pages", self.pages_swapped_in)?;
        write!(
            f,
            "  Passes: {} (threshold {}, {} pages per pass)",
            self.passes, self.threshold, self.pages_per_pass
        )
    }
}
