use crate::mem::FrameNumber;
use arbitrary_int::{u12, u20};
use pageswap_shared::paging::PageTableEntry;

const MAX_SLOT_FIELD: usize = (1 << 20) - 1;

/// What a user page table entry currently describes.
///
/// A swapped entry reuses the hardware layout: present is clear, the frame
/// field holds the slot index, the permission bits stay where they were and
/// the software `swapped` bit is set so that slot 0 never encodes to zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageState {
    Unmapped,
    Present { frame: FrameNumber, flags: u12 },
    Swapped { slot: usize, flags: u12 },
}

impl PageState {
    pub fn decode(entry: PageTableEntry) -> Self {
        if entry.present() {
            PageState::Present {
                frame: entry.page_frame_address(),
                flags: entry.flag_bits(),
            }
        } else if entry.is_zero() {
            PageState::Unmapped
        } else {
            PageState::Swapped {
                slot: entry.page_frame_address().value() as usize,
                flags: entry.with_swapped(false).flag_bits(),
            }
        }
    }

    /// # Panics
    ///
    /// Panics if a swapped slot does not fit the 20-bit frame field.
    pub fn encode(self) -> PageTableEntry {
        match self {
            PageState::Unmapped => PageTableEntry::default(),
            PageState::Present { frame, flags } => PageTableEntry::default()
                .with_flag_bits(flags)
                .with_present(true)
                .with_page_frame_address(frame),
            PageState::Swapped { slot, flags } => {
                assert!(
                    slot <= MAX_SLOT_FIELD,
                    "swap slot {slot} does not fit in a page table entry"
                );
                #[allow(clippy::cast_possible_truncation)]
                let slot = u20::new(slot as u32);
                PageTableEntry::default()
                    .with_flag_bits(flags)
                    .with_present(false)
                    .with_swapped(true)
                    .with_page_frame_address(slot)
            }
        }
    }
}
