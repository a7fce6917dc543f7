// https://wiki.osdev.org/Paging
// https://wiki.osdev.org/Setting_Up_Paging

// Avoids lots of warnings about casting usize to u32 which cannot result in
// truncation on a 32-bit platform, which is all we support. It would be nice if
// you could tell clippy that you were only dealing with 32-bit usizes...
#![allow(clippy::cast_possible_truncation)]

use crate::mem::PAGE_FRAME_SIZE;
use arbitrary_int::{u10, u12, u20};
use bitbybit::bitfield;
use core::mem::size_of;

pub const PAGE_DIRECTORY_LEN: usize = PAGE_FRAME_SIZE / size_of::<PageDirectoryEntry>();
pub const PAGE_TABLE_LEN: usize = PAGE_FRAME_SIZE / size_of::<PageTableEntry>();

/// Bytes of address space covered by one page directory entry.
pub const PAGE_TABLE_SPAN: usize = PAGE_TABLE_LEN * PAGE_FRAME_SIZE;

/// Mask of the low entry bits that hold flags rather than the frame number.
const FLAG_MASK: u32 = 0xfff;

#[bitfield(u32, default = 0)]
pub struct PageDirectoryEntry {
    #[bit(0, rw)]
    present: bool,
    #[bit(1, rw)]
    read_write: bool,
    #[bit(2, rw)]
    user_supervisor: bool,
    #[bit(3, rw)]
    write_through: bool,
    #[bit(4, rw)]
    cache_disable: bool,
    #[bit(5, rw)]
    accessed: bool,
    #[bit(7, rw)]
    page_size: bool,
    #[bits(12..=31, rw)]
    page_table_address: u20,
}

/// A hardware page table entry.
///
/// When `present` is clear the processor ignores every other bit, so the
/// kernel is free to reuse `page_frame_address` for its own bookkeeping (the
/// swap subsystem stores a slot number there and marks the entry with the
/// software-available bit 9).
#[bitfield(u32, default = 0)]
pub struct PageTableEntry {
    #[bit(0, rw)]
    present: bool,
    #[bit(1, rw)]
    read_write: bool,
    #[bit(2, rw)]
    user_supervisor: bool,
    #[bit(3, rw)]
    write_through: bool,
    #[bit(4, rw)]
    cache_disable: bool,
    #[bit(5, rw)]
    accessed: bool,
    #[bit(6, rw)]
    dirty: bool,
    #[bit(7, rw)]
    page_attribute_table: bool,
    #[bit(8, rw)]
    global: bool,
    #[bit(9, rw)]
    swapped: bool,
    #[bits(12..=31, rw)]
    page_frame_address: u20,
}

impl PageTableEntry {
    /// The low 12 bits: permission, status and available-to-software bits.
    pub fn flag_bits(&self) -> u12 {
        u12::new((self.raw_value() & FLAG_MASK) as u16)
    }

    pub fn with_flag_bits(self, flags: u12) -> Self {
        Self::new_with_raw_value((self.raw_value() & !FLAG_MASK) | u32::from(flags.value()))
    }

    pub fn is_zero(&self) -> bool {
        self.raw_value() == 0
    }
}

#[bitfield(u32)]
pub struct VirtualAddress {
    #[bits(22..=31, r)]
    page_directory_index: u10,
    #[bits(12..=21, r)]
    page_table_index: u10,
    #[bits(0..=11, r)]
    offset: u12,
}

impl VirtualAddress {
    pub fn from_usize(addr: usize) -> Self {
        Self::new_with_raw_value(addr as u32)
    }

    pub fn directory_index(&self) -> usize {
        usize::from(self.page_directory_index().value())
    }

    pub fn table_index(&self) -> usize {
        usize::from(self.page_table_index().value())
    }
}
