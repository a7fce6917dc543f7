use crate::block::block_error::BlockError;
use crate::threading::process::Pid;
use core::error::Error;
use core::fmt::{Debug, Display, Formatter};

/// Error type for swap operations
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SwapError {
    /// Every swap slot is in use
    NoFreeSlot,
    /// Swap-out was asked to evict a page that is not resident
    NotPresent,
    /// No page table entry exists for the address
    NoMapping,
    /// Swap-in was asked to restore a page that is already resident
    AlreadyPresent,
    /// A swapped entry names a slot that is out of range or free
    Corrupt(usize),
    /// No frame could be found, even after an eviction pass
    OutOfMemory,
    /// The process does not exist
    NoProcess(Pid),
    /// The swap device failed
    Block(BlockError),
}

impl From<BlockError> for SwapError {
    fn from(err: BlockError) -> Self {
        SwapError::Block(err)
    }
}

impl Debug for SwapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            SwapError::NoFreeSlot => write!(f, "NoFreeSlot"),
            SwapError::NotPresent => write!(f, "NotPresent"),
            SwapError::NoMapping => write!(f, "NoMapping"),
            SwapError::AlreadyPresent => write!(f, "AlreadyPresent"),
            SwapError::Corrupt(slot) => write!(f, "Corrupt({slot})"),
            SwapError::OutOfMemory => write!(f, "OutOfMemory"),
            SwapError::NoProcess(pid) => write!(f, "NoProcess({pid})"),
            SwapError::Block(err) => write!(f, "Block({err:?})"),
        }
    }
}

impl Display for SwapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            SwapError::NoFreeSlot => write!(f, "no free swap slot"),
            SwapError::NotPresent => write!(f, "page is not present"),
            SwapError::NoMapping => write!(f, "no mapping for address"),
            SwapError::AlreadyPresent => write!(f, "page is already present"),
            SwapError::Corrupt(slot) => write!(f, "corrupt swap entry for slot {slot}"),
            SwapError::OutOfMemory => write!(f, "out of memory"),
            SwapError::NoProcess(pid) => write!(f, "no process with pid {pid}"),
            SwapError::Block(err) => write!(f, "swap device: {err}"),
        }
    }
}

impl Error for SwapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SwapError::Block(err) => Some(err),
            _ => None,
        }
    }
}
