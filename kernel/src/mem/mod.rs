pub mod frame_allocator;
pub mod user;

pub use frame_allocator::{CoreMapEntry, FrameAllocator, FrameNumber};
