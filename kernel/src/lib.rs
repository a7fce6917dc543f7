//! Demand paging with an adaptive swapper for a small x86 kernel.
//!
//! The crate builds freestanding for `target_os = "none"` and against `std`
//! everywhere else, so the whole subsystem runs under the host test harness.

#![cfg_attr(target_os = "none", no_std)]

extern crate alloc;

pub mod block;
pub mod drivers;
pub mod mem;
pub mod paging;
pub mod swapping;
pub mod sync;
pub mod system;
pub mod threading;
