#![cfg_attr(target_os = "none", no_std)]

pub mod macros;
pub mod mem;
pub mod paging;
#[cfg(all(target_os = "none", target_arch = "x86"))]
pub mod serial;
pub mod sizes;
