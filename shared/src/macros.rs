//! Console output for the kernel.
//!
//! On bare-metal x86 everything goes out of the first serial port. On a hosted
//! target (unit tests) the std streams are used instead, so the output shows
//! up in the test harness.

use core::fmt;

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::macros::_print(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! println {
    () => {
        $crate::print!("\n")
    };
    ($($arg:tt)*) => {
        $crate::macros::_print(format_args!("{}\n", format_args!($($arg)*)))
    };
}

#[macro_export]
macro_rules! eprint {
    ($($arg:tt)*) => {
        $crate::macros::_eprint(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! eprintln {
    () => {
        $crate::eprint!("\n")
    };
    ($($arg:tt)*) => {
        $crate::macros::_eprint(format_args!("{}\n", format_args!($($arg)*)))
    };
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    #[cfg(all(target_os = "none", target_arch = "x86"))]
    crate::serial::write_fmt(args);

    #[cfg(all(target_os = "none", not(target_arch = "x86")))]
    let _ = args;

    #[cfg(not(target_os = "none"))]
    std::print!("{args}");
}

#[doc(hidden)]
pub fn _eprint(args: fmt::Arguments) {
    #[cfg(all(target_os = "none", target_arch = "x86"))]
    crate::serial::write_fmt(args);

    #[cfg(all(target_os = "none", not(target_arch = "x86")))]
    let _ = args;

    #[cfg(not(target_os = "none"))]
    std::eprint!("{args}");
}
