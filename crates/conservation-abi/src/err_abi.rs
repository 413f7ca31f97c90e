//! `extern "C"` surface over [`conservation_core::err`]: the stable ordinal
//! kind and the last-error register.

use std::ffi::c_char;
use std::os::raw::c_int;

use conservation_core::err::{self, ErrorKind};

use crate::macros::abi_fn;

abi_fn! {
    /// Reads the task-local last-error register; ordinal 0 = Ok .. 7 =
    /// Destroyed.
    fn conservation_last_error() -> u8 {
        err::last_error().ordinal()
    }
}

abi_fn! {
    /// Renders a fixed ASCII phrase for an error ordinal. Returns a pointer
    /// to a `'static` C string, or null for an out-of-range ordinal.
    fn conservation_error_string(kind: u8) -> *const c_char {
        match ErrorKind::from_ordinal(kind) {
            Some(k) => k.error_cstr().as_ptr(),
            None => std::ptr::null(),
        }
    }
}

abi_fn! {
    /// `true` (`1`) iff `kind` is a recoverable error (`State` or `Budget`,
    /// the two kinds a caller can plausibly retry past); `false` (`0`)
    /// otherwise, including for an out-of-range ordinal.
    fn conservation_error_is_recoverable(kind: u8) -> c_int {
        match ErrorKind::from_ordinal(kind) {
            Some(ErrorKind::State | ErrorKind::Budget) => 1,
            _ => 0,
        }
    }
}
