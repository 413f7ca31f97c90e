//! `extern "C"` surface over [`conservation_core::cons`]. `Cons` never
//! fails and never touches the last-error register; a null or zero-length
//! buffer is simply treated as the empty slice.

use std::os::raw::c_int;

use conservation_core::cons;

use crate::macros::abi_fn;

unsafe fn slice_from_raw<'a>(ptr: *const u8, len: usize) -> &'a [u8] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(ptr, len) }
    }
}

abi_fn! {
    /// `S(d) -> u8`, the mod-96 sum.
    fn conservation_sum(ptr: *const u8, len: usize) -> u8 {
        cons::sum(slice_from_raw(ptr, len))
    }
}

abi_fn! {
    /// `true` (`1`) iff `S(d) == 0`.
    fn conservation_check(ptr: *const u8, len: usize) -> c_int {
        c_int::from(cons::check(slice_from_raw(ptr, len)))
    }
}

abi_fn! {
    /// `delta(before, after) -> u8`. `before_len` and `after_len` must
    /// match; a mismatch returns `0` since `Cons` has no error channel.
    fn conservation_delta(
        before_ptr: *const u8,
        before_len: usize,
        after_ptr: *const u8,
        after_len: usize
    ) -> u8 {
        if before_len != after_len {
            return 0;
        }
        cons::delta(
            slice_from_raw(before_ptr, before_len),
            slice_from_raw(after_ptr, after_len),
        )
    }
}
