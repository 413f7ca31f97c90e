//! `extern "C"` surface over [`conservation_core::witness`]. Witnesses and
//! chain nodes cross the boundary as opaque owned pointers, allocated with
//! `Box::into_raw` and released with `Box::from_raw`.

use std::os::raw::c_int;

use conservation_core::err::ErrorKind;
use conservation_core::witness::{self, ChainNode, Witness};

use crate::macros::abi_fn;

unsafe fn slice_from_raw<'a>(ptr: *const u8, len: usize) -> &'a [u8] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(ptr, len) }
    }
}

abi_fn! {
    /// `generate(d) -> W`. Returns null on failure (zero-length data), with
    /// the last-error register set to `Invalid`.
    fn conservation_witness_generate(ptr: *const u8, len: usize) -> *mut Witness {
        match witness::generate(slice_from_raw(ptr, len)) {
            Ok(w) => Box::into_raw(Box::new(w)),
            Err(_) => std::ptr::null_mut(),
        }
    }
}

abi_fn! {
    /// `verify(W, d) -> bool`. A null witness is treated as a failed
    /// verification with kind `Destroyed`.
    fn conservation_witness_verify(w: *const Witness, ptr: *const u8, len: usize) -> c_int {
        let Some(w) = w.as_ref() else {
            conservation_core::err::set_last_error(ErrorKind::Destroyed);
            return 0;
        };
        c_int::from(witness::verify(w, slice_from_raw(ptr, len)))
    }
}

abi_fn! {
    /// `timestamp(W) -> u64`, `0` for a null witness.
    fn conservation_witness_timestamp(w: *const Witness) -> u64 {
        witness::timestamp(w.as_ref())
    }
}

abi_fn! {
    /// `resonance(W) -> u8`, `0` for a null witness.
    fn conservation_witness_resonance(w: *const Witness) -> u8 {
        witness::resonance(w.as_ref())
    }
}

abi_fn! {
    /// Merges up to 256 non-null witness pointers, skipping any null
    /// entries, per the ABI's null-tolerant contract. Returns null if the
    /// resulting constituent list is empty.
    fn conservation_witness_merge(ws: *const *const Witness, count: usize) -> *mut Witness {
        if ws.is_null() || count == 0 {
            return std::ptr::null_mut();
        }
        let raw = std::slice::from_raw_parts(ws, count);
        let constituents: Vec<&Witness> = raw.iter().filter_map(|p| p.as_ref()).collect();
        match witness::merge(&constituents) {
            Ok(w) => Box::into_raw(Box::new(w)),
            Err(_) => std::ptr::null_mut(),
        }
    }
}

abi_fn! {
    /// Destroys (zeroes and frees) an owned witness. A null pointer is a
    /// no-op.
    fn conservation_witness_destroy(w: *mut Witness) {
        if !w.is_null() {
            drop(Box::from_raw(w));
        }
    }
}

abi_fn! {
    /// Builds a fresh chain node owning a clone of `current`, linking to
    /// (and taking ownership of) `previous`. Returns null if `current` is
    /// null.
    fn conservation_chain(current: *const Witness, previous: *mut ChainNode) -> *mut ChainNode {
        let Some(current) = current.as_ref() else {
            return std::ptr::null_mut();
        };
        let previous_owned = if previous.is_null() {
            None
        } else {
            Some(*Box::from_raw(previous))
        };
        Box::into_raw(Box::new(witness::chain(current, previous_owned)))
    }
}

abi_fn! {
    /// `depth(node) -> u32`, `0` for a null node.
    fn conservation_chain_depth(node: *const ChainNode) -> u32 {
        witness::depth(node.as_ref())
    }
}

abi_fn! {
    /// Destroys an owned chain node, dropping its embedded previous chain.
    fn conservation_chain_destroy(node: *mut ChainNode) {
        if !node.is_null() {
            drop(Box::from_raw(node));
        }
    }
}
