//! `extern "C"` surface over [`conservation_core::batch`]. This is where
//! the raw, 8-byte-aligned descriptor arrays a C caller passes get
//! translated into the safe, slice-backed descriptors the core dispatches
//! over, and back again.

use std::os::raw::c_int;

use conservation_core::batch::{
    self, CheckDescriptor, CheckStatus, DeltaDescriptor, WitnessDescriptor,
};
use conservation_core::witness::Witness;

use crate::macros::abi_fn;

/// Input-only descriptor for a batched `check` call. `status` is written
/// on return: `0` not-conserved, `1` conserved, `2` invalid (zero-length
/// buffer), `3` unprocessed (the whole batch was rejected for an
/// out-of-range count before any descriptor ran).
#[repr(C)]
pub struct CCheckDescriptor {
    pub ptr: *const u8,
    pub len: usize,
    pub status: u8,
    pub _reserved: [u8; 7],
}

/// Before/after descriptor for a batched `delta` call. `out_delta` is
/// written on return; `has_delta` is `0` if the descriptor was invalid
/// (mismatched or zero lengths).
#[repr(C)]
pub struct CDeltaDescriptor {
    pub before: *const u8,
    pub after: *const u8,
    pub len: usize,
    pub out_delta: u8,
    pub has_delta: u8,
    pub _reserved: [u8; 6],
}

/// Witness-output descriptor for a batched `witness_generate` call.
/// `out_witness` is null on entry and, on success, an owned pointer the
/// caller must release with `conservation_witness_destroy`. `status` is
/// the error-kind ordinal for this descriptor.
#[repr(C)]
pub struct CWitnessDescriptor {
    pub ptr: *const u8,
    pub len: usize,
    pub out_witness: *mut Witness,
    pub status: u8,
    pub _reserved: [u8; 7],
}

fn check_status_code(status: CheckStatus) -> u8 {
    match status {
        CheckStatus::NotConserved => 0,
        CheckStatus::Conserved => 1,
        CheckStatus::Invalid => 2,
        CheckStatus::Pending => 3,
    }
}

abi_fn! {
    /// Batched `Cons::check`. Returns `0` iff every descriptor processed
    /// without a fatal error.
    fn conservation_batch_check(descriptors: *mut CCheckDescriptor, count: usize) -> c_int {
        if descriptors.is_null() {
            return -1;
        }
        let raw = std::slice::from_raw_parts_mut(descriptors, count);
        let mut owned: Vec<CheckDescriptor<'_>> = raw
            .iter()
            .map(|d| {
                let buffer: &[u8] = if d.ptr.is_null() || d.len == 0 {
                    &[]
                } else {
                    std::slice::from_raw_parts(d.ptr, d.len)
                };
                CheckDescriptor::new(buffer)
            })
            .collect();
        let (_log, outcome) = batch::check_batch(&mut owned);
        for (dst, src) in raw.iter_mut().zip(owned.iter()) {
            dst.status = check_status_code(src.status);
        }
        if outcome.is_ok() { 0 } else { -1 }
    }
}

abi_fn! {
    /// Batched `Cons::delta`.
    fn conservation_batch_delta(descriptors: *mut CDeltaDescriptor, count: usize) -> c_int {
        if descriptors.is_null() {
            return -1;
        }
        let raw = std::slice::from_raw_parts_mut(descriptors, count);
        let mut owned: Vec<DeltaDescriptor<'_>> = raw
            .iter()
            .map(|d| {
                let before: &[u8] = if d.before.is_null() || d.len == 0 {
                    &[]
                } else {
                    std::slice::from_raw_parts(d.before, d.len)
                };
                let after: &[u8] = if d.after.is_null() || d.len == 0 {
                    &[]
                } else {
                    std::slice::from_raw_parts(d.after, d.len)
                };
                DeltaDescriptor::new(before, after)
            })
            .collect();
        let (_log, outcome) = batch::delta_batch(&mut owned);
        for (dst, src) in raw.iter_mut().zip(owned.iter()) {
            match src.out_delta {
                Some(v) => {
                    dst.out_delta = v;
                    dst.has_delta = 1;
                }
                None => {
                    dst.out_delta = 0;
                    dst.has_delta = 0;
                }
            }
        }
        if outcome.is_ok() { 0 } else { -1 }
    }
}

abi_fn! {
    /// Batched `Wit::generate`. Each successful descriptor's `out_witness`
    /// becomes an owned pointer; the caller must eventually release every
    /// non-null one with `conservation_witness_destroy`.
    fn conservation_batch_witness_generate(
        descriptors: *mut CWitnessDescriptor,
        count: usize
    ) -> c_int {
        if descriptors.is_null() {
            return -1;
        }
        let raw = std::slice::from_raw_parts_mut(descriptors, count);
        let mut owned: Vec<WitnessDescriptor<'_>> = raw
            .iter()
            .map(|d| {
                let buffer: &[u8] = if d.ptr.is_null() || d.len == 0 {
                    &[]
                } else {
                    std::slice::from_raw_parts(d.ptr, d.len)
                };
                WitnessDescriptor::new(buffer)
            })
            .collect();
        let (_log, outcome) = batch::witness_generate_batch(&mut owned);
        for (dst, src) in raw.iter_mut().zip(owned.iter_mut()) {
            dst.status = src.status.ordinal();
            dst.out_witness = match src.out_witness.take() {
                Some(w) => Box::into_raw(Box::new(w)),
                None => std::ptr::null_mut(),
            };
        }
        if outcome.is_ok() { 0 } else { -1 }
    }
}

abi_fn! {
    /// `optimal_batch_size(buffer_size)`.
    fn conservation_optimal_batch_size(buffer_size: usize) -> usize {
        batch::optimal_batch_size(buffer_size)
    }
}

abi_fn! {
    /// Snapshots the four process-wide batch counters into `out[4]`
    /// (`conserved_calls, delta_calls, witness_calls, total_buffers`).
    fn conservation_batch_stats(out: *mut u64) {
        if out.is_null() {
            return;
        }
        let (conserved, delta, witness, total) = batch::stats().snapshot();
        let out = std::slice::from_raw_parts_mut(out, 4);
        out[0] = conserved;
        out[1] = delta;
        out[2] = witness;
        out[3] = total;
    }
}

abi_fn! {
    /// Atomically zeroes the four process-wide batch counters.
    fn conservation_batch_reset_statistics() {
        batch::reset_statistics();
    }
}
