//! Batch ABI: contiguous descriptor arrays bridging multi-call workloads
//! to the `Cons`/`Wit` primitives, with process-wide counters and a
//! cache-aware batch-size heuristic.
//!
//! Processing order is always input order. Every descriptor's
//! status/out field is filled before the call returns, even when the
//! overall call reports failure: partial failure surfaces a best-effort
//! per-descriptor status.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::cons;
use crate::err::{Error, ErrorKind, Result};
use crate::witness::{self, Witness};

/// Minimum descriptor count per batch call.
pub const MIN_BATCH: usize = 1;
/// Maximum descriptor count per batch call.
pub const MAX_BATCH: usize = 256;

fn validate_count(count: usize) -> Result<()> {
    if !(MIN_BATCH..=MAX_BATCH).contains(&count) {
        return Err(Error::Invalid);
    }
    Ok(())
}

// ---------------------------------------------------------------------
// Descriptor shapes
// ---------------------------------------------------------------------

/// Per-descriptor outcome for a `check` batch call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pending,
    Conserved,
    NotConserved,
    Invalid,
}

/// Input-only descriptor for `Cons::check`.
#[derive(Debug)]
pub struct CheckDescriptor<'a> {
    pub buffer: &'a [u8],
    pub status: CheckStatus,
}

impl<'a> CheckDescriptor<'a> {
    #[must_use]
    pub fn new(buffer: &'a [u8]) -> Self {
        CheckDescriptor {
            buffer,
            status: CheckStatus::Pending,
        }
    }
}

/// Before/after descriptor for `Cons::delta`. `out_delta` is `None` until
/// processed, and stays `None` if the descriptor is invalid.
#[derive(Debug)]
pub struct DeltaDescriptor<'a> {
    pub before: &'a [u8],
    pub after: &'a [u8],
    pub out_delta: Option<u8>,
}

impl<'a> DeltaDescriptor<'a> {
    #[must_use]
    pub fn new(before: &'a [u8], after: &'a [u8]) -> Self {
        DeltaDescriptor {
            before,
            after,
            out_delta: None,
        }
    }
}

/// Witness-output descriptor for `Wit::generate`. `out_witness` is `None`
/// on entry, populated on success.
#[derive(Debug)]
pub struct WitnessDescriptor<'a> {
    pub buffer: &'a [u8],
    pub out_witness: Option<Witness>,
    pub status: ErrorKind,
}

impl<'a> WitnessDescriptor<'a> {
    #[must_use]
    pub fn new(buffer: &'a [u8]) -> Self {
        WitnessDescriptor {
            buffer,
            out_witness: None,
            status: ErrorKind::Ok,
        }
    }
}

// ---------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------

/// Four monotonic counters tracking batch-layer throughput.
#[derive(Debug, Default)]
pub struct BatchStats {
    conserved_calls: AtomicU64,
    delta_calls: AtomicU64,
    witness_calls: AtomicU64,
    total_buffers: AtomicU64,
}

impl BatchStats {
    const fn new() -> Self {
        BatchStats {
            conserved_calls: AtomicU64::new(0),
            delta_calls: AtomicU64::new(0),
            witness_calls: AtomicU64::new(0),
            total_buffers: AtomicU64::new(0),
        }
    }

    /// `(conserved_calls, delta_calls, witness_calls, total_buffers)`.
    #[must_use]
    pub fn snapshot(&self) -> (u64, u64, u64, u64) {
        (
            self.conserved_calls.load(Ordering::Relaxed),
            self.delta_calls.load(Ordering::Relaxed),
            self.witness_calls.load(Ordering::Relaxed),
            self.total_buffers.load(Ordering::Relaxed),
        )
    }

    /// Atomically zeroes all four counters.
    pub fn reset(&self) {
        self.conserved_calls.store(0, Ordering::Relaxed);
        self.delta_calls.store(0, Ordering::Relaxed);
        self.witness_calls.store(0, Ordering::Relaxed);
        self.total_buffers.store(0, Ordering::Relaxed);
    }
}

static STATS: BatchStats = BatchStats::new();

/// Process-wide batch-layer statistics.
#[must_use]
pub fn stats() -> &'static BatchStats {
    &STATS
}

/// Atomically zeroes the process-wide batch counters.
pub fn reset_statistics() {
    STATS.reset();
}

/// One structured record per batch call, in the same in-memory-log idiom
/// as [`crate::domain::DomainLogRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLogRecord {
    pub op: &'static str,
    pub count: usize,
    pub ok_count: u64,
    pub err_count: u64,
}

impl std::fmt::Display for BatchLogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}/{} ok ({} err)",
            self.op, self.ok_count, self.count, self.err_count
        )
    }
}

// ---------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------

/// Batched `Cons::check`. Returns the per-call log plus the overall
/// outcome: `Ok(())` iff every descriptor processed without a fatal
/// (empty-buffer) error.
pub fn check_batch(descriptors: &mut [CheckDescriptor<'_>]) -> (BatchLogRecord, Result<()>) {
    if validate_count(descriptors.len()).is_err() {
        let log = BatchLogRecord {
            op: "check",
            count: descriptors.len(),
            ok_count: 0,
            err_count: descriptors.len() as u64,
        };
        return (log, Err(Error::Invalid));
    }

    let mut ok_count = 0u64;
    let mut err_count = 0u64;
    for descriptor in descriptors.iter_mut() {
        if descriptor.buffer.is_empty() {
            descriptor.status = CheckStatus::Invalid;
            err_count += 1;
        } else {
            descriptor.status = if cons::check(descriptor.buffer) {
                CheckStatus::Conserved
            } else {
                CheckStatus::NotConserved
            };
            ok_count += 1;
        }
    }

    STATS
        .conserved_calls
        .fetch_add(descriptors.len() as u64, Ordering::Relaxed);
    STATS
        .total_buffers
        .fetch_add(descriptors.len() as u64, Ordering::Relaxed);

    let log = BatchLogRecord {
        op: "check",
        count: descriptors.len(),
        ok_count,
        err_count,
    };
    let outcome = if err_count == 0 { Ok(()) } else { Err(Error::Invalid) };
    crate::err::set_last_error(match &outcome {
        Ok(()) => ErrorKind::Ok,
        Err(e) => e.kind(),
    });
    (log, outcome)
}

/// Batched `Cons::delta`. A descriptor is invalid (and left as `None`) if
/// `before.len() != after.len()` or either buffer is empty.
pub fn delta_batch(descriptors: &mut [DeltaDescriptor<'_>]) -> (BatchLogRecord, Result<()>) {
    if validate_count(descriptors.len()).is_err() {
        let log = BatchLogRecord {
            op: "delta",
            count: descriptors.len(),
            ok_count: 0,
            err_count: descriptors.len() as u64,
        };
        return (log, Err(Error::Invalid));
    }

    let mut ok_count = 0u64;
    let mut err_count = 0u64;
    for descriptor in descriptors.iter_mut() {
        let valid = !descriptor.before.is_empty()
            && descriptor.before.len() == descriptor.after.len();
        if valid {
            descriptor.out_delta = Some(cons::delta(descriptor.before, descriptor.after));
            ok_count += 1;
        } else {
            descriptor.out_delta = None;
            err_count += 1;
        }
    }

    STATS
        .delta_calls
        .fetch_add(descriptors.len() as u64, Ordering::Relaxed);
    STATS
        .total_buffers
        .fetch_add((descriptors.len() * 2) as u64, Ordering::Relaxed);

    let log = BatchLogRecord {
        op: "delta",
        count: descriptors.len(),
        ok_count,
        err_count,
    };
    let outcome = if err_count == 0 { Ok(()) } else { Err(Error::Invalid) };
    crate::err::set_last_error(match &outcome {
        Ok(()) => ErrorKind::Ok,
        Err(e) => e.kind(),
    });
    (log, outcome)
}

/// Batched `Wit::generate`.
pub fn witness_generate_batch(
    descriptors: &mut [WitnessDescriptor<'_>],
) -> (BatchLogRecord, Result<()>) {
    if validate_count(descriptors.len()).is_err() {
        let log = BatchLogRecord {
            op: "witness_generate",
            count: descriptors.len(),
            ok_count: 0,
            err_count: descriptors.len() as u64,
        };
        return (log, Err(Error::Invalid));
    }

    let mut ok_count = 0u64;
    let mut err_count = 0u64;
    for descriptor in descriptors.iter_mut() {
        match witness::generate(descriptor.buffer) {
            Ok(w) => {
                descriptor.out_witness = Some(w);
                descriptor.status = ErrorKind::Ok;
                ok_count += 1;
            }
            Err(e) => {
                descriptor.out_witness = None;
                descriptor.status = e.kind();
                err_count += 1;
            }
        }
    }

    STATS
        .witness_calls
        .fetch_add(descriptors.len() as u64, Ordering::Relaxed);
    STATS
        .total_buffers
        .fetch_add(descriptors.len() as u64, Ordering::Relaxed);

    let log = BatchLogRecord {
        op: "witness_generate",
        count: descriptors.len(),
        ok_count,
        err_count,
    };
    let outcome = if err_count == 0 { Ok(()) } else { Err(Error::Invalid) };
    crate::err::set_last_error(match &outcome {
        Ok(()) => ErrorKind::Ok,
        Err(e) => e.kind(),
    });
    (log, outcome)
}

/// Cache-aware optimal batch-size heuristic.
///
/// - `buffer_size <= 64` -> 256
/// - `64 < buffer_size <= 1024` -> `clamp(L1_bytes / (4 * buffer_size), 8, 256)`
/// - `1024 < buffer_size <= 16 KiB` -> 16
/// - otherwise -> 8
#[must_use]
pub fn optimal_batch_size(buffer_size: usize) -> usize {
    const L1_BYTES: usize = 32 * 1024;
    const SIXTEEN_KIB: usize = 16 * 1024;

    if buffer_size <= 64 {
        256
    } else if buffer_size <= 1024 {
        (L1_BYTES / (4 * buffer_size)).clamp(8, 256)
    } else if buffer_size <= SIXTEEN_KIB {
        16
    } else {
        8
    }
}
