//! Process-wide entropy pool and monotonic witness-timestamp counter.
//!
//! Two pieces of global mutable state exist in this crate: this pool and
//! the domain-id counter in `domain`. Both are lazily-initialised
//! module-scope singletons. A one-shot init behind double-checked locking
//! is the classic shape for this; `std::sync::OnceLock` is that pattern
//! already reduced to a safe, single always-atomic path, so no raw
//! lock/flag pair is hand-rolled here.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

struct EntropyPool {
    seed: [u8; 32],
    counter: AtomicU64,
}

static POOL: OnceLock<EntropyPool> = OnceLock::new();

fn pool() -> &'static EntropyPool {
    POOL.get_or_init(|| {
        let mut seed = [0u8; 32];
        // Process-scoped seed derived from a scheduling-sensitive source
        // (address + time), not used for confidentiality: witnesses are
        // integrity tokens only.
        let addr = &seed as *const _ as u64;
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let mix = addr ^ nanos.rotate_left(17) ^ 0x9E3779B9_7F4A7C15;
        for (i, byte) in seed.iter_mut().enumerate() {
            *byte = (mix >> ((i % 8) * 8)) as u8;
        }
        EntropyPool {
            seed,
            counter: AtomicU64::new(0),
        }
    })
}

/// Returns the process-scoped 32-byte entropy seed. Opaque; not a key,
/// this crate has no confidentiality goals.
#[must_use]
pub fn seed() -> [u8; 32] {
    pool().seed
}

/// Bumps and returns the next value of the monotonic witness-timestamp
/// counter. Two distinct calls from any thread produce distinct values,
/// and the sequence is non-decreasing across all threads.
pub fn monotonic_next() -> u64 {
    pool().counter.fetch_add(1, Ordering::AcqRel) + 1
}
