//! Conservation arithmetic: mod-96 reductions over byte slices.
//!
//! `Cons` is total on any slice: there is no failure mode, so nothing here
//! touches the `err` module. The only policy choice is the fast-path
//! threshold: a widened lane fold for `len >= VECTOR_THRESHOLD`, otherwise a
//! plain scalar loop. Both reduce modulo 96 only once, at the end, so
//! partial sums never bias the result.

/// The modulus every class, budget cell, and digest binding in this crate
/// reduces under.
pub const MODULUS: u32 = 96;

/// Minimum length before the widened-lane fold is used over the scalar
/// loop. Chosen to match a single cache line's worth of lanes.
const VECTOR_THRESHOLD: usize = 64;

/// Number of parallel accumulator lanes in the fast path.
const LANES: usize = 16;

/// `S(d) = (sum of bytes) mod 96`.
#[must_use]
pub fn sum(d: &[u8]) -> u8 {
    let total: u64 = if d.len() >= VECTOR_THRESHOLD {
        sum_vectorized(d)
    } else {
        sum_scalar(d)
    };
    (total % u64::from(MODULUS)) as u8
}

/// Plain scalar accumulation, exposed for benchmarking and testing against
/// [`sum_vectorized`]; [`sum`] picks between the two automatically.
#[must_use]
pub fn sum_scalar(d: &[u8]) -> u64 {
    d.iter().map(|&b| u64::from(b)).sum()
}

/// Lane-folded accumulation: `LANES` independent running sums combined at
/// the end, which both autovectorizes well and avoids a single dependency
/// chain across the whole slice.
#[must_use]
pub fn sum_vectorized(d: &[u8]) -> u64 {
    let mut lanes = [0u64; LANES];
    let chunks = d.chunks_exact(LANES);
    let remainder = chunks.remainder();
    for chunk in chunks {
        for (lane, &byte) in lanes.iter_mut().zip(chunk) {
            *lane += u64::from(byte);
        }
    }
    let mut total: u64 = lanes.iter().sum();
    total += sum_scalar(remainder);
    total
}

/// `true` iff `S(d) == 0`.
#[must_use]
pub fn check(d: &[u8]) -> bool {
    sum(d) == 0
}

/// `(S(b) - S(a)) mod 96`, handling modular underflow by adding the
/// modulus before the final reduction rather than via signed subtraction.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`, per the documented precondition.
#[must_use]
pub fn delta(a: &[u8], b: &[u8]) -> u8 {
    assert_eq!(a.len(), b.len(), "delta requires equal-length slices");
    let sa = u32::from(sum(a));
    let sb = u32::from(sum(b));
    (((sb + MODULUS) - sa) % MODULUS) as u8
}

/// `true` iff every length-`w` sliding window of `d` satisfies `check`.
/// Falls back to checking `d` whole when `w > d.len()`.
#[must_use]
pub fn window_streaming_check(d: &[u8], w: usize) -> bool {
    if w == 0 || w > d.len() {
        return check(d);
    }
    // Streaming update: maintain the running sum of the current window and
    // slide by adding the incoming byte and removing the outgoing one
    // modulo 96, instead of resumming each window from scratch.
    let mut window_sum = u32::from(sum(&d[..w]));
    if window_sum % MODULUS != 0 {
        return false;
    }
    for i in w..d.len() {
        let incoming = u32::from(d[i]);
        let outgoing = u32::from(d[i - w]);
        window_sum = (window_sum + incoming + MODULUS - (outgoing % MODULUS)) % MODULUS;
        if window_sum != 0 {
            return false;
        }
    }
    true
}

/// Writes `sum(buffers[i])` into `out[i]` for every buffer, in input order.
///
/// # Panics
///
/// Panics if `out.len() != buffers.len()`, mirroring the one-to-one
/// descriptor contract used throughout the batch ABI.
pub fn batch_update(buffers: &[&[u8]], out: &mut [u8]) {
    assert_eq!(buffers.len(), out.len());
    for (buf, slot) in buffers.iter().zip(out.iter_mut()) {
        *slot = sum(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conservation_closure() {
        for len in [0usize, 1, 63, 64, 65, 300] {
            let d: Vec<u8> = (0..len).map(|i| (i * 37 + 11) as u8).collect();
            assert!(sum(&d) < MODULUS as u8);
        }
    }

    #[test]
    fn scalar_and_vectorized_paths_agree() {
        let d: Vec<u8> = (0..500u32).map(|i| (i % 251) as u8).collect();
        assert_eq!(sum_scalar(&d) % u64::from(MODULUS), u64::from(sum(&d)));
    }

    #[test]
    fn basic_check_scenario() {
        let d = [48u8, 48u8];
        assert_eq!(sum(&d), 0);
        assert!(check(&d));
    }

    #[test]
    fn delta_scenarios() {
        assert_eq!(delta(&[0], &[5]), 5);
        assert_eq!(delta(&[95], &[0]), 1);
    }

    #[test]
    fn delta_algebra_holds_for_random_pairs() {
        let mut state = 0x2545F4914F6CDD1Du64;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };
        for _ in 0..200 {
            let len = 1 + (next() % 40) as usize;
            let a: Vec<u8> = (0..len).map(|_| next() as u8).collect();
            let b: Vec<u8> = (0..len).map(|_| next() as u8).collect();
            let lhs = (u32::from(sum(&a)) + u32::from(delta(&a, &b))) % MODULUS;
            assert_eq!(lhs, u32::from(sum(&b)));
        }
    }

    #[test]
    fn window_soundness() {
        // Every 2-byte window sums to a multiple of 96.
        let d = [48u8, 48, 96u8.wrapping_sub(1), 1, 0, 0];
        if window_streaming_check(&d, 2) {
            for w in d.windows(2) {
                assert!(check(w));
            }
        }
    }

    #[test]
    fn window_wider_than_data_falls_back_to_whole_check() {
        let d = [1u8, 2, 3];
        assert_eq!(window_streaming_check(&d, 10), check(&d));
    }

    #[test]
    fn batch_update_matches_individual_sums() {
        let a = [1u8, 2, 3];
        let b = [4u8; 70];
        let c: [u8; 0] = [];
        let bufs: [&[u8]; 3] = [&a, &b, &c];
        let mut out = [0u8; 3];
        batch_update(&bufs, &mut out);
        assert_eq!(out, [sum(&a), sum(&b), sum(&c)]);
    }
}
