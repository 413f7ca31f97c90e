//! Digest primitive: a 32-byte cryptographic hash over arbitrary byte
//! sequences, used to bind witnesses to the data that produced them.
//!
//! The backing construction is BLAKE3: it is vector-friendly for
//! throughput-bound embedding, and its 256-bit output matches the 32-byte
//! digest field in the witness record exactly with no truncation. See
//! DESIGN.md for the recorded rationale.

/// Digest width in bytes, matching the witness record's digest field.
pub const DIGEST_LEN: usize = 32;

/// A 32-byte digest.
pub type Digest = [u8; DIGEST_LEN];

/// `H(d) -> 32 bytes`. Deterministic across processes on the same
/// architecture; BLAKE3 is itself architecture-independent.
#[must_use]
pub fn hash(d: &[u8]) -> Digest {
    *blake3::hash(d).as_bytes()
}

/// Constant-time digest equality. Must be used for every witness
/// verification comparison so that timing does not leak how many leading
/// bytes matched.
#[must_use]
pub fn digest_eq(a: &Digest, b: &Digest) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let d = b"conservation runtime";
        assert_eq!(hash(d), hash(d));
    }

    #[test]
    fn length_sensitive() {
        let short = b"abc";
        let long = b"abcd";
        assert_ne!(hash(short), hash(long));
    }

    #[test]
    fn avalanche_statistical() {
        // Flip one bit in a fixed-size random-ish input many times and
        // confirm the expected >= 40% of output bits differ on average.
        let base: Vec<u8> = (0..256u32).map(|i| (i * 97 + 13) as u8).collect();
        let base_digest = hash(&base);

        let mut total_bits_flipped: u64 = 0;
        let mut trials: u64 = 0;
        for bit in 0..(base.len() * 8) {
            let mut flipped = base.clone();
            flipped[bit / 8] ^= 1 << (bit % 8);
            let flipped_digest = hash(&flipped);
            let differing_bits: u32 = base_digest
                .iter()
                .zip(flipped_digest.iter())
                .map(|(a, b)| (a ^ b).count_ones())
                .sum();
            total_bits_flipped += u64::from(differing_bits);
            trials += 1;
        }
        let total_output_bits = (DIGEST_LEN * 8) as u64 * trials;
        let fraction = total_bits_flipped as f64 / total_output_bits as f64;
        assert!(
            fraction >= 0.40,
            "expected >= 40% avalanche, observed {fraction}"
        );
    }

    #[test]
    fn constant_time_eq_is_reflexive_and_detects_difference() {
        let a = hash(b"one");
        let b = hash(b"one");
        let c = hash(b"two");
        assert!(digest_eq(&a, &b));
        assert!(!digest_eq(&a, &c));
    }
}
