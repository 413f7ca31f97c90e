//! Harmonic scheduling: the next instant at which a resonance class is
//! admitted by the mod-96 harmonic.

use crate::cons::MODULUS;

/// `schedule_next_window(now, r) = now + ((96 - ((now + r) mod 96)) mod 96)`.
/// Pure, total, and deterministic; always returns a value in
/// `[now, now + 96]`.
#[must_use]
pub fn schedule_next_window(now: u64, r: u8) -> u64 {
    let modulus = u64::from(MODULUS);
    let r = u64::from(r);
    now + ((modulus - ((now + r) % modulus)) % modulus)
}

/// `next_harmonic_window_from(now, r)`: a refinement point callers may hook
/// to delay further for "harmonic quality" heuristics. No such heuristic
/// is defined here, so this is equal to [`schedule_next_window`] and every
/// caller can rely on that minimal, correct behavior.
#[must_use]
pub fn next_harmonic_window_from(now: u64, r: u8) -> u64 {
    schedule_next_window(now, r)
}

/// `true` iff `(r1 + r2) mod 96 == 0`.
#[must_use]
pub fn harmonizes(r1: u8, r2: u8) -> bool {
    (u32::from(r1) + u32::from(r2)) % MODULUS == 0
}

/// `(96 - r) mod 96`: the class that sums with `r` to zero mod 96.
#[must_use]
pub fn harmonic_conjugate(r: u8) -> u8 {
    ((MODULUS - u32::from(r)) % MODULUS) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduler_literal_scenario() {
        let t = schedule_next_window(10, 7);
        assert_eq!(t, 89);
        assert_eq!((t + 7) % u64::from(MODULUS), 0);
    }

    #[test]
    fn scheduler_law_holds_broadly() {
        for now in [0u64, 1, 95, 96, 1_000_003] {
            for r in 0u8..96 {
                let t = schedule_next_window(now, r);
                assert_eq!((t + u64::from(r)) % u64::from(MODULUS), 0);
                assert!(t >= now && t - now <= 95);
            }
        }
    }

    #[test]
    fn minimal_harmonic_refinement_matches_simple_formula() {
        for now in [0u64, 42, 1000] {
            for r in 0u8..96 {
                assert_eq!(next_harmonic_window_from(now, r), schedule_next_window(now, r));
            }
        }
    }

    #[test]
    fn harmonizes_and_conjugate_are_consistent() {
        for r in 0u8..96 {
            let conjugate = harmonic_conjugate(r);
            assert!(harmonizes(r, conjugate));
        }
        assert!(harmonizes(0, 0));
        assert_eq!(harmonic_conjugate(0), 0);
    }
}
