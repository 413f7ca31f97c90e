//! Property-style integration tests for `Cons` over many random inputs,
//! using hand-rolled loops rather than `proptest`/`quickcheck`.

use rand::Rng;

use conservation_core::cons::{self, MODULUS};

#[test]
fn sum_scalar_and_vectorized_agree_on_random_buffers() {
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let len = rng.gen_range(0..4096);
        let data: Vec<u8> = (0..len).map(|_| rng.gen_range(0..=255)).collect();
        let scalar = cons::sum_scalar(&data) % u64::from(MODULUS);
        let vectorized = cons::sum_vectorized(&data) % u64::from(MODULUS);
        assert_eq!(scalar, vectorized);
        assert_eq!(u64::from(cons::sum(&data)), scalar);
    }
}

#[test]
fn delta_algebra_closes_mod_96() {
    let mut rng = rand::thread_rng();
    for _ in 0..1000 {
        let len = rng.gen_range(1..512);
        let before: Vec<u8> = (0..len).map(|_| rng.gen_range(0..=255)).collect();
        let after: Vec<u8> = (0..len).map(|_| rng.gen_range(0..=255)).collect();
        let d = cons::delta(&before, &after);
        let expected =
            (u32::from(cons::sum(&after)) + MODULUS - u32::from(cons::sum(&before))) % MODULUS;
        assert_eq!(u32::from(d), expected);
    }
}

#[test]
fn check_agrees_with_sum_being_zero() {
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let len = rng.gen_range(1..2048);
        let data: Vec<u8> = (0..len).map(|_| rng.gen_range(0..=255)).collect();
        assert_eq!(cons::check(&data), cons::sum(&data) == 0);
    }
}

#[test]
fn window_streaming_check_matches_every_window_individually() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let len = rng.gen_range(8..1024);
        let data: Vec<u8> = (0..len).map(|_| rng.gen_range(0..=255)).collect();
        let window = rng.gen_range(1..=len);
        let all_windows_conserved = data
            .windows(window)
            .all(cons::check);
        assert_eq!(cons::window_streaming_check(&data, window), all_windows_conserved);
    }
}

#[test]
fn window_wider_than_data_falls_back_to_whole_check() {
    let mut rng = rand::thread_rng();
    for _ in 0..100 {
        let len = rng.gen_range(1..64);
        let data: Vec<u8> = (0..len).map(|_| rng.gen_range(0..=255)).collect();
        let window = len + 1 + rng.gen_range(0..16);
        assert_eq!(cons::window_streaming_check(&data, window), cons::check(&data));
    }
}
