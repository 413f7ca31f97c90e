//! Integration tests for `Wit`: generate/verify/merge/chain across many
//! random inputs, plus the literal end-to-end scenario.

use rand::Rng;

use conservation_core::err::Error;
use conservation_core::witness::{self, chain, depth};

#[test]
fn generate_then_verify_round_trips_for_random_payloads() {
    let mut rng = rand::thread_rng();
    for _ in 0..300 {
        let len = rng.gen_range(1..1024);
        let data: Vec<u8> = (0..len).map(|_| rng.gen_range(0..=255)).collect();
        let w = witness::generate(&data).unwrap();
        assert!(witness::verify(&w, &data));
    }
}

#[test]
fn any_single_byte_mutation_fails_verification() {
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let len = rng.gen_range(2..256);
        let data: Vec<u8> = (0..len).map(|_| rng.gen_range(0..=255)).collect();
        let w = witness::generate(&data).unwrap();

        let victim = rng.gen_range(0..len);
        let mut mutated = data.clone();
        mutated[victim] = mutated[victim].wrapping_add(1 + rng.gen_range(0..255));
        if mutated[victim] == data[victim] {
            continue; // wrapped back to the original byte; not a real mutation
        }
        assert!(!witness::verify(&w, &mutated));
    }
}

#[test]
fn merge_of_many_witnesses_sums_classes_mod_96() {
    let mut rng = rand::thread_rng();
    let payloads: Vec<Vec<u8>> = (0..16)
        .map(|_| {
            let len = rng.gen_range(1..128);
            (0..len).map(|_| rng.gen_range(0..=255)).collect()
        })
        .collect();
    let witnesses: Vec<_> = payloads
        .iter()
        .map(|p| witness::generate(p).unwrap())
        .collect();
    let refs: Vec<&_> = witnesses.iter().collect();
    let merged = witness::merge(&refs).unwrap();

    let expected: u32 = witnesses
        .iter()
        .fold(0u32, |acc, w| (acc + u32::from(w.resonance_value())) % 96);
    assert_eq!(u32::from(merged.resonance_value()), expected);
    assert!(merged.is_merged());
    assert_eq!(
        merged.timestamp_value(),
        witnesses.iter().map(witness::Witness::timestamp_value).max().unwrap()
    );
}

#[test]
fn chain_depth_grows_by_one_per_link_over_many_links() {
    let w = witness::generate(b"chained").unwrap();
    let mut node = None;
    for expected_depth in 0..64u32 {
        assert_eq!(depth(node.as_ref()), expected_depth);
        node = Some(chain(&w, node));
    }
}

#[test]
fn generate_verify_and_tamper_end_to_end() {
    let d = [0x01u8, 0x02, 0x03];
    let w = witness::generate(&d).unwrap();
    assert!(witness::verify(&w, &d));
    let mutated = [0x04u8, 0x02, 0x03];
    assert!(!witness::verify(&w, &mutated));
    assert_eq!(witness::generate(&[]).unwrap_err(), Error::Invalid);
}
