//! Integration test: domain lifecycle end-to-end.
//!
//! Exercises create -> attach -> verify -> commit -> witness across the
//! public API surface, plus the budget allocator under concurrent load,
//! the way a real embedder would drive a domain rather than unit-testing
//! one method at a time.

use conservation_core::cons;
use conservation_core::domain::{Domain, DomainState};
use conservation_core::err::Error;

fn conserved_buffer(len: usize, seed: u8) -> Vec<u8> {
    let mut data = vec![seed; len];
    let s = cons::sum(&data);
    if s != 0 {
        data[0] = data[0].wrapping_sub(s);
    }
    data
}

#[test]
fn full_lifecycle_produces_a_verifiable_committed_domain() {
    let data = conserved_buffer(4096, 17);
    assert!(cons::check(&data));

    let dom = Domain::create(4096, cons::sum(&data)).unwrap();
    assert_eq!(dom.state(), DomainState::Open);

    dom.attach(&data).unwrap();
    assert!(dom.verify());

    dom.commit().unwrap();
    assert_eq!(dom.state(), DomainState::Committed);

    let witness = dom.witness().expect("commit binds a witness");
    assert!(conservation_core::witness::verify(&witness, &data));

    let log = dom.drain_log();
    let ops: Vec<&str> = log.iter().map(|r| r.op).collect();
    // `commit` calls `verify` internally, so the explicit verify above and
    // commit's own precondition check both leave a "verify" record.
    assert_eq!(ops, vec!["create", "attach", "verify", "verify", "commit"]);
    assert!(log.iter().all(|r| r.outcome == "ok"));
}

#[test]
fn attaching_an_unconserved_region_fails_verify_and_commit() {
    let mut data = conserved_buffer(128, 3);
    data[0] = data[0].wrapping_add(1); // break conservation before attach
    assert!(!cons::check(&data));

    let dom = Domain::create(128, 0).unwrap();
    dom.attach(&data).unwrap(); // attach itself does not check conservation
    assert!(!dom.verify());
    assert_eq!(dom.commit().unwrap_err(), Error::Conservation);
    assert_eq!(dom.state(), DomainState::Open); // commit never partially applies
}

#[test]
fn many_domains_share_no_state_across_ids() {
    let domains: Vec<Domain<'static>> = (0..32)
        .map(|class| Domain::create(64, (class % 96) as u8).unwrap())
        .collect();
    let ids: std::collections::HashSet<u64> = domains.iter().map(Domain::id).collect();
    assert_eq!(ids.len(), domains.len());

    let proofs: std::collections::HashSet<u64> =
        domains.iter().map(Domain::isolation_proof).collect();
    assert_eq!(proofs.len(), domains.len());
}

#[test]
fn budget_allocator_never_exceeds_modulus_under_random_walk() {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let dom = Domain::create(8, 48).unwrap();
    let mut shadow: i64 = 48;

    for _ in 0..2000 {
        let amt: u8 = rng.gen_range(0..96);
        if rng.gen_bool(0.5) {
            if dom.alloc(amt).is_ok() {
                shadow -= i64::from(amt);
            }
        } else {
            dom.release(amt).unwrap();
            shadow += i64::from(amt);
        }
        let expected = shadow.rem_euclid(96) as u8;
        assert_eq!(dom.budget(), expected);
        assert!(dom.budget() < 96);
    }
}
