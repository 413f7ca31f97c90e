//! Integration tests for `Clus`: CSR well-formedness across many randomly
//! generated page layouts, plus the documented literal scenario.

use rand::Rng;

use conservation_core::cluster::{Cluster, PAGE_BYTES};

fn page_with_class(class: u8) -> Vec<u8> {
    let mut page = vec![0u8; PAGE_BYTES];
    page[0] = class;
    page
}

#[test]
fn csr_is_well_formed_for_many_random_page_counts() {
    let mut rng = rand::thread_rng();
    for _ in 0..100 {
        let page_count = rng.gen_range(1..200);
        let mut base = Vec::with_capacity(page_count * PAGE_BYTES);
        for _ in 0..page_count {
            base.extend(page_with_class(rng.gen_range(0..96)));
        }
        let cluster = Cluster::build(&base).unwrap();
        assert!(cluster.validate());
        assert_eq!(cluster.total_pages(), page_count);
    }
}

#[test]
fn every_page_appears_in_exactly_one_class_bucket() {
    let mut rng = rand::thread_rng();
    let page_count = 500;
    let mut base = Vec::with_capacity(page_count * PAGE_BYTES);
    for _ in 0..page_count {
        base.extend(page_with_class(rng.gen_range(0..96)));
    }
    let cluster = Cluster::build(&base).unwrap();

    let mut total_counted = 0u32;
    for k in 0..96u8 {
        total_counted += cluster.count_for(k);
        for &page_index in cluster.pages_for(k) {
            let page = &base[page_index as usize * PAGE_BYTES..(page_index as usize + 1) * PAGE_BYTES];
            assert_eq!(u32::from(page[0]), u32::from(k));
        }
    }
    assert_eq!(total_counted as usize, page_count);
}

#[test]
fn three_page_scenario_clusters_correctly() {
    let mut base = Vec::new();
    base.extend(page_with_class(5));
    base.extend(page_with_class(5));
    base.extend(page_with_class(17));
    let cluster = Cluster::build(&base).unwrap();
    assert_eq!(cluster.count_for(5), 2);
    assert_eq!(cluster.count_for(17), 1);
    assert_eq!(cluster.pages_for(5), &[0, 1]);
    assert_eq!(cluster.pages_for(17), &[2]);
}

#[test]
fn rejects_lengths_that_are_not_a_multiple_of_page_size() {
    assert!(Cluster::build(&[0u8; PAGE_BYTES + 1]).is_err());
    assert!(Cluster::build(&[]).is_err());
}
