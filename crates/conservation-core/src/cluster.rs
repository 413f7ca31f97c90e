//! Resonance clustering: group fixed 256-byte pages by their conservation
//! class into a CSR (compressed-sparse-row) layout.

use crate::cons::{self, MODULUS};
use crate::err::{Error, Result, track};

/// Fixed page size the clustering layer scans over.
pub const PAGE_BYTES: usize = 256;

/// Number of resonance classes, `[0, 95]`.
pub const NUM_CLASSES: usize = MODULUS as usize;

/// A resonance cluster: the CSR grouping of pages by class, plus the page
/// count, all owned as a single arena: two `Vec`s owned by this struct,
/// freed together when it drops.
#[derive(Debug, Clone)]
pub struct Cluster {
    offsets: [u32; NUM_CLASSES + 1],
    indices: Vec<u32>,
    total_pages: usize,
}

impl Cluster {
    /// `cluster_by_resonance(base, n)`. `base` must be a non-empty,
    /// exact multiple of [`PAGE_BYTES`].
    pub fn build(base: &[u8]) -> Result<Cluster> {
        track(|| {
            if base.is_empty() || base.len() % PAGE_BYTES != 0 {
                return Err(Error::Invalid);
            }
            let total_pages = base.len() / PAGE_BYTES;
            let classes: Vec<u8> = (0..total_pages)
                .map(|p| {
                    let page = &base[p * PAGE_BYTES..(p + 1) * PAGE_BYTES];
                    cons::sum(page)
                })
                .collect();

            let mut offsets = [0u32; NUM_CLASSES + 1];
            for &class in &classes {
                offsets[class as usize + 1] += 1;
            }
            for k in 0..NUM_CLASSES {
                offsets[k + 1] += offsets[k];
            }

            let mut cursor = offsets;
            let mut indices = vec![0u32; total_pages];
            for (page_index, &class) in classes.iter().enumerate() {
                let slot = &mut cursor[class as usize];
                indices[*slot as usize] = page_index as u32;
                *slot += 1;
            }

            Ok(Cluster {
                offsets,
                indices,
                total_pages,
            })
        })
    }

    /// Number of pages whose class is `k`.
    #[must_use]
    pub fn count_for(&self, k: u8) -> u32 {
        let k = k as usize;
        self.offsets[k + 1] - self.offsets[k]
    }

    /// Page indices whose class is `k`, in ascending order.
    #[must_use]
    pub fn pages_for(&self, k: u8) -> &[u32] {
        let k = k as usize;
        &self.indices[self.offsets[k] as usize..self.offsets[k + 1] as usize]
    }

    /// `(total_pages, non_empty_classes, largest_class_size)`.
    #[must_use]
    pub fn stats(&self) -> (usize, usize, u32) {
        let mut non_empty = 0usize;
        let mut largest = 0u32;
        for k in 0..NUM_CLASSES {
            let count = self.offsets[k + 1] - self.offsets[k];
            if count > 0 {
                non_empty += 1;
            }
            largest = largest.max(count);
        }
        (self.total_pages, non_empty, largest)
    }

    /// The raw offsets array, `offsets[96]` equal to the total page count.
    #[must_use]
    pub fn offsets(&self) -> &[u32; NUM_CLASSES + 1] {
        &self.offsets
    }

    /// The raw flattened indices array.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Total number of pages clustered.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Checks CSR well-formedness: `offsets[0] == 0`, `offsets[96] == n`,
    /// offsets are non-decreasing, every index is in `[0, n)`, and the
    /// grouping is a permutation of `[0, n)`.
    #[must_use]
    pub fn validate(&self) -> bool {
        if self.offsets[0] != 0 {
            return false;
        }
        if self.offsets[NUM_CLASSES] as usize != self.total_pages {
            return false;
        }
        if !self.offsets.windows(2).all(|w| w[0] <= w[1]) {
            return false;
        }
        if self.indices.iter().any(|&i| i as usize >= self.total_pages) {
            return false;
        }
        let mut seen = vec![false; self.total_pages];
        for &i in &self.indices {
            let i = i as usize;
            if seen[i] {
                return false;
            }
            seen[i] = true;
        }
        seen.iter().all(|&present| present)
    }

    /// Frees the CSR arena as a single unit. Equivalent to letting the
    /// value drop; provided for API symmetry with the other primitives'
    /// explicit `destroy` operations.
    pub fn destroy(self) {
        drop(self);
    }
}

/// Per-byte mod-96 histogram of a single page: how many of the page's
/// bytes fall in each class, not to be confused with the page's own class
/// (the sum of all of them). Optional emission, not part of the CSR
/// arena; computed on demand.
#[must_use]
pub fn page_histogram(page: &[u8]) -> [u16; NUM_CLASSES] {
    let mut histogram = [0u16; NUM_CLASSES];
    for &byte in page {
        histogram[(u32::from(byte) % MODULUS) as usize] += 1;
    }
    histogram
}
