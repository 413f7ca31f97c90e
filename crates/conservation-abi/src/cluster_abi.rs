//! `extern "C"` surface over [`conservation_core::cluster`]. A cluster
//! crosses the boundary as an opaque owned pointer; its CSR arrays are
//! exposed read-only through accessor calls rather than by copying the
//! layout across the edge.

use conservation_core::cluster::Cluster;

use crate::macros::abi_fn;

abi_fn! {
    /// `cluster_by_resonance(base, n) -> Clus*`. Returns null if `len` is
    /// zero or not a multiple of 256.
    fn conservation_cluster_build(ptr: *const u8, len: usize) -> *mut Cluster {
        if ptr.is_null() {
            return std::ptr::null_mut();
        }
        let base = std::slice::from_raw_parts(ptr, len);
        match Cluster::build(base) {
            Ok(cluster) => Box::into_raw(Box::new(cluster)),
            Err(_) => std::ptr::null_mut(),
        }
    }
}

abi_fn! {
    /// Number of pages whose class is `k`; `0` for a null handle or
    /// out-of-range `k`.
    fn conservation_cluster_count_for(cluster: *const Cluster, k: u8) -> u32 {
        match cluster.as_ref() {
            Some(cluster) if u32::from(k) < conservation_core::cluster::NUM_CLASSES as u32 => {
                cluster.count_for(k)
            }
            _ => 0,
        }
    }
}

abi_fn! {
    /// Writes up to `out_cap` page indices of class `k` into `out`,
    /// returning the number written. A null handle or out buffer writes
    /// nothing and returns `0`.
    fn conservation_cluster_pages_for(
        cluster: *const Cluster,
        k: u8,
        out: *mut u32,
        out_cap: usize
    ) -> usize {
        let Some(cluster) = cluster.as_ref() else {
            return 0;
        };
        if out.is_null() || u32::from(k) >= conservation_core::cluster::NUM_CLASSES as u32 {
            return 0;
        }
        let pages = cluster.pages_for(k);
        let n = pages.len().min(out_cap);
        std::ptr::copy_nonoverlapping(pages.as_ptr(), out, n);
        n
    }
}

abi_fn! {
    /// Total number of clustered pages; `0` for a null handle.
    fn conservation_cluster_total_pages(cluster: *const Cluster) -> usize {
        cluster.as_ref().map_or(0, Cluster::total_pages)
    }
}

abi_fn! {
    /// Destroys an owned cluster, freeing the CSR arena.
    fn conservation_cluster_destroy(cluster: *mut Cluster) {
        if !cluster.is_null() {
            drop(Box::from_raw(cluster));
        }
    }
}
