//! Version token and runtime discovery flags.

use std::os::raw::c_int;

const VERSION_MAJOR: u32 = 1;
const VERSION_MINOR: u32 = 0;
const VERSION_PATCH: u32 = 0;

use crate::macros::abi_fn;

abi_fn! {
    /// `(major << 16) | (minor << 8) | patch`.
    fn conservation_version() -> u32 {
        (VERSION_MAJOR << 16) | (VERSION_MINOR << 8) | VERSION_PATCH
    }
}

abi_fn! {
    /// `true` when this build was compiled with multi-thread support. The
    /// safe core is always thread-safe (atomics and `parking_lot` throughout),
    /// so this is unconditionally `1`.
    fn conservation_is_thread_safe() -> c_int {
        1
    }
}

abi_fn! {
    /// `true` when this build was compiled with optimizations. `debug_assertions`
    /// is absent from release profiles, so its absence is the signal.
    fn conservation_is_optimized() -> c_int {
        c_int::from(!cfg!(debug_assertions))
    }
}

abi_fn! {
    /// Reserved bitmask for downstream consumers; unused by the core itself.
    /// Currently always `0`.
    fn conservation_supported_projections() -> u32 {
        0
    }
}
