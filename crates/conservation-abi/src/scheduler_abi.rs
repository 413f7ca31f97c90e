//! `extern "C"` surface over [`conservation_core::scheduler`]. Pure
//! modular-arithmetic functions; never fail and never touch the
//! last-error register.

use std::os::raw::c_int;

use conservation_core::scheduler;

use crate::macros::abi_fn;

abi_fn! {
    fn conservation_schedule_next_window(now: u64, r: u8) -> u64 {
        scheduler::schedule_next_window(now, r)
    }
}

abi_fn! {
    fn conservation_harmonizes(r1: u8, r2: u8) -> c_int {
        c_int::from(scheduler::harmonizes(r1, r2))
    }
}

abi_fn! {
    fn conservation_harmonic_conjugate(r: u8) -> u8 {
        scheduler::harmonic_conjugate(r)
    }
}
