//! `extern "C"` surface over [`conservation_core::domain`]. A domain
//! crosses the boundary as an opaque owned pointer; `attach` borrows a
//! caller-supplied region whose lifetime the C caller is responsible for
//! outliving the domain's use, the same contract placed on every
//! attached-memory API at this boundary.

use std::os::raw::c_int;

use conservation_core::domain::{Domain, DomainState};
use conservation_core::witness::Witness;

use crate::macros::abi_fn;

abi_fn! {
    /// `create(bytes, class) -> Dom*`. Returns null on invalid arguments.
    fn conservation_domain_create(bytes: usize, class: u8) -> *mut Domain<'static> {
        match Domain::create(bytes, class) {
            Ok(dom) => Box::into_raw(Box::new(dom)),
            Err(_) => std::ptr::null_mut(),
        }
    }
}

abi_fn! {
    /// `attach(dom, base, len)`. The region pointed to by `ptr` must remain
    /// valid and unaliased by the caller for at least as long as the domain
    /// lives; the core borrows it as `&'static [u8]`, extending its real
    /// lifetime is the caller's obligation at this boundary.
    fn conservation_domain_attach(dom: *const Domain<'static>, ptr: *const u8, len: usize) -> c_int {
        let Some(dom) = dom.as_ref() else {
            conservation_core::err::set_last_error(conservation_core::err::ErrorKind::Destroyed);
            return -1;
        };
        if ptr.is_null() || len == 0 {
            conservation_core::err::set_last_error(conservation_core::err::ErrorKind::Invalid);
            return -1;
        }
        let region: &'static [u8] = std::slice::from_raw_parts(ptr, len);
        match dom.attach(region) {
            Ok(()) => 0,
            Err(_) => -1,
        }
    }
}

abi_fn! {
    /// `verify(dom) -> bool`. A null handle verifies as `false` with kind
    /// `Destroyed`.
    fn conservation_domain_verify(dom: *const Domain<'static>) -> c_int {
        match dom.as_ref() {
            Some(dom) => c_int::from(dom.verify()),
            None => {
                conservation_core::err::set_last_error(conservation_core::err::ErrorKind::Destroyed);
                0
            }
        }
    }
}

abi_fn! {
    /// `commit(dom) -> status`.
    fn conservation_domain_commit(dom: *const Domain<'static>) -> c_int {
        let Some(dom) = dom.as_ref() else {
            conservation_core::err::set_last_error(conservation_core::err::ErrorKind::Destroyed);
            return -1;
        };
        match dom.commit() {
            Ok(()) => 0,
            Err(_) => -1,
        }
    }
}

abi_fn! {
    /// Returns a clone of the domain's bound witness, or null if none is
    /// bound yet.
    fn conservation_domain_witness(dom: *const Domain<'static>) -> *mut Witness {
        match dom.as_ref().and_then(Domain::witness) {
            Some(w) => Box::into_raw(Box::new(w)),
            None => std::ptr::null_mut(),
        }
    }
}

abi_fn! {
    /// `alloc(dom, amt) -> status`.
    fn conservation_domain_alloc(dom: *const Domain<'static>, amt: u8) -> c_int {
        let Some(dom) = dom.as_ref() else {
            conservation_core::err::set_last_error(conservation_core::err::ErrorKind::Destroyed);
            return -1;
        };
        match dom.alloc(amt) {
            Ok(()) => 0,
            Err(_) => -1,
        }
    }
}

abi_fn! {
    /// `release(dom, amt) -> status`.
    fn conservation_domain_release(dom: *const Domain<'static>, amt: u8) -> c_int {
        let Some(dom) = dom.as_ref() else {
            conservation_core::err::set_last_error(conservation_core::err::ErrorKind::Destroyed);
            return -1;
        };
        match dom.release(amt) {
            Ok(()) => 0,
            Err(_) => -1,
        }
    }
}

abi_fn! {
    /// Current budget low-7-bit value; `0` for a null handle.
    fn conservation_domain_budget(dom: *const Domain<'static>) -> u8 {
        dom.as_ref().map_or(0, Domain::budget)
    }
}

abi_fn! {
    /// `1` for `Open`, `2` for `Committed`, `0` for a null handle.
    fn conservation_domain_state(dom: *const Domain<'static>) -> u8 {
        match dom.as_ref().map(Domain::state) {
            Some(DomainState::Open) => 1,
            Some(DomainState::Committed) => 2,
            None => 0,
        }
    }
}

abi_fn! {
    /// `destroy(dom)`. Clears the magic tag and frees the handle. A null
    /// pointer is a no-op.
    fn conservation_domain_destroy(dom: *mut Domain<'static>) {
        if !dom.is_null() {
            (*dom).destroy();
            drop(Box::from_raw(dom));
        }
    }
}
