// All extern "C" ABI exports accept raw pointers from C callers; the
// per-module doc comments describe the ownership and lifetime contract
// in place of per-function safety sections.
#![allow(clippy::missing_safety_doc)]
//! # conservation-abi
//!
//! `extern "C"` boundary layer over `conservation-core`.
//!
//! This crate produces a `cdylib` (plus an `rlib` for Rust callers that
//! want the raw symbols without going through a C header) exposing the
//! conservation runtime's domains, witnesses, clustering, scheduling, and
//! batch primitives as `#[no_mangle]` symbols.
//!
//! # Architecture
//!
//! ```text
//! C caller -> ABI entry (this crate) -> conservation-core -> return
//! ```
//!
//! Every entry point validates its raw arguments (null checks, length
//! checks) before delegating to the safe core, and writes the per-call
//! status/out field the same way on every path, matching the error
//! discipline of the safe API it wraps.

#[macro_use]
mod macros;

pub mod batch_abi;
pub mod cluster_abi;
pub mod cons_abi;
pub mod domain_abi;
pub mod err_abi;
pub mod scheduler_abi;
pub mod version_abi;
pub mod witness_abi;
