//! # conservation-core
//!
//! A safe-Rust runtime for mod-96 conservation domains: lifecycle-bound
//! regions of externally supplied memory whose state must sum to zero
//! mod 96, paired with cryptographic witnesses for tamper-evidence, a
//! budget allocator over the same modulus, resonance-class clustering,
//! a harmonic scheduler, and a batch-operation layer for high-throughput
//! callers.
//!
//! No `unsafe` code is permitted at the crate level: every primitive here
//! is built from safe references, atomics, and `OnceLock`/`Mutex`
//! interior mutability. The `conservation-abi` crate is where raw
//! pointers from `extern "C"` callers get translated into the safe types
//! this crate exposes.

#![deny(unsafe_code)]

pub mod batch;
pub mod cluster;
pub mod cons;
pub mod domain;
pub mod entropy;
pub mod err;
pub mod hash;
pub mod scheduler;
pub mod witness;
