//! Witness: the 48-byte immutable record binding a digest, a monotonic
//! timestamp, and a resonance class to the data that produced them.

use crate::cons;
use crate::entropy;
use crate::err::{Error, Result, track};
use crate::hash::{self, Digest, DIGEST_LEN};

/// Witness record length in bytes: `32 + 8 + 1 + 1 + 6`.
pub const WITNESS_LEN: usize = 48;

/// Flag bit set when a witness was produced by [`merge`] rather than
/// [`generate`].
pub const FLAG_MERGED: u8 = 0b0000_0001;

/// An immutable 48-byte record: `[digest(32), timestamp(8), class(1),
/// flags(1), reserved(6)]`, little-endian fields, laid out so the ABI
/// boundary can transmute a pointer to this type directly.
#[repr(C)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    digest: Digest,
    timestamp: u64,
    class: u8,
    flags: u8,
    reserved: [u8; 6],
}

impl Drop for Witness {
    fn drop(&mut self) {
        // destroy() zeroes the record before release; this Drop impl makes
        // that the unconditional behavior of every witness, not just ones
        // explicitly passed to `destroy`.
        self.digest = [0u8; DIGEST_LEN];
        self.timestamp = 0;
        self.class = 0;
        self.flags = 0;
        self.reserved = [0u8; 6];
    }
}

impl Witness {
    /// The bound 32-byte digest.
    #[must_use]
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// `timestamp(W)`; see the free function [`timestamp`] for the
    /// null-safe accessor form used across the ABI boundary.
    #[must_use]
    pub fn timestamp_value(&self) -> u64 {
        self.timestamp
    }

    /// `resonance(W)`; see the free function [`resonance`] for the
    /// null-safe accessor form.
    #[must_use]
    pub fn resonance_value(&self) -> u8 {
        self.class
    }

    /// `true` iff this witness was produced by [`merge`].
    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.flags & FLAG_MERGED != 0
    }

    /// Explicitly destroys this witness. Consuming `self` runs `Drop`,
    /// which zeroes the record before the backing memory is released.
    pub fn destroy(self) {
        drop(self);
    }
}

/// `timestamp(W) -> u64`, returning `0` for a null witness.
#[must_use]
pub fn timestamp(w: Option<&Witness>) -> u64 {
    w.map_or(0, Witness::timestamp_value)
}

/// `resonance(W) -> u8`, returning `0` for a null witness.
#[must_use]
pub fn resonance(w: Option<&Witness>) -> u8 {
    w.map_or(0, Witness::resonance_value)
}

/// `generate(d) -> W`. Fails with [`Error::Invalid`] on zero-length data.
pub fn generate(d: &[u8]) -> Result<Witness> {
    track(|| {
        if d.is_empty() {
            return Err(Error::Invalid);
        }
        Ok(Witness {
            digest: hash::hash(d),
            timestamp: entropy::monotonic_next(),
            class: cons::sum(d),
            flags: 0,
            reserved: [0u8; 6],
        })
    })
}

/// `verify(W, d) -> bool`. Returns `true` iff `H(d)` matches the bound
/// digest under constant-time comparison and `S(d)` matches the bound
/// class. Sets the task-local last-error register to [`ErrorKind::Witness`]
/// or [`ErrorKind::Conservation`](crate::err::ErrorKind::Conservation) as
/// appropriate on failure, [`ErrorKind::Ok`](crate::err::ErrorKind::Ok) on
/// success.
#[must_use]
pub fn verify(w: &Witness, d: &[u8]) -> bool {
    let live_digest = hash::hash(d);
    if !hash::digest_eq(&live_digest, &w.digest) {
        crate::err::set_last_error(crate::err::ErrorKind::Witness);
        return false;
    }
    let live_class = cons::sum(d);
    if live_class != w.class {
        crate::err::set_last_error(crate::err::ErrorKind::Conservation);
        return false;
    }
    crate::err::set_last_error(crate::err::ErrorKind::Ok);
    true
}

/// `merge(W[], n) -> W'`. Requires a non-empty slice.
///
/// The merged digest is `H(concat of the constituent digests in input
/// order)`; the merged timestamp is the maximum over constituents; the
/// merged class is the sum of constituent classes mod 96; the merge flag
/// is set. Skipping null constituents is a concern of the `extern "C"`
/// boundary (a C caller can pass a null witness pointer); the safe API
/// here takes `&[&Witness]`, which cannot contain nulls.
pub fn merge(ws: &[&Witness]) -> Result<Witness> {
    track(|| {
        if ws.is_empty() {
            return Err(Error::Invalid);
        }
        let mut concat = Vec::with_capacity(ws.len() * DIGEST_LEN);
        for w in ws {
            concat.extend_from_slice(&w.digest);
        }
        let digest = hash::hash(&concat);
        let timestamp = ws.iter().map(|w| w.timestamp).max().unwrap_or(0);
        let class = ws
            .iter()
            .fold(0u32, |acc, w| (acc + u32::from(w.class)) % cons::MODULUS)
            as u8;
        Ok(Witness {
            digest,
            timestamp,
            class,
            flags: FLAG_MERGED,
            reserved: [0u8; 6],
        })
    })
}

/// Singly-linked witness chain node. `64` bytes: a 48-byte embedded
/// witness, an 8-byte previous-node slot (`Option<Box<_>>` gets the
/// null-pointer layout optimization), a 4-byte depth, and 4 bytes of
/// zero padding.
#[repr(C)]
#[derive(Debug)]
pub struct ChainNode {
    witness: Witness,
    previous: Option<Box<ChainNode>>,
    depth: u32,
    _padding: u32,
}

impl ChainNode {
    /// The witness embedded in this node.
    #[must_use]
    pub fn witness(&self) -> &Witness {
        &self.witness
    }

    /// This node's depth: `0` for a root node, `previous.depth + 1`
    /// otherwise.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The previous node in the chain, if any.
    #[must_use]
    pub fn previous(&self) -> Option<&ChainNode> {
        self.previous.as_deref()
    }
}

/// `chain(current, previous) -> node`. Builds a fresh node owning a clone
/// of `current`, linking to (and taking ownership of) `previous`.
#[must_use]
pub fn chain(current: &Witness, previous: Option<ChainNode>) -> ChainNode {
    let depth = previous.as_ref().map_or(0, |p| p.depth + 1);
    ChainNode {
        witness: current.clone(),
        previous: previous.map(Box::new),
        depth,
        _padding: 0,
    }
}

/// `depth(chain(w, prev)) = depth(prev) + 1`; `depth(null) = 0`.
#[must_use]
pub fn depth(node: Option<&ChainNode>) -> u32 {
    node.map_or(0, ChainNode::depth)
}
