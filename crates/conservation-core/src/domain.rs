//! Domain: the lifecycle-bound handle owning runtime metadata over an
//! externally borrowed byte region.
//!
//! Every domain is fronted by a heap record, an opaque pointer, and a
//! magic word checked on every public call. The magic-tag check is what
//! turns a use of a destroyed handle into a reported `Destroyed` kind
//! instead of undefined behavior once this type is exposed across the
//! `conservation-abi` `extern "C"` boundary. Unlike a raw-pointer design,
//! the attached region here is a borrowed slice with its own lifetime,
//! so the crate root's `#![deny(unsafe_code)]` holds with zero
//! exceptions.

use std::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::OnceLock;

use parking_lot::Mutex;

use crate::cons;
use crate::err::{Error, ErrorKind, Result, track};
use crate::witness::{self, Witness};

/// Golden-ratio multiplier used to derive a domain's isolation proof from
/// its id, chosen purely for hash distribution.
const ISOLATION_MULTIPLIER: u64 = 0x9E3779B9;

const MAGIC_VALID: u32 = 0x444F_4D41; // "DOMA"
const MAGIC_DESTROYED: u32 = 0;

const BUDGET_VALUE_MASK: u32 = 0x7F;

const DOMAIN_LOG_CAP: usize = 256;

/// Visible domain lifecycle state. `Destroyed` is deliberately not a
/// variant here: destruction is deallocation (in this crate, a cleared
/// magic tag), not a state a caller observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainState {
    Open,
    Committed,
}

impl DomainState {
    const fn to_tag(self) -> u8 {
        match self {
            DomainState::Open => 0,
            DomainState::Committed => 1,
        }
    }

    const fn from_tag(tag: u8) -> Self {
        match tag {
            1 => DomainState::Committed,
            _ => DomainState::Open,
        }
    }
}

/// One structured lifecycle record, in the allocator-log idiom: a
/// monotonic id, the operation and its outcome, and a state snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainLogRecord {
    pub decision_id: u64,
    pub domain_id: u64,
    pub op: &'static str,
    pub outcome: &'static str,
    pub budget_snapshot: u8,
    pub state_snapshot: DomainState,
}

static NEXT_DOMAIN_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_DECISION_ID: AtomicU64 = AtomicU64::new(1);

/// A domain: an exclusive owner of runtime metadata over a borrowed byte
/// region of lifetime `'a`.
pub struct Domain<'a> {
    magic: AtomicU32,
    id: u64,
    isolation_proof: u64,
    initial_bytes: usize,
    initial_class: u8,
    state: AtomicU8,
    budget: AtomicU32,
    base: OnceLock<&'a [u8]>,
    cached_sum: OnceLock<u8>,
    witness: Mutex<Option<Witness>>,
    log: Mutex<Vec<DomainLogRecord>>,
}

impl<'a> Domain<'a> {
    fn check_magic(&self) -> Result<()> {
        if self.magic.load(Ordering::Acquire) != MAGIC_VALID {
            return Err(Error::Destroyed);
        }
        Ok(())
    }

    fn record(&self, op: &'static str, outcome: &'static str) {
        let decision_id = NEXT_DECISION_ID.fetch_add(1, Ordering::Relaxed);
        let record = DomainLogRecord {
            decision_id,
            domain_id: self.id,
            op,
            outcome,
            budget_snapshot: (self.budget.load(Ordering::Relaxed) & BUDGET_VALUE_MASK) as u8,
            state_snapshot: DomainState::from_tag(self.state.load(Ordering::Relaxed)),
        };
        let mut log = self.log.lock();
        if log.len() >= DOMAIN_LOG_CAP {
            log.remove(0);
        }
        log.push(record);
    }

    /// Drains and returns all buffered lifecycle log records.
    pub fn drain_log(&self) -> Vec<DomainLogRecord> {
        std::mem::take(&mut self.log.lock())
    }

    /// `create(bytes, class)`. `bytes > 0` and `class` in `[0, 95]`
    /// required.
    pub fn create(bytes: usize, class: u8) -> Result<Domain<'a>> {
        track(|| {
            if bytes == 0 || u32::from(class) >= cons::MODULUS {
                return Err(Error::Invalid);
            }
            let id = NEXT_DOMAIN_ID.fetch_add(1, Ordering::Relaxed);
            let dom = Domain {
                magic: AtomicU32::new(MAGIC_VALID),
                id,
                isolation_proof: id.wrapping_mul(ISOLATION_MULTIPLIER),
                initial_bytes: bytes,
                initial_class: class,
                state: AtomicU8::new(DomainState::Open.to_tag()),
                budget: AtomicU32::new(u32::from(class)),
                base: OnceLock::new(),
                cached_sum: OnceLock::new(),
                witness: Mutex::new(None),
                log: Mutex::new(Vec::new()),
            };
            dom.record("create", "ok");
            Ok(dom)
        })
    }

    /// Unique process-wide domain id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Isolation proof derived deterministically from the domain id.
    #[must_use]
    pub fn isolation_proof(&self) -> u64 {
        self.isolation_proof
    }

    /// The byte count requested at creation.
    #[must_use]
    pub fn initial_bytes(&self) -> usize {
        self.initial_bytes
    }

    /// The budget class requested at creation.
    #[must_use]
    pub fn initial_class(&self) -> u8 {
        self.initial_class
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> DomainState {
        DomainState::from_tag(self.state.load(Ordering::Acquire))
    }

    /// `attach(dom, base, len)`. Requires `Open` state and no prior
    /// attachment.
    pub fn attach(&self, base: &'a [u8]) -> Result<()> {
        let result = track(|| {
            self.check_magic()?;
            if base.is_empty() {
                return Err(Error::Invalid);
            }
            if self.state() != DomainState::Open {
                return Err(Error::State);
            }
            if self.base.get().is_some() {
                return Err(Error::State);
            }
            let sum = cons::sum(base);
            // OnceLock::set can race two attachers; only one may win, the
            // other observes "already attached" and reports E_STATE.
            self.base.set(base).map_err(|_| Error::State)?;
            let _ = self.cached_sum.set(sum);
            Ok(())
        });
        self.record("attach", if result.is_ok() { "ok" } else { "rejected" });
        result
    }

    /// `verify(dom)`. Read-only; safe to call concurrently.
    #[must_use]
    pub fn verify(&self) -> bool {
        if self.check_magic().is_err() {
            crate::err::set_last_error(ErrorKind::Destroyed);
            self.record("verify", "destroyed");
            return false;
        }
        let Some(base) = self.base.get().copied() else {
            crate::err::set_last_error(ErrorKind::State);
            self.record("verify", "not_attached");
            return false;
        };
        if !cons::check(base) {
            crate::err::set_last_error(ErrorKind::Conservation);
            self.record("verify", "unconserved");
            return false;
        }
        let cached = self.cached_sum.get().copied().unwrap_or(0);
        if cons::sum(base) != cached {
            crate::err::set_last_error(ErrorKind::Conservation);
            self.record("verify", "sum_drifted");
            return false;
        }
        if let Some(w) = self.witness.lock().as_ref() {
            if !witness::verify(w, base) {
                self.record("verify", "witness_mismatch");
                return false;
            }
        }
        crate::err::set_last_error(ErrorKind::Ok);
        self.record("verify", "ok");
        true
    }

    /// `commit(dom)`. Requires a successful `verify`; atomically
    /// transitions `Open -> Committed`. Generates and binds a witness if
    /// none is bound yet, rolling the state back to `Open` if witness
    /// generation fails.
    pub fn commit(&self) -> Result<()> {
        let result = (|| {
            self.check_magic()?;
            if !self.verify() {
                // `verify` has already set the precise last-error kind.
                return Err(match crate::err::last_error() {
                    ErrorKind::Conservation => Error::Conservation,
                    ErrorKind::Witness => Error::Witness,
                    ErrorKind::Destroyed => Error::Destroyed,
                    _ => Error::State,
                });
            }
            self.state
                .compare_exchange(
                    DomainState::Open.to_tag(),
                    DomainState::Committed.to_tag(),
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .map_err(|_| Error::State)?;

            let needs_witness = self.witness.lock().is_none();
            if needs_witness {
                let base = self.base.get().copied().expect("verify guarantees attachment");
                match witness::generate(base) {
                    Ok(w) => {
                        *self.witness.lock() = Some(w);
                    }
                    Err(_) => {
                        self.state.store(DomainState::Open.to_tag(), Ordering::Release);
                        return Err(Error::Memory);
                    }
                }
            }
            Ok(())
        })();
        crate::err::set_last_error(match &result {
            Ok(()) => ErrorKind::Ok,
            Err(e) => e.kind(),
        });
        self.record("commit", if result.is_ok() { "ok" } else { "rejected" });
        result
    }

    /// The bound witness, if any.
    pub fn witness(&self) -> Option<Witness> {
        self.witness.lock().clone()
    }

    /// `destroy(dom)`. Drops the bound witness, clears the magic tag, and
    /// leaves the borrowed bytes untouched. Not safe to call concurrently
    /// with any other operation on the same handle.
    pub fn destroy(&self) {
        if self.magic.swap(MAGIC_DESTROYED, Ordering::AcqRel) == MAGIC_DESTROYED {
            return; // already destroyed; no-op, matching "safe on null"
        }
        *self.witness.lock() = None; // Drop zeroes the witness record
        self.record("destroy", "ok");
    }

    /// `alloc(dom, amt)`. Atomic CAS on the budget cell; fails with
    /// [`Error::Budget`] if the current low-7-bit value is less than
    /// `amt`.
    pub fn alloc(&self, amt: u8) -> Result<()> {
        let result = track(|| {
            self.check_magic()?;
            if u32::from(amt) > BUDGET_VALUE_MASK {
                return Err(Error::Invalid);
            }
            loop {
                let current = self.budget.load(Ordering::Acquire);
                let low7 = current & BUDGET_VALUE_MASK;
                if low7 < u32::from(amt) {
                    return Err(Error::Budget);
                }
                let updated = (current & !BUDGET_VALUE_MASK) | (low7 - u32::from(amt));
                if self
                    .budget
                    .compare_exchange_weak(current, updated, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    return Ok(());
                }
            }
        });
        self.record("alloc", if result.is_ok() { "ok" } else { "rejected" });
        result
    }

    /// `release(dom, amt)`. Adds modulo 96; never fails on range.
    pub fn release(&self, amt: u8) -> Result<()> {
        let result = track(|| {
            self.check_magic()?;
            if u32::from(amt) > BUDGET_VALUE_MASK {
                return Err(Error::Invalid);
            }
            loop {
                let current = self.budget.load(Ordering::Acquire);
                let low7 = current & BUDGET_VALUE_MASK;
                let updated_low7 = (low7 + u32::from(amt)) % cons::MODULUS;
                let updated = (current & !BUDGET_VALUE_MASK) | updated_low7;
                if self
                    .budget
                    .compare_exchange_weak(current, updated, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    return Ok(());
                }
            }
        });
        self.record("release", "ok");
        result
    }

    /// Current budget low-7-bit value.
    #[must_use]
    pub fn budget(&self) -> u8 {
        (self.budget.load(Ordering::Acquire) & BUDGET_VALUE_MASK) as u8
    }
}
