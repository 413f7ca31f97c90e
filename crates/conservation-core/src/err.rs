//! Error discipline: the stable 8-way kind enumeration, the `thiserror`
//! result type used by the safe Rust API, and the task-local "last error"
//! register consumed by the FFI boundary.

use std::cell::Cell;
use std::ffi::CStr;

use thiserror::Error;

/// Stable error ordinal, exposed at the ABI boundary as a `u8`.
///
/// Ordinals and rendered strings are fixed and must never be renumbered;
/// callers across the ABI boundary match on the numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    Ok = 0,
    Invalid = 1,
    Memory = 2,
    State = 3,
    Budget = 4,
    Conservation = 5,
    Witness = 6,
    Destroyed = 7,
}

impl ErrorKind {
    /// Fixed ASCII phrase for this kind.
    #[must_use]
    pub const fn error_string(self) -> &'static str {
        match self {
            ErrorKind::Ok => "Operation completed successfully",
            ErrorKind::Invalid => "Invalid function argument",
            ErrorKind::Memory => "Memory allocation failed",
            ErrorKind::State => "Invalid domain state transition",
            ErrorKind::Budget => "Insufficient budget for operation",
            ErrorKind::Conservation => "Conservation law violated",
            ErrorKind::Witness => "Witness verification failed",
            ErrorKind::Destroyed => "Domain has been destroyed",
        }
    }

    /// Fixed NUL-terminated phrase for this kind, safe to hand across the
    /// ABI boundary as a raw C string pointer (unlike `error_string`'s
    /// `&str`, which carries no NUL terminator).
    #[must_use]
    pub const fn error_cstr(self) -> &'static CStr {
        match self {
            ErrorKind::Ok => c"Operation completed successfully",
            ErrorKind::Invalid => c"Invalid function argument",
            ErrorKind::Memory => c"Memory allocation failed",
            ErrorKind::State => c"Invalid domain state transition",
            ErrorKind::Budget => c"Insufficient budget for operation",
            ErrorKind::Conservation => c"Conservation law violated",
            ErrorKind::Witness => c"Witness verification failed",
            ErrorKind::Destroyed => c"Domain has been destroyed",
        }
    }

    /// Ordinal as it crosses the ABI boundary.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Reconstructs a kind from its ordinal; `None` for out-of-range values.
    #[must_use]
    pub const fn from_ordinal(v: u8) -> Option<Self> {
        match v {
            0 => Some(ErrorKind::Ok),
            1 => Some(ErrorKind::Invalid),
            2 => Some(ErrorKind::Memory),
            3 => Some(ErrorKind::State),
            4 => Some(ErrorKind::Budget),
            5 => Some(ErrorKind::Conservation),
            6 => Some(ErrorKind::Witness),
            7 => Some(ErrorKind::Destroyed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.error_string())
    }
}

/// Result error type for every fallible safe-Rust operation in this crate.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid function argument")]
    Invalid,
    #[error("Memory allocation failed")]
    Memory,
    #[error("Invalid domain state transition")]
    State,
    #[error("Insufficient budget for operation")]
    Budget,
    #[error("Conservation law violated")]
    Conservation,
    #[error("Witness verification failed")]
    Witness,
    #[error("Domain has been destroyed")]
    Destroyed,
}

impl Error {
    /// Maps this error to its stable ordinal kind.
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Error::Invalid => ErrorKind::Invalid,
            Error::Memory => ErrorKind::Memory,
            Error::State => ErrorKind::State,
            Error::Budget => ErrorKind::Budget,
            Error::Conservation => ErrorKind::Conservation,
            Error::Witness => ErrorKind::Witness,
            Error::Destroyed => ErrorKind::Destroyed,
        }
    }
}

/// `Result` alias used throughout this crate's public API.
pub type Result<T> = std::result::Result<T, Error>;

thread_local! {
    /// Task-local last-error register. Set by every public operation,
    /// `Ok` on success, the failing kind otherwise. This is what lets the
    /// `conservation-abi` boundary report outcomes without unwinding a
    /// `Result` across the `extern "C"` edge.
    static LAST_ERROR: Cell<ErrorKind> = const { Cell::new(ErrorKind::Ok) };
}

/// Reads the current task-local last-error kind.
#[must_use]
pub fn last_error() -> ErrorKind {
    LAST_ERROR.with(|cell| cell.get())
}

/// Sets the task-local last-error kind. Called once per public operation,
/// on both the success and failure paths.
pub fn set_last_error(kind: ErrorKind) {
    LAST_ERROR.with(|cell| cell.set(kind));
}

/// Runs `f`, recording its outcome's kind in the last-error register before
/// returning the result unchanged.
pub fn track<T>(f: impl FnOnce() -> Result<T>) -> Result<T> {
    let result = f();
    set_last_error(match &result {
        Ok(_) => ErrorKind::Ok,
        Err(e) => e.kind(),
    });
    result
}
