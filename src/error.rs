use std::ffi::c_char;
use std::io;
use std::os::raw::c_int;

use thiserror::Error;

/// The `errfn` callback shape from `glob(3)`: `int errfunc(const char
/// *epath, int eerrno)`. Called with the path that failed to read and the
/// OS errno at the point of failure; a non-zero return aborts the walk
/// regardless of whether the `err` flag is set.
pub type ErrFn = unsafe extern "C" fn(epath: *const c_char, eerrno: c_int) -> c_int;

/// The error taxonomy of the glob driver.
///
/// Malformed pattern fragments (unterminated brackets, extglobs, braces)
/// are never surfaced here — they degrade to literals at the point they
/// are parsed.
#[derive(Debug, Error)]
pub enum ZlobError {
    /// The call completed with zero matches and neither `nocheck` nor
    /// `nomagic` synthesized a fallback result.
    #[error("no match")]
    NoMatch,

    /// An internal allocation could not be satisfied. Ordinary `Vec`
    /// growth aborts the process rather than erroring in safe Rust, so
    /// this is reachable only through the crate's explicit
    /// fallible-reserve path (see `ZlobResult::try_reserve`).
    #[error("no space")]
    NoSpace,

    /// A directory could not be read and either the `err` flag was set
    /// or the caller's error callback returned non-zero.
    #[error("aborted: {0}")]
    Aborted(#[source] io::Error),
}

impl ZlobError {
    /// Maps to the process-visible return codes: 1=no-space, 2=aborted, 3=no-match.
    #[must_use]
    pub fn return_code(&self) -> i32 {
        match self {
            ZlobError::NoSpace => 1,
            ZlobError::Aborted(_) => 2,
            ZlobError::NoMatch => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ZlobError>;
