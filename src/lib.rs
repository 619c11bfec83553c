#![warn(
    clippy::all,
    clippy::pedantic,
    // clippy::cargo,
    dead_code
)]
#![allow(
    clippy::inline_always,
    clippy::uninlined_format_args, // ?...
    clippy::borrow_as_ptr,
    clippy::single_match_else,
    clippy::collapsible_if,
    clippy::new_without_default,
    clippy::redundant_field_names,
    clippy::struct_field_names,
    clippy::ptr_as_ptr,
    clippy::missing_transmute_annotations,
    clippy::multiple_crate_versions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::similar_names,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::used_underscore_binding,
    clippy::nonstandard_macro_braces,
    clippy::used_underscore_items,
    clippy::enum_glob_use,
    clippy::cast_lossless,
    clippy::match_same_arms,
    clippy::too_many_lines,
    clippy::unnested_or_patterns,
    clippy::blocks_in_conditions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
)]

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod bitmap;
pub mod brace;
pub mod driver;
pub mod error;
pub mod ffi;
pub mod flags;
pub mod gitignore;
pub mod matcher;
pub mod pathlist;
pub mod pattern;
pub mod result;
pub mod simd;
pub mod template;
pub mod util;
pub mod walk;

pub use error::{ErrFn, Result, ZlobError};
pub use flags::ZlobFlags;
pub use result::ZlobResult;
pub use walk::VirtualBackend;

/// Expand a pathname pattern against the filesystem. `pattern` need not be
/// UTF-8; any byte sequence that isn't a `/` is a legal path-component byte.
/// `offs`, when the `dooffs` flag is set, reserves that many leading `NULL`
/// slots in the result (`glob(3)`'s `gl_offs` convention); ignored
/// otherwise. `errfn`, when given, is called with each directory that
/// failed to read; a non-zero return aborts the call even without the `err`
/// flag.
///
/// # Errors
/// Returns [`ZlobError::NoMatch`] if nothing matched and neither `nocheck`
/// nor `nomagic` papered over the miss, [`ZlobError::Aborted`] if a
/// directory read failed under the `err` flag or a virtual `readdir`
/// callback, and [`ZlobError::NoSpace`] if an internal allocation could not
/// grow to hold the result set.
pub fn glob(
    pattern: &[u8],
    flags: ZlobFlags,
    altdir: Option<VirtualBackend>,
    errfn: Option<ErrFn>,
    offs: usize,
) -> Result<ZlobResult> {
    tracing::debug!(pattern = %String::from_utf8_lossy(pattern), flags = flags.0, "glob");
    driver::glob(pattern, flags, altdir, errfn, offs, None)
}

/// Append this glob's matches onto a previous result, per the `APPEND` flag
/// contract (the previous result's `offs` and existing entries are kept).
///
/// # Errors
/// See [`glob`].
pub fn glob_append(
    pattern: &[u8],
    flags: ZlobFlags,
    altdir: Option<VirtualBackend>,
    errfn: Option<ErrFn>,
    previous: ZlobResult,
) -> Result<ZlobResult> {
    driver::glob(pattern, flags.with(ZlobFlags::APPEND), altdir, errfn, previous.offs, Some(previous))
}

/// Match `pattern` against an in-memory list of candidate pathnames with no
/// filesystem access; the result borrows directly from `paths`. `offs`
/// behaves as in [`glob`].
#[must_use]
pub fn match_paths<'a>(pattern: &[u8], paths: &[&'a [u8]], flags: ZlobFlags, offs: usize) -> ZlobResult {
    tracing::debug!(pattern = %String::from_utf8_lossy(pattern), count = paths.len(), "match_paths");
    pathlist::match_paths(pattern, paths, flags, offs)
}

/// Like [`match_paths`], but takes a single contiguous buffer of
/// NUL-separated pathnames (e.g. `find -print0` output) instead of a slice
/// of slices, avoiding a caller-side allocation to build the outer `Vec`.
#[must_use]
pub fn match_paths_slice(pattern: &[u8], nul_separated: &[u8], flags: ZlobFlags, offs: usize) -> ZlobResult {
    let paths: Vec<&[u8]> = nul_separated.split(|&b| b == 0).filter(|s| !s.is_empty()).collect();
    pathlist::match_paths(pattern, &paths, flags, offs)
}
