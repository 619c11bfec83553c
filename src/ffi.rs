//! C ABI surface: thin `unsafe extern "C"` wrappers over the safe Rust API
//! in `lib.rs`. Shapes and return codes follow `glob(3)`.

use std::ffi::{c_char, c_int, CStr};

use crate::error::{ErrFn, ZlobError};
use crate::flags::ZlobFlags;
use crate::result::ZlobResult;
use crate::walk::VirtualBackend;

/// Run a glob. `pattern` must be a valid NUL-terminated C string. `result`
/// must point to a valid, initialized `*mut ZlobResult` slot; on success it
/// is overwritten with a heap-allocated result the caller must release with
/// [`zlobfree`]. When `flags` includes `ALTDIRFUNC`, `altdir` must be
/// non-null and point to a live [`VirtualBackend`] for the duration of the
/// call. `offs` is the caller's `gl_offs`, consulted only when `flags`
/// includes `DOOFFS`. `errfn`, if non-null, is `glob(3)`'s `errfunc`: called
/// with the path that failed to read and the OS errno, aborting the call on
/// a non-zero return regardless of the `err` flag.
///
/// # Safety
/// `pattern` and `result` must be valid pointers per the above; `altdir`,
/// when required, must outlive the call; `errfn`, if non-null, must be safe
/// to call with a NUL-terminated path and an errno.
#[no_mangle]
pub unsafe extern "C" fn zlob(
    pattern: *const c_char,
    flags: u32,
    altdir: *const VirtualBackend,
    errfn: Option<ErrFn>,
    offs: usize,
    result: *mut *mut ZlobResult,
) -> c_int {
    if pattern.is_null() || result.is_null() {
        return ZlobError::NoMatch.return_code();
    }
    let pattern_bytes = CStr::from_ptr(pattern).to_bytes();
    let flags = ZlobFlags::from(flags);
    let backend = if flags.has(ZlobFlags::ALTDIRFUNC) && !altdir.is_null() { Some(*altdir) } else { None };

    match crate::glob(pattern_bytes, flags, backend, errfn, offs) {
        Ok(r) => {
            *result = Box::into_raw(Box::new(r));
            0
        }
        Err(e) => e.return_code(),
    }
}

/// Match `pattern` against `paths[0..count]`, each a NUL-terminated C
/// string. Returns a heap-allocated result borrowing directly from the
/// caller's strings; the caller must keep those strings alive until
/// [`zlobfree`] is called, and must call `zlobfree` exactly once.
///
/// # Safety
/// `pattern` must be a valid NUL-terminated C string. `paths` must point to
/// `count` valid NUL-terminated C string pointers, all live for the
/// lifetime of the returned result. `result` must be a valid `*mut *mut
/// ZlobResult` slot.
#[no_mangle]
pub unsafe extern "C" fn zlob_match_paths(
    pattern: *const c_char,
    paths: *const *const c_char,
    count: usize,
    flags: u32,
    offs: usize,
    result: *mut *mut ZlobResult,
) -> c_int {
    if pattern.is_null() || paths.is_null() || result.is_null() {
        return ZlobError::NoMatch.return_code();
    }
    let pattern_bytes = CStr::from_ptr(pattern).to_bytes();
    let path_ptrs = std::slice::from_raw_parts(paths, count);
    let path_slices: Vec<&[u8]> = path_ptrs.iter().map(|&p| CStr::from_ptr(p).to_bytes()).collect();

    let r = crate::match_paths(pattern_bytes, &path_slices, ZlobFlags::from(flags), offs);
    // `r` already carries a nocheck/nomagic literal fallback as its sole
    // entry when one applies, so a plain `path_count() == 0` check (rather
    // than re-testing the flags here) correctly distinguishes a genuine
    // no-match from a papered-over one.
    let matched = r.path_count();
    *result = Box::into_raw(Box::new(r));
    if matched == 0 { ZlobError::NoMatch.return_code() } else { 0 }
}

/// Like [`zlob_match_paths`], but for already-length-prefixed byte slices
/// rather than NUL-terminated strings — the true zero-copy entry point for
/// callers who already hold `(ptr, len)` pairs (e.g. from an index or
/// archive directory) and would otherwise pay for a NUL-scan per path.
///
/// # Safety
/// `path_ptrs[i]` must point to at least `path_lens[i]` valid bytes, for
/// `i in 0..count`, all live for the lifetime of the returned result.
#[no_mangle]
pub unsafe extern "C" fn zlob_match_paths_slice(
    pattern: *const c_char,
    pattern_len: usize,
    path_ptrs: *const *const u8,
    path_lens: *const usize,
    count: usize,
    flags: u32,
    offs: usize,
    result: *mut *mut ZlobResult,
) -> c_int {
    if pattern.is_null() || path_ptrs.is_null() || path_lens.is_null() || result.is_null() {
        return ZlobError::NoMatch.return_code();
    }
    let pattern_bytes = std::slice::from_raw_parts(pattern.cast::<u8>(), pattern_len);
    let ptrs = std::slice::from_raw_parts(path_ptrs, count);
    let lens = std::slice::from_raw_parts(path_lens, count);
    let path_slices: Vec<&[u8]> =
        ptrs.iter().zip(lens).map(|(&p, &len)| std::slice::from_raw_parts(p, len)).collect();

    let r = crate::match_paths(pattern_bytes, &path_slices, ZlobFlags::from(flags), offs);
    let matched = r.path_count();
    *result = Box::into_raw(Box::new(r));
    if matched == 0 { ZlobError::NoMatch.return_code() } else { 0 }
}

/// Release a result produced by [`zlob`], [`zlob_match_paths`], or
/// [`zlob_match_paths_slice`]. Passing null is a no-op; double-freeing the
/// same pointer is undefined behavior, same as the C `glob(3)` contract.
///
/// # Safety
/// `result` must either be null or a pointer previously returned through
/// one of this module's `result` out-parameters, not yet freed.
#[no_mangle]
pub unsafe extern "C" fn zlobfree(result: *mut ZlobResult) {
    if !result.is_null() {
        drop(Box::from_raw(result));
    }
}
