use std::ffi::CString;

use zlob::ffi::{zlob_match_paths, zlobfree};
use zlob::ZlobResult;

//
//
// zlob_match_paths round-trip through the C ABI
//
//

#[test]
fn match_paths_through_ffi() {
    let pattern = CString::new("*.txt").unwrap();
    let paths: Vec<CString> = ["a.txt", "b.log", "c.txt"].iter().map(|s| CString::new(*s).unwrap()).collect();
    let path_ptrs: Vec<*const std::ffi::c_char> = paths.iter().map(|p| p.as_ptr()).collect();

    let mut out: *mut ZlobResult = std::ptr::null_mut();
    let rc = unsafe { zlob_match_paths(pattern.as_ptr(), path_ptrs.as_ptr(), path_ptrs.len(), 0, 0, &mut out) };
    assert_eq!(rc, 0);
    assert!(!out.is_null());

    let result = unsafe { &*out };
    let matched: Vec<String> = result.matches().map(|b| String::from_utf8_lossy(b).into_owned()).collect();
    assert_eq!(matched, vec!["a.txt", "c.txt"]);

    unsafe { zlobfree(out) };
}

#[test]
fn match_paths_through_ffi_no_match_returns_nomatch_code() {
    let pattern = CString::new("*.xyz").unwrap();
    let paths: Vec<CString> = ["a.txt"].iter().map(|s| CString::new(*s).unwrap()).collect();
    let path_ptrs: Vec<*const std::ffi::c_char> = paths.iter().map(|p| p.as_ptr()).collect();

    let mut out: *mut ZlobResult = std::ptr::null_mut();
    let rc = unsafe { zlob_match_paths(pattern.as_ptr(), path_ptrs.as_ptr(), path_ptrs.len(), 0, 0, &mut out) };
    assert_eq!(rc, 3);
    assert!(!out.is_null());

    unsafe { zlobfree(out) };
}

#[test]
fn null_pattern_is_rejected_without_crashing() {
    let paths: Vec<*const std::ffi::c_char> = Vec::new();
    let mut out: *mut ZlobResult = std::ptr::null_mut();
    let rc = unsafe { zlob_match_paths(std::ptr::null(), paths.as_ptr(), 0, 0, 0, &mut out) };
    assert_eq!(rc, 3);
    assert!(out.is_null());
}
