//! Result buffer: the public result shape shared by both the I/O-producing
//! glob driver (owned strings) and the zero-copy path-list matcher
//! (borrowed strings).

use std::ffi::c_char;

use crate::error::{Result, ZlobError};
use crate::walk::VirtualBackend;

/// One matched pathname, either allocated by this crate or borrowed from a
/// caller-supplied buffer. `owns_strings` on [`ZlobResult`] says which.
enum Entry {
    Owned(Box<[u8]>),
    Borrowed { ptr: *const u8, len: usize },
}

impl Entry {
    fn as_bytes(&self) -> &[u8] {
        match self {
            Entry::Owned(b) => b,
            // SAFETY: borrowed entries alias caller-owned path bytes that
            // the caller is contractually required to keep valid for the
            // lifetime of this result (the path-list matcher's zero-copy
            // contract).
            Entry::Borrowed { ptr, len } => unsafe { std::slice::from_raw_parts(*ptr, *len) },
        }
    }
}

/// The public result structure. `offs` leading `NULL` slots are reserved
/// but not counted in the match count; `pathv[offs + pathc]` is always a
/// `NULL` terminator.
pub struct ZlobResult {
    entries: Vec<Entry>,
    /// Number of leading reserved `NULL` slots, read from the caller's
    /// `dooffs` request at construction time.
    pub offs: usize,
    /// Distinguishes glob() results (strings owned by this crate) from
    /// match-paths results (strings borrowed from caller memory). Consulted
    /// by `free` to decide whether string bytes are released.
    owns_strings: bool,
    /// Set when the originating pattern contained a magic character
    /// (`MAGCHAR`, an output-only flag).
    pub magic_char: bool,
    /// Virtual directory hooks threaded through from the call that produced
    /// this result, for FFI consumers that re-enter the walker.
    pub altdir: Option<VirtualBackend>,
    // C ABI backbone, rebuilt lazily by `as_raw`/`into_raw` from `entries`.
    raw_pathv: Vec<*mut c_char>,
    raw_pathlen: Vec<usize>,
}

impl ZlobResult {
    #[must_use]
    pub fn empty(offs: usize, owns_strings: bool) -> Self {
        Self {
            entries: Vec::new(),
            offs,
            owns_strings,
            magic_char: false,
            altdir: None,
            raw_pathv: Vec::new(),
            raw_pathlen: Vec::new(),
        }
    }

    #[must_use]
    pub fn path_count(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn push_owned(&mut self, path: Box<[u8]>) {
        self.entries.push(Entry::Owned(path));
    }

    pub(crate) fn push_borrowed(&mut self, ptr: *const u8, len: usize) {
        self.entries.push(Entry::Borrowed { ptr, len });
    }

    pub(crate) fn extend_owned(&mut self, paths: impl IntoIterator<Item = Box<[u8]>>) {
        self.entries.extend(paths.into_iter().map(Entry::Owned));
    }

    pub(crate) fn sort_all(&mut self) {
        self.entries.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
    }

    /// Sort only the suffix starting at `from` (the newly-added run from an
    /// `append`ed call, or one brace alternative's results), preserving the
    /// relative order of everything before it — keeps each brace
    /// alternative's matches sorted among themselves rather than forcing a
    /// full re-sort of the combined buffer.
    pub(crate) fn sort_suffix(&mut self, from: usize) {
        self.entries[from..].sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
    }

    /// Collapse adjacent duplicates in `entries[from..]`, after that range
    /// has been sorted by [`Self::sort_suffix`] — used after assembling all
    /// of a call's brace alternatives, so overlapping alternatives like
    /// `{*.c,*.*}` don't yield the same path twice. `from` is `0` for a
    /// fresh call and the previous result's length for an `append`ed one,
    /// so a prior call's own, already-deduped, results are left alone.
    pub(crate) fn dedup_adjacent_suffix(&mut self, from: usize) {
        let mut tail = self.entries.split_off(from);
        tail.dedup_by(|a, b| a.as_bytes() == b.as_bytes());
        self.entries.append(&mut tail);
    }

    /// Order-preserving dedup of `entries[from..]`, for the `nosort` case
    /// where a bytewise sort (and therefore adjacent-dedup) would destroy
    /// the caller-requested encounter order.
    pub(crate) fn dedup_preserving_order_suffix(&mut self, from: usize) {
        let tail = self.entries.split_off(from);
        let mut boxed: Vec<Box<[u8]>> = tail.into_iter().map(|e| Box::from(e.as_bytes())).collect();
        crate::util::dedup_preserving_order(&mut boxed);
        self.entries.extend(boxed.into_iter().map(Entry::Owned));
    }

    /// Fallible growth path used for very large result sets; the only
    /// avenue by which this crate's API can itself surface `NoSpace`,
    /// since an ordinary `Vec` push aborts the process on OOM rather than
    /// returning a `Result`.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<()> {
        self.entries.try_reserve(additional).map_err(|_| ZlobError::NoSpace)
    }

    /// Safe iteration over matches as byte slices, in `[offs, offs+pathc)`
    /// order (the reserved leading slots are not part of this iterator).
    pub fn matches(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.iter().map(Entry::as_bytes)
    }

    #[must_use]
    pub fn get(&self, i: usize) -> Option<&[u8]> {
        self.entries.get(i).map(Entry::as_bytes)
    }

    /// Rebuild the NUL-terminated `pathv`/`pathlen` backbone. Called before
    /// handing this result across the FFI boundary; cheap relative to the
    /// match-producing work it follows.
    pub(crate) fn sync_raw(&mut self) {
        self.raw_pathv.clear();
        self.raw_pathlen.clear();

        for _ in 0..self.offs {
            self.raw_pathv.push(std::ptr::null_mut());
            self.raw_pathlen.push(0);
        }
        for entry in &self.entries {
            let bytes = entry.as_bytes();
            let mut nul_terminated = Vec::with_capacity(bytes.len() + 1);
            nul_terminated.extend_from_slice(bytes);
            nul_terminated.push(0);
            let boxed = nul_terminated.into_boxed_slice();
            let ptr = Box::into_raw(boxed) as *mut c_char;
            self.raw_pathv.push(ptr);
            self.raw_pathlen.push(bytes.len());
        }
        self.raw_pathv.push(std::ptr::null_mut());
    }

    #[must_use]
    pub fn raw_pathv(&self) -> &[*mut c_char] {
        &self.raw_pathv
    }

    #[must_use]
    pub fn raw_pathlen(&self) -> &[usize] {
        &self.raw_pathlen
    }
}

impl Drop for ZlobResult {
    fn drop(&mut self) {
        // `sync_raw` always allocates its own NUL-terminated copies
        // regardless of `owns_strings` (it's a derived FFI view), so those
        // are always ours to free. The `owns_strings` flag only concerns
        // `entries`' own storage, which a `Vec<Entry>` drop already handles
        // correctly per-variant (Owned frees, Borrowed doesn't).
        for &ptr in &self.raw_pathv {
            if !ptr.is_null() {
                let len = unsafe { libc::strlen(ptr) } + 1;
                unsafe {
                    drop(Box::from_raw(std::slice::from_raw_parts_mut(ptr as *mut u8, len)));
                }
            }
        }
    }
}
