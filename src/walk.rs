//! Directory walker: a platform-abstract iterator over one directory's
//! entries, with a pluggable virtual backend so callers can glob over
//! in-memory trees (archives, test fixtures, network filesystems).

use std::ffi::CString;
use std::io;
use std::path::Path;

/// The kind of a directory entry, matching the wire constants used across
/// the FFI dirent shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Unknown = 0,
    Dir = 4,
    Reg = 8,
    Lnk = 10,
}

/// One directory entry: a name (no path separators) and its kind.
#[derive(Clone, Debug)]
pub struct Dirent {
    pub name: Box<[u8]>,
    pub kind: EntryKind,
}

/// Opaque handle to an open virtual directory, supplied by the caller's
/// `opendir` callback and threaded back through `readdir`/`closedir`.
pub type VirtualHandle = *mut std::ffi::c_void;

/// The `opendir`/`readdir`/`closedir` callback triple. The caller owns
/// entry name buffers and must keep them valid until the next `readdir` or
/// `closedir` call on that handle.
#[derive(Clone, Copy)]
pub struct VirtualBackend {
    pub opendir: unsafe extern "C" fn(path: *const std::ffi::c_char) -> VirtualHandle,
    pub readdir: unsafe extern "C" fn(handle: VirtualHandle, name_out: *mut *const std::ffi::c_char, kind_out: *mut u8) -> bool,
    pub closedir: unsafe extern "C" fn(handle: VirtualHandle),
}

/// One open directory, from either backend.
enum OpenDir<'a> {
    Fs(std::fs::ReadDir),
    Virtual { backend: &'a VirtualBackend, handle: VirtualHandle },
}

impl Drop for OpenDir<'_> {
    fn drop(&mut self) {
        if let OpenDir::Virtual { backend, handle } = self {
            unsafe { (backend.closedir)(*handle) };
        }
    }
}

/// Opens one directory and yields its entries. Two backends:
///
/// - filesystem: wraps `std::fs::read_dir`, which on Linux is backed by the
///   batch `getdents64` syscall and carries the entry's file type inline,
///   avoiding a `stat` per entry except when the kernel reports `Unknown`.
/// - virtual: delegates to caller-supplied `opendir`/`readdir`/`closedir`.
pub struct DirIter<'a> {
    inner: OpenDir<'a>,
}

impl<'a> DirIter<'a> {
    pub fn open_fs(path: &Path) -> io::Result<Self> {
        Ok(Self { inner: OpenDir::Fs(std::fs::read_dir(path)?) })
    }

    /// # Errors
    /// Returns an error if the virtual backend's `opendir` reports failure
    /// by returning a null handle.
    pub fn open_virtual(backend: &'a VirtualBackend, path: &Path) -> io::Result<Self> {
        let c_path = path_to_cstring(path)?;
        let handle = unsafe { (backend.opendir)(c_path.as_ptr()) };
        if handle.is_null() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "virtual opendir returned null"));
        }
        Ok(Self { inner: OpenDir::Virtual { backend, handle } })
    }
}

impl Iterator for DirIter<'_> {
    type Item = io::Result<Dirent>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            OpenDir::Fs(read_dir) => {
                let entry = read_dir.next()?;
                Some(entry.and_then(|e| {
                    let kind = entry_kind_of(&e);
                    Ok(Dirent { name: e.file_name().to_string_lossy().into_owned().into_bytes().into_boxed_slice(), kind })
                }))
            }
            OpenDir::Virtual { backend, handle } => {
                let mut name_ptr: *const std::ffi::c_char = std::ptr::null();
                let mut kind_byte: u8 = 0;
                let has_next = unsafe { (backend.readdir)(*handle, &mut name_ptr, &mut kind_byte) };
                if !has_next {
                    return None;
                }
                if name_ptr.is_null() {
                    return Some(Err(io::Error::new(io::ErrorKind::InvalidData, "virtual readdir returned null name")));
                }
                let name = unsafe { std::ffi::CStr::from_ptr(name_ptr) }.to_bytes().to_vec().into_boxed_slice();
                let kind = match kind_byte {
                    4 => EntryKind::Dir,
                    8 => EntryKind::Reg,
                    10 => EntryKind::Lnk,
                    _ => EntryKind::Unknown,
                };
                Some(Ok(Dirent { name, kind }))
            }
        }
    }
}

fn entry_kind_of(entry: &std::fs::DirEntry) -> EntryKind {
    match entry.file_type() {
        Ok(ft) if ft.is_dir() => EntryKind::Dir,
        Ok(ft) if ft.is_symlink() => EntryKind::Lnk,
        Ok(ft) if ft.is_file() => EntryKind::Reg,
        _ => EntryKind::Unknown,
    }
}

#[cfg(unix)]
fn path_to_cstring(path: &Path) -> io::Result<CString> {
    use std::os::unix::ffi::OsStrExt;
    CString::new(path.as_os_str().as_bytes()).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

#[cfg(not(unix))]
fn path_to_cstring(path: &Path) -> io::Result<CString> {
    CString::new(path.to_string_lossy().into_owned()).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

/// A stack frame of the recursive descent: the directory's path (relative
/// to the glob's resolved root) and its still-unconsumed entry iterator.
/// Modeled as an explicit frame stack (an iterator of iterators) rather
/// than native recursion, so arbitrarily deep `**` trees don't grow the
/// Rust call stack.
pub struct WalkFrame<'a> {
    pub rel_dir: Vec<u8>,
    pub iter: DirIter<'a>,
}
