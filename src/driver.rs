//! Glob orchestrator: the `glob()` entry point's end-to-end algorithm —
//! brace pass, tilde pass, magic test, prefix resolution, descent (plain or
//! recursive), per-entry filtering, and result assembly.

use std::ffi::CString;
use std::path::{Path, PathBuf};

use crate::brace::expand_braces;
use crate::error::{ErrFn, Result, ZlobError};
use crate::flags::ZlobFlags;
use crate::gitignore::{self, GitignoreRuleSet};
use crate::matcher::MatchFlags;
use crate::pattern::{analyze_pattern, has_magic, AnalyzeFlags};
use crate::result::ZlobResult;
use crate::template::{self, PatternTemplate};
use crate::util;
use crate::walk::{DirIter, EntryKind, VirtualBackend, WalkFrame};

/// A glob call's read-only configuration, threaded through every helper
/// below instead of re-deriving `AnalyzeFlags`/`MatchFlags` at each site.
struct Context {
    flags: ZlobFlags,
    analyze: AnalyzeFlags,
    match_flags: MatchFlags,
    altdir: Option<VirtualBackend>,
    errfn: Option<ErrFn>,
    gitignore: Option<GitignoreRuleSet>,
    gitignore_root: Option<PathBuf>,
}

impl Context {
    fn new(flags: ZlobFlags, altdir: Option<VirtualBackend>, errfn: Option<ErrFn>) -> Self {
        let analyze = AnalyzeFlags {
            brace: flags.has(ZlobFlags::BRACE),
            no_escape: flags.has(ZlobFlags::NOESCAPE),
            recursive: flags.has(ZlobFlags::RECURSIVE),
        };
        let match_flags = MatchFlags {
            no_escape: flags.has(ZlobFlags::NOESCAPE),
            period: flags.has(ZlobFlags::PERIOD),
            case_fold: false,
            extglob: flags.has(ZlobFlags::EXTGLOB),
        };
        let (gitignore, gitignore_root) = if flags.has(ZlobFlags::GITIGNORE) {
            match gitignore::discover(&std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))) {
                Some((set, root)) => (Some(set), Some(root)),
                None => (None, None),
            }
        } else {
            (None, None)
        };
        Self { flags, analyze, match_flags, altdir, errfn, gitignore, gitignore_root }
    }
}

/// Run a glob call and return its result buffer, or an error per the
/// return-code taxonomy (no-match, no-space, aborted). `offs`, when
/// `dooffs` is set, is the caller-requested count of leading NULL slots to
/// reserve in the result (read once, at the start of the call, same as
/// `glob(3)`'s `gl_offs`-before-call convention); ignored on an `append`ed
/// call, which keeps the previous result's own `offs`.
pub fn glob(
    pattern: &[u8],
    flags: ZlobFlags,
    altdir: Option<VirtualBackend>,
    errfn: Option<ErrFn>,
    offs: usize,
    previous: Option<ZlobResult>,
) -> Result<ZlobResult> {
    let ctx = Context::new(flags, altdir, errfn);
    let offs = if flags.has(ZlobFlags::APPEND) {
        previous.as_ref().map_or(offs, |r| r.offs)
    } else if flags.has(ZlobFlags::DOOFFS) {
        offs
    } else {
        0
    };

    let mut result = if flags.has(ZlobFlags::APPEND) {
        previous.unwrap_or_else(|| ZlobResult::empty(offs, true))
    } else {
        ZlobResult::empty(offs, true)
    };
    result.magic_char = has_magic(pattern, ctx.analyze);
    result.altdir = ctx.altdir;

    let tilde_expanded = expand_tilde(pattern, flags)?;

    let alternatives =
        if flags.has(ZlobFlags::BRACE) { expand_braces(&tilde_expanded) } else { vec![tilde_expanded.clone()] };

    // Everything at or after `call_start` is this call's own output: index 0
    // for a fresh call, or the previous result's tail when appending. Each
    // brace alternative is run as an independent glob into the same buffer,
    // then the whole batch is merged (dedup, sort) together, so overlapping
    // alternatives like `{*.c,*.*}` don't yield the same path twice.
    let call_start = result.path_count();
    let mut any_matches = false;
    for alt in alternatives {
        let before = result.path_count();
        glob_one_alternative(&alt, &ctx, &mut result)?;
        any_matches |= result.path_count() > before;
    }

    if !any_matches {
        if flags.has(ZlobFlags::NOCHECK) || (flags.has(ZlobFlags::NOMAGIC) && !result.magic_char) {
            result.push_owned(util::vec_into_boxed_slice_noshrink(tilde_expanded));
        } else {
            return Err(ZlobError::NoMatch);
        }
    }

    if flags.has(ZlobFlags::NOSORT) {
        result.dedup_preserving_order_suffix(call_start);
    } else {
        result.sort_suffix(call_start);
        result.dedup_adjacent_suffix(call_start);
    }

    result.sync_raw();
    Ok(result)
}

fn glob_one_alternative(pattern: &[u8], ctx: &Context, result: &mut ZlobResult) -> Result<()> {
    let analysis = analyze_pattern(pattern, ctx.analyze);

    let prefix_path: Vec<u8> = join_components(&analysis.literal_prefix);
    let prefix_dir = if prefix_path.is_empty() { PathBuf::from(".") } else { PathBuf::from(bytes_to_path(&prefix_path)) };

    if analysis.wildcard_suffix.is_empty() {
        return match_literal_path(pattern, ctx, result);
    }

    if analysis.has_recursive {
        descend_recursive(&prefix_dir, &analysis.wildcard_suffix, ctx, result, &prefix_path)
    } else {
        descend_plain(&prefix_dir, &analysis.wildcard_suffix, ctx, result, &prefix_path)
    }
}

/// No magic anywhere: the pattern names one path directly. `glob(3)` still
/// requires the path to exist (unless `nocheck` papers over a miss later).
fn match_literal_path(pattern: &[u8], ctx: &Context, result: &mut ZlobResult) -> Result<()> {
    let path = bytes_to_path(pattern);
    let Ok(meta) = std::fs::symlink_metadata(path) else { return Ok(()) };
    if ctx.flags.has(ZlobFlags::ONLYDIR) && !meta.is_dir() {
        return Ok(());
    }
    result.push_owned(util::vec_into_boxed_slice_noshrink(mark_if_dir(pattern.to_vec(), meta.is_dir(), ctx)));
    Ok(())
}

/// Non-`**` descent: walk one directory level per remaining segment,
/// filtering each level's entries by the corresponding segment template.
fn descend_plain(
    base: &Path,
    segments: &[Vec<u8>],
    ctx: &Context,
    result: &mut ZlobResult,
    prefix_path: &[u8],
) -> Result<()> {
    let mut frontier = vec![(base.to_path_buf(), prefix_path.to_vec())];

    for (i, seg) in segments.iter().enumerate() {
        let is_last = i == segments.len() - 1;
        let template = template::analyze_segment(seg, ctx.analyze, ctx.match_flags.extglob);
        let mut next = Vec::new();

        for (dir, rel) in frontier {
            let entries = match read_dir_entries(&dir, ctx) {
                Ok(e) => e,
                Err(e) => {
                    handle_dir_error(ctx, &dir, e)?;
                    continue;
                }
            };
            for entry in entries {
                if !entry_matches_template(&entry_name(&entry), &template, ctx.match_flags) {
                    continue;
                }
                if ctx.flags.has(ZlobFlags::ONLYDIR) && is_last && entry.kind != EntryKind::Dir {
                    continue;
                }
                let child_rel = join_rel(&rel, &entry_name_bytes(&entry));
                if is_gitignored(ctx, &child_rel, entry.kind == EntryKind::Dir) {
                    continue;
                }
                if is_last {
                    let is_dir = entry.kind == EntryKind::Dir;
                    result.push_owned(util::vec_into_boxed_slice_noshrink(mark_if_dir(child_rel, is_dir, ctx)));
                } else {
                    next.push((dir.join(entry_name(&entry)), child_rel));
                }
            }
        }
        frontier = next;
        if frontier.is_empty() && !is_last {
            break;
        }
    }
    Ok(())
}

/// `**` descent: the segment at `recursive_at` expands to zero or more path
/// components, walked with an explicit frame stack so arbitrarily deep
/// trees don't grow the Rust call stack.
fn descend_recursive(
    base: &Path,
    segments: &[Vec<u8>],
    ctx: &Context,
    result: &mut ZlobResult,
    prefix_path: &[u8],
) -> Result<()> {
    // segments[0] == b"**"; everything after it is matched against every
    // depth the `**` walk reaches, including depth zero (so `src/**` also
    // yields `src` itself, per this crate's "zero-or-more" reading).
    let tail = &segments[1..];

    let mut stack: Vec<WalkFrame> = Vec::new();
    match open_dir(base, ctx) {
        Ok(iter) => stack.push(WalkFrame { rel_dir: prefix_path.to_vec(), iter }),
        Err(e) => {
            handle_dir_error(ctx, base, e)?;
            return Ok(());
        }
    }

    try_match_tail_at(base, prefix_path, tail, ctx, result)?;

    while let Some(frame) = stack.last_mut() {
        let frame_dir = join_path(base, &frame.rel_dir, prefix_path);
        let next_entry = frame.iter.next();
        let Some(next_entry) = next_entry else {
            stack.pop();
            continue;
        };
        let entry = match next_entry {
            Ok(entry) => entry,
            Err(e) => {
                handle_dir_error(ctx, &frame_dir, e)?;
                continue;
            }
        };
        if entry_name(&entry) == "." || entry_name(&entry) == ".." {
            continue;
        }
        let rel = join_rel(&frame.rel_dir, &entry_name_bytes(&entry));
        let is_dir = entry.kind == EntryKind::Dir;

        if is_dir {
            let child_path = join_path(base, &rel, prefix_path);
            if gitignore_skips_dir(ctx, &rel) {
                continue;
            }
            try_match_tail_at(&child_path, &rel, tail, ctx, result)?;
            match open_dir(&child_path, ctx) {
                Ok(iter) => stack.push(WalkFrame { rel_dir: rel, iter }),
                Err(e) => handle_dir_error(ctx, &child_path, e)?,
            }
        } else if tail.is_empty() {
            // A plain file also satisfies a pattern ending in `**`: the
            // recursive wildcard matches every descendant, not only
            // directories.
            if ctx.flags.has(ZlobFlags::ONLYDIR) {
                continue;
            }
            if is_gitignored(ctx, &rel, false) {
                continue;
            }
            result.push_owned(util::vec_into_boxed_slice_noshrink(rel));
        }
    }
    Ok(())
}

/// At one `**`-reached directory (`dir`, relative path `rel`), try matching
/// `tail` against its contents (if `tail` is non-empty) or emit `rel` itself
/// (if `tail` is empty, i.e. the pattern ended in `**`).
fn try_match_tail_at(dir: &Path, rel: &[u8], tail: &[Vec<u8>], ctx: &Context, result: &mut ZlobResult) -> Result<()> {
    if tail.is_empty() {
        if rel.is_empty() {
            return Ok(());
        }
        let meta = std::fs::symlink_metadata(dir).ok();
        let is_dir = meta.as_ref().is_some_and(std::fs::Metadata::is_dir);
        if ctx.flags.has(ZlobFlags::ONLYDIR) && !is_dir {
            return Ok(());
        }
        if is_gitignored(ctx, rel, is_dir) {
            return Ok(());
        }
        result.push_owned(util::vec_into_boxed_slice_noshrink(mark_if_dir(rel.to_vec(), is_dir, ctx)));
        return Ok(());
    }
    descend_plain(dir, tail, ctx, result, rel)
}

fn open_dir<'a>(dir: &Path, ctx: &'a Context) -> std::io::Result<DirIter<'a>> {
    match &ctx.altdir {
        Some(backend) => DirIter::open_virtual(backend, dir),
        None => DirIter::open_fs(dir),
    }
}

fn read_dir_entries(dir: &Path, ctx: &Context) -> std::io::Result<Vec<crate::walk::Dirent>> {
    let iter = open_dir(dir, ctx)?;
    let mut out = Vec::new();
    for entry in iter {
        let entry = entry?;
        if entry.name.as_ref() == b"." || entry.name.as_ref() == b".." {
            continue;
        }
        out.push(entry);
    }
    Ok(out)
}

/// Decide whether a directory-read failure aborts the call: either the
/// `err` flag is set, or the caller's `errfn` callback says to stop. Mirrors
/// `glob(3)`'s "abort … or the callback returns non-zero; otherwise
/// continue" contract.
fn handle_dir_error(ctx: &Context, dir: &Path, err: std::io::Error) -> Result<()> {
    let via_errfn = ctx.errfn.is_some_and(|f| call_errfn(f, dir, &err) != 0);
    if ctx.flags.has(ZlobFlags::ERR) || via_errfn {
        Err(ZlobError::Aborted(err))
    } else {
        Ok(())
    }
}

fn call_errfn(f: ErrFn, dir: &Path, err: &std::io::Error) -> std::os::raw::c_int {
    use std::os::unix::ffi::OsStrExt;
    let Ok(c_path) = CString::new(dir.as_os_str().as_bytes()) else { return 0 };
    let errno = err.raw_os_error().unwrap_or(0);
    unsafe { f(c_path.as_ptr(), errno) }
}

fn entry_matches_template(name: &str, template: &PatternTemplate, flags: MatchFlags) -> bool {
    template.matches(name.as_bytes(), flags)
}

fn entry_name(entry: &crate::walk::Dirent) -> String {
    String::from_utf8_lossy(&entry.name).into_owned()
}

fn entry_name_bytes(entry: &crate::walk::Dirent) -> Vec<u8> {
    entry.name.to_vec()
}

fn join_components(segments: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            out.push(b'/');
        }
        out.extend_from_slice(seg);
    }
    out
}

fn join_rel(rel: &[u8], name: &[u8]) -> Vec<u8> {
    if rel.is_empty() || rel == b"." {
        name.to_vec()
    } else {
        let mut out = Vec::with_capacity(rel.len() + 1 + name.len());
        out.extend_from_slice(rel);
        out.push(b'/');
        out.extend_from_slice(name);
        out
    }
}

fn join_path(base: &Path, rel: &[u8], prefix: &[u8]) -> PathBuf {
    if rel.len() <= prefix.len() {
        return base.to_path_buf();
    }
    let suffix = &rel[prefix.len()..];
    let suffix = suffix.strip_prefix(&[b'/']).unwrap_or(suffix);
    base.join(bytes_to_path(suffix))
}

fn mark_if_dir(mut path: Vec<u8>, is_dir: bool, ctx: &Context) -> Vec<u8> {
    if is_dir && ctx.flags.has(ZlobFlags::MARK) && path.last() != Some(&b'/') {
        path.push(b'/');
    }
    path
}

fn is_gitignored(ctx: &Context, rel_path: &[u8], is_dir: bool) -> bool {
    let Some(set) = &ctx.gitignore else { return false };
    let Some(root) = &ctx.gitignore_root else { return false };
    let Some(rel_to_root) = rel_to_gitignore_root(rel_path, root) else { return false };
    set.is_ignored(&rel_to_root, is_dir)
}

fn gitignore_skips_dir(ctx: &Context, rel_path: &[u8]) -> bool {
    let Some(set) = &ctx.gitignore else { return false };
    let Some(root) = &ctx.gitignore_root else { return false };
    let Some(rel_to_root) = rel_to_gitignore_root(rel_path, root) else { return false };
    set.should_skip_directory(&rel_to_root)
}

/// `.gitignore` rules are written relative to the file's own directory; a
/// glob can run from anywhere, so translate the walk-relative path into one
/// relative to `gitignore_root` via the current working directory.
fn rel_to_gitignore_root(rel_path: &[u8], root: &Path) -> Option<String> {
    let cwd = std::env::current_dir().ok()?;
    let abs = cwd.join(bytes_to_path(rel_path));
    let rel = abs.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().into_owned())
}

fn expand_tilde(pattern: &[u8], flags: ZlobFlags) -> Result<Vec<u8>> {
    if !flags.has(ZlobFlags::TILDE) && !flags.has(ZlobFlags::TILDE_CHECK) {
        return Ok(pattern.to_vec());
    }
    if pattern.first() != Some(&b'~') {
        return Ok(pattern.to_vec());
    }
    let end = pattern.iter().position(|&b| b == b'/').unwrap_or(pattern.len());
    let user = &pattern[1..end];
    let home = if user.is_empty() { home_dir() } else { home_dir_of_user(user) };

    match home {
        Some(home) => {
            let mut out = home;
            out.extend_from_slice(&pattern[end..]);
            Ok(out)
        }
        None if flags.has(ZlobFlags::TILDE_CHECK) => Err(ZlobError::NoMatch),
        None => Ok(pattern.to_vec()),
    }
}

fn home_dir() -> Option<Vec<u8>> {
    std::env::var_os("HOME").map(|h| h.into_encoded_bytes())
}

/// Resolve `~user` via `getpwnam`, matching the lookup `glob(3)` itself
/// performs for non-`$HOME` tilde expansion.
fn home_dir_of_user(user: &[u8]) -> Option<Vec<u8>> {
    let c_user = std::ffi::CString::new(user).ok()?;
    unsafe {
        let pw = libc::getpwnam(c_user.as_ptr());
        if pw.is_null() {
            return None;
        }
        let dir = (*pw).pw_dir;
        if dir.is_null() {
            return None;
        }
        Some(std::ffi::CStr::from_ptr(dir).to_bytes().to_vec())
    }
}

fn bytes_to_path(bytes: &[u8]) -> &Path {
    use std::os::unix::ffi::OsStrExt;
    Path::new(std::ffi::OsStr::from_bytes(bytes))
}
