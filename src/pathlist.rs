//! Zero-copy path-list matcher: test a pattern against an in-memory list of
//! candidate pathnames without touching the filesystem, borrowing each
//! matched string straight out of the caller's buffers.

use crate::flags::ZlobFlags;
use crate::matcher::MatchFlags;
use crate::pattern::{self, AnalyzeFlags};
use crate::result::ZlobResult;
use crate::template::{self, PatternTemplate};

/// Match `pattern` against each of `paths`, returning a result whose
/// entries borrow directly from `paths` (no allocation per match). A
/// pattern containing `**` matches any path with at least as many
/// components as its fixed segments, in the positions `**` leaves free; a
/// leading/trailing `**` floats freely, matching zero or more components.
/// `offs` reserves that many leading `NULL` slots in the result, same as
/// the glob driver's `dooffs` handling. `nocheck`/`nomagic` apply here too:
/// on zero matches, either flag (the latter only when `pattern` has no
/// magic character) falls back to the literal pattern as the sole, owned
/// result.
#[must_use]
pub fn match_paths<'a>(pattern: &[u8], paths: &[&'a [u8]], flags: ZlobFlags, offs: usize) -> ZlobResult {
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

    let pattern_segments: Vec<&[u8]> = pattern.split(|&b| b == b'/').collect();
    let templates: Vec<Option<PatternTemplate>> = pattern_segments
        .iter()
        .map(|&seg| {
            if analyze.recursive && seg == b"**" {
                None
            } else {
                Some(template::analyze_segment(seg, analyze, match_flags.extglob))
            }
        })
        .collect();

    let offs = if flags.has(ZlobFlags::DOOFFS) { offs } else { 0 };
    let mut result = ZlobResult::empty(offs, false);
    result.magic_char = pattern::has_magic(pattern, analyze);
    for &path in paths {
        if path_matches(&templates, path, match_flags) {
            result.push_borrowed(path.as_ptr(), path.len());
        }
    }
    if result.path_count() == 0 && (flags.has(ZlobFlags::NOCHECK) || (flags.has(ZlobFlags::NOMAGIC) && !result.magic_char)) {
        result.push_owned(pattern.to_vec().into_boxed_slice());
    }
    if !flags.has(ZlobFlags::NOSORT) {
        // Borrowed entries compare by byte content, same as owned ones;
        // sorting here only reorders pointers, never touches the bytes.
        result.sort_all();
    }
    result.sync_raw();
    result
}

/// Match a single `&[u8]` against many patterns is the same primitive used
/// by `match_paths`, just with the loop nesting inverted; exposed directly
/// for callers (e.g. the gitignore rule set) that already have one path and
/// many rule patterns to test.
fn path_matches(templates: &[Option<PatternTemplate>], path: &[u8], flags: MatchFlags) -> bool {
    let segments: Vec<&[u8]> = path.split(|&b| b == b'/').collect();
    match_from(templates, &segments, flags)
}

fn match_from(templates: &[Option<PatternTemplate>], segments: &[&[u8]], flags: MatchFlags) -> bool {
    match templates.split_first() {
        None => segments.is_empty(),
        Some((None, rest)) => {
            // `**`: try consuming 0..=segments.len() components here.
            (0..=segments.len()).any(|k| match_from(rest, &segments[k..], flags))
        }
        Some((Some(template), rest)) => {
            !segments.is_empty() && template.matches(segments[0], flags) && match_from(rest, &segments[1..], flags)
        }
    }
}
