//! Whole-pattern analyzer: split a full multi-segment pattern into literal
//! prefix, recursive middle, and wildcard tail.

use crate::bitmap::ByteBitmap;
use crate::simd::find_any_of;

/// Flags affecting what counts as a "magic" (wildcard-triggering) character.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnalyzeFlags {
    pub brace: bool,
    pub no_escape: bool,
    pub recursive: bool,
}

/// The result of splitting a pattern into a resolvable directory prefix and
/// the remaining wildcard tail.
#[derive(Clone, Debug, Default)]
pub struct PatternAnalysis {
    /// Path components that make up the longest leading run with no magic
    /// and no `**`. Joined with `/`, this is the directory to `stat`/resolve
    /// before descending.
    pub literal_prefix: Vec<Vec<u8>>,
    /// The remaining components, starting at the first magic/`**` component.
    pub wildcard_suffix: Vec<Vec<u8>>,
    /// True iff any component of the whole pattern equals `**`.
    pub has_recursive: bool,
    /// `Some(suffix)` when the wildcard tail is exactly `*suffix` with no
    /// further metacharacters and `has_recursive` is false.
    pub simple_extension: Option<Vec<u8>>,
}

/// Does this single byte count as magic under `flags`?
#[must_use]
pub fn is_magic_byte(b: u8, flags: AnalyzeFlags) -> bool {
    match b {
        b'*' | b'?' | b'[' => true,
        b'{' => flags.brace,
        b'\\' => !flags.no_escape,
        b'~' => true,
        _ => false,
    }
}

/// Bitmap of bytes that count as magic under `flags`, for block-scanning
/// instead of a per-byte closure call.
fn magic_bitmap(flags: AnalyzeFlags) -> ByteBitmap {
    let mut set = ByteBitmap::new();
    for b in [b'*', b'?', b'[', b'~'] {
        set.set(b);
    }
    if flags.brace {
        set.set(b'{');
    }
    if !flags.no_escape {
        set.set(b'\\');
    }
    set
}

/// Does this pattern contain any magic character, ignoring `/` separators?
#[must_use]
pub fn has_magic(pattern: &[u8], flags: AnalyzeFlags) -> bool {
    find_any_of(pattern, &magic_bitmap(flags)).is_some()
}

/// Split `pattern` on `/` into segments (an empty leading segment, from an
/// absolute path, is preserved as an empty `Vec<u8>` so the leading slash
/// round-trips on reassembly).
#[must_use]
pub fn split_segments(pattern: &[u8]) -> Vec<Vec<u8>> {
    pattern.split(|&b| b == b'/').map(<[u8]>::to_vec).collect()
}

fn segment_has_magic(seg: &[u8], flags: AnalyzeFlags) -> bool {
    let mut set = magic_bitmap(flags);
    set.unset(b'~');
    find_any_of(seg, &set).is_some()
}

/// Analyze a full (possibly multi-segment) pattern.
#[must_use]
pub fn analyze_pattern(pattern: &[u8], flags: AnalyzeFlags) -> PatternAnalysis {
    let segments = split_segments(pattern);
    let mut has_recursive = false;
    let mut split_at = segments.len();

    for (i, seg) in segments.iter().enumerate() {
        let is_double_star = flags.recursive && seg.as_slice() == b"**";
        if is_double_star {
            has_recursive = true;
            split_at = i;
            break;
        }
        if segment_has_magic(seg, flags) {
            split_at = i;
            break;
        }
    }

    let (literal_prefix, wildcard_suffix) = segments.split_at(split_at);
    let wildcard_suffix = wildcard_suffix.to_vec();

    let simple_extension = (!has_recursive)
        .then(|| wildcard_suffix.last())
        .flatten()
        .and_then(|last| {
            if last.first() == Some(&b'*') && !segment_has_magic(&last[1..], flags) {
                Some(last[1..].to_vec())
            } else {
                None
            }
        });

    PatternAnalysis {
        literal_prefix: literal_prefix.to_vec(),
        wildcard_suffix,
        has_recursive,
        simple_extension,
    }
}
