//! Per-segment pattern template analyzer. Classifies a single
//! path-component pattern so the driver can dispatch to a cheap specialised
//! comparison instead of the general backtracking matcher on the common
//! shapes.

use crate::bitmap::ByteBitmap;
use crate::matcher::{self, MatchFlags};
use crate::pattern::{is_magic_byte, AnalyzeFlags};

/// The classification of one segment pattern, a tagged variant (no trait
/// objects — dispatch is a `match` in [`PatternTemplate::matches`]).
#[derive(Clone, Debug)]
pub enum PatternTemplate {
    /// No metacharacters: match by byte equality.
    Literal(Vec<u8>),
    /// Exactly `*`: matches any component (honoring the period rule upstream).
    StarOnly,
    /// `*suffix`: match by suffix equality.
    StarDotExt(Vec<u8>),
    /// `prefix*`: match by prefix equality.
    PrefixStar(Vec<u8>),
    /// `prefix*suffix`: match by prefix+suffix with a minimum-length check.
    PrefixStarExt { prefix: Vec<u8>, suffix: Vec<u8> },
    /// `prefix[...]suffix`: literal head and tail flank a single bracket class.
    BracketWithAffixes { prefix: Vec<u8>, bitmap: ByteBitmap, suffix: Vec<u8> },
    /// Anything else: dispatch to the general backtracking matcher.
    General(Vec<u8>),
}

impl PatternTemplate {
    /// The last byte this template forces the match to end with, when
    /// statically known; used for a cheap early reject before the full
    /// comparison runs.
    #[must_use]
    pub fn required_last_char(&self) -> Option<u8> {
        match self {
            PatternTemplate::Literal(s) => s.last().copied(),
            PatternTemplate::StarDotExt(suffix) | PatternTemplate::PrefixStarExt { suffix, .. } => suffix.last().copied(),
            PatternTemplate::BracketWithAffixes { suffix, .. } if !suffix.is_empty() => suffix.last().copied(),
            _ => None,
        }
    }

    #[must_use]
    pub fn matches(&self, name: &[u8], flags: MatchFlags) -> bool {
        if flags.period && name.first() == Some(&b'.') && !self.explicit_leading_dot() {
            return false;
        }
        match self {
            PatternTemplate::Literal(lit) => {
                if flags.case_fold {
                    name.eq_ignore_ascii_case(lit)
                } else {
                    name == lit.as_slice()
                }
            }
            PatternTemplate::StarOnly => !name.is_empty(),
            PatternTemplate::StarDotExt(suffix) => name.len() >= suffix.len() && ends_with(name, suffix, flags),
            PatternTemplate::PrefixStar(prefix) => name.len() >= prefix.len() && starts_with(name, prefix, flags),
            PatternTemplate::PrefixStarExt { prefix, suffix } => {
                name.len() >= prefix.len() + suffix.len() && starts_with(name, prefix, flags) && ends_with(name, suffix, flags)
            }
            PatternTemplate::BracketWithAffixes { prefix, bitmap, suffix } => {
                let need = prefix.len() + 1 + suffix.len();
                name.len() == need
                    && starts_with(name, prefix, flags)
                    && ends_with(&name[prefix.len() + 1..], suffix, flags)
                    && bracket_contains(bitmap, name[prefix.len()], flags)
            }
            PatternTemplate::General(raw) => matcher::match_one(raw, name, no_period(flags)),
        }
    }

    fn explicit_leading_dot(&self) -> bool {
        match self {
            PatternTemplate::Literal(s) => s.first() == Some(&b'.'),
            PatternTemplate::PrefixStar(p) | PatternTemplate::PrefixStarExt { prefix: p, .. } => p.first() == Some(&b'.'),
            PatternTemplate::BracketWithAffixes { prefix, .. } => prefix.first() == Some(&b'.'),
            // StarOnly/StarDotExt/General never explicitly start with '.'.
            _ => false,
        }
    }
}

/// `matches` above already applies the period rule once; don't double-apply
/// it inside `General`'s delegation to the backtracking matcher.
fn no_period(mut flags: MatchFlags) -> MatchFlags {
    flags.period = false;
    flags
}

fn starts_with(name: &[u8], prefix: &[u8], flags: MatchFlags) -> bool {
    name.len() >= prefix.len() && eq(&name[..prefix.len()], prefix, flags)
}

fn ends_with(name: &[u8], suffix: &[u8], flags: MatchFlags) -> bool {
    name.len() >= suffix.len() && eq(&name[name.len() - suffix.len()..], suffix, flags)
}

fn eq(a: &[u8], b: &[u8], flags: MatchFlags) -> bool {
    if flags.case_fold {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

fn bracket_contains(bitmap: &ByteBitmap, b: u8, flags: MatchFlags) -> bool {
    if flags.case_fold {
        bitmap.contains(b) || bitmap.contains(flip_case(b))
    } else {
        bitmap.contains(b)
    }
}

fn flip_case(b: u8) -> u8 {
    if b.is_ascii_lowercase() {
        b.to_ascii_uppercase()
    } else if b.is_ascii_uppercase() {
        b.to_ascii_lowercase()
    } else {
        b
    }
}

/// Classify a single segment pattern (no `/`) into a [`PatternTemplate`].
/// Extglob patterns and anything with more than one run of metacharacters
/// fall back to `General`.
#[must_use]
pub fn analyze_segment(segment: &[u8], flags: AnalyzeFlags, extglob: bool) -> PatternTemplate {
    if extglob && contains_extglob_introducer(segment) {
        return PatternTemplate::General(segment.to_vec());
    }

    if !has_any_metachar(segment, flags) {
        return PatternTemplate::Literal(segment.to_vec());
    }

    if segment == b"*" {
        return PatternTemplate::StarOnly;
    }

    if let Some(stars) = single_star_split(segment) {
        let (head, tail) = stars;
        if head.is_empty() && !has_any_metachar(tail, flags) {
            return PatternTemplate::StarDotExt(tail.to_vec());
        }
        if tail.is_empty() && !has_any_metachar(head, flags) {
            return PatternTemplate::PrefixStar(head.to_vec());
        }
        if !has_any_metachar(head, flags) && !has_any_metachar(tail, flags) {
            return PatternTemplate::PrefixStarExt { prefix: head.to_vec(), suffix: tail.to_vec() };
        }
    }

    if let Some((prefix, bitmap, suffix)) = single_bracket_split(segment) {
        if !has_any_metachar(prefix, flags) && !has_any_metachar(suffix, flags) {
            return PatternTemplate::BracketWithAffixes { prefix: prefix.to_vec(), bitmap, suffix: suffix.to_vec() };
        }
    }

    PatternTemplate::General(segment.to_vec())
}

fn has_any_metachar(segment: &[u8], flags: AnalyzeFlags) -> bool {
    segment.iter().any(|&b| matches!(b, b'*' | b'?' | b'[') || (b'\\' == b && !flags.no_escape))
}

fn contains_extglob_introducer(segment: &[u8]) -> bool {
    let mut i = 0;
    while i + 1 < segment.len() {
        if matches!(segment[i], b'@' | b'?' | b'*' | b'+' | b'!') && segment[i + 1] == b'(' {
            return true;
        }
        i += 1;
    }
    false
}

/// If `segment` contains exactly one `*` (and no other metacharacters),
/// return the literal head/tail around it.
fn single_star_split(segment: &[u8]) -> Option<(&[u8], &[u8])> {
    let stars: Vec<usize> = segment.iter().enumerate().filter(|(_, &b)| b == b'*').map(|(i, _)| i).collect();
    if stars.len() != 1 {
        return None;
    }
    let pos = stars[0];
    let rest_has_meta = segment[..pos].iter().chain(&segment[pos + 1..]).any(|&b| matches!(b, b'?' | b'['));
    if rest_has_meta {
        return None;
    }
    Some((&segment[..pos], &segment[pos + 1..]))
}

/// If `segment` contains exactly one `[...]` bracket (and no other
/// metacharacters outside it), return the literal head/tail and the
/// compiled bitmap.
fn single_bracket_split(segment: &[u8]) -> Option<(&[u8], ByteBitmap, &[u8])> {
    let open = segment.iter().position(|&b| b == b'[')?;
    let (bitmap, consumed) = crate::matcher::parse_bracket_for_template(&segment[open..])?;
    let close = open + consumed;
    if segment[..open].iter().any(|&b| matches!(b, b'*' | b'?' | b'[')) {
        return None;
    }
    let tail = &segment[close..];
    if tail.iter().any(|&b| matches!(b, b'*' | b'?' | b'[')) {
        return None;
    }
    Some((&segment[..open], bitmap, tail))
}
