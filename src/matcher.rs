//! Single-component matcher: classic `fnmatch` semantics extended with
//! extglob alternations. Operates on one path segment at a time — neither
//! `pattern` nor `name` may contain `/`.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::bitmap::ByteBitmap;

/// Matching flags recognized by [`match_one`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchFlags {
    /// Backslash is a literal character, not an escape introducer.
    pub no_escape: bool,
    /// A leading `.` in `name` is only matched by an explicit `.` in the pattern.
    pub period: bool,
    /// Case-insensitive byte comparison.
    pub case_fold: bool,
    /// Enable `@()`/`?()`/`*()`/`+()`/`!()` extended-glob constructs.
    pub extglob: bool,
}

/// One node of a compiled pattern fragment. Fragments never cross `/`.
///
/// A tagged enum rather than a trait object, so dispatch over node kinds
/// stays a plain `match` instead of a vtable call per node.
#[derive(Clone, Debug)]
enum Node {
    /// Most path segments are well under 16 bytes, so a literal run stays
    /// inline instead of allocating.
    Literal(SmallVec<[u8; 16]>),
    AnyChar,
    AnyStar,
    Bracket(ByteBitmap),
    /// `@(A|B|...)`: exactly one alternative must match.
    ExtOne(Vec<Pattern>),
    /// `?(A|B|...)`: zero or one alternative.
    ExtOpt(Vec<Pattern>),
    /// `*(A|B|...)`: zero or more, in any combination.
    ExtStar(Vec<Pattern>),
    /// `+(A|B|...)`: one or more.
    ExtPlus(Vec<Pattern>),
    /// `!(A|B|...)`: any string that does not match any alternative.
    ExtNeg(Vec<Pattern>),
}

type Pattern = Vec<Node>;

/// Match `pattern_segment` against `name`. Both are single path components
/// (no `/`). Total function: malformed constructs (unterminated bracket or
/// extglob group) degrade to being matched literally.
#[must_use]
pub fn match_one(pattern_segment: &[u8], name: &[u8], flags: MatchFlags) -> bool {
    if flags.period
        && name.first() == Some(&b'.')
        && !pattern_starts_with_explicit_dot(pattern_segment, flags)
    {
        return false;
    }

    let compiled = compile(pattern_segment, flags);
    let mut memo = HashMap::new();
    match_rec(&compiled, 0, name, flags, &mut memo)
}

fn pattern_starts_with_explicit_dot(pattern: &[u8], flags: MatchFlags) -> bool {
    if !flags.no_escape && pattern.first() == Some(&b'\\') && pattern.len() > 1 {
        return pattern[1] == b'.';
    }
    if flags.extglob
        && pattern.len() > 1
        && matches!(pattern[0], b'@' | b'?' | b'*' | b'+' | b'!')
        && pattern[1] == b'('
    {
        return false;
    }
    pattern.first() == Some(&b'.')
}

/// Parse a pattern fragment (no `/`) into a sequence of [`Node`]s.
fn compile(pattern: &[u8], flags: MatchFlags) -> Pattern {
    let mut nodes = Vec::new();
    let mut literal: SmallVec<[u8; 16]> = SmallVec::new();
    let mut i = 0;

    macro_rules! flush_literal {
        () => {
            if !literal.is_empty() {
                nodes.push(Node::Literal(std::mem::take(&mut literal)));
            }
        };
    }

    while i < pattern.len() {
        let b = pattern[i];
        match b {
            b'\\' if !flags.no_escape => {
                if i + 1 < pattern.len() {
                    literal.push(pattern[i + 1]);
                    i += 2;
                } else {
                    literal.push(b'\\');
                    i += 1;
                }
            }
            b'?' if !(flags.extglob && i + 1 < pattern.len() && pattern[i + 1] == b'(') => {
                flush_literal!();
                nodes.push(Node::AnyChar);
                i += 1;
            }
            b'*' if !(flags.extglob && i + 1 < pattern.len() && pattern[i + 1] == b'(') => {
                flush_literal!();
                nodes.push(Node::AnyStar);
                i += 1;
            }
            b'[' => {
                if let Some((bitmap, consumed)) = parse_bracket(&pattern[i..]) {
                    flush_literal!();
                    nodes.push(Node::Bracket(bitmap));
                    i += consumed;
                } else {
                    literal.push(b'[');
                    i += 1;
                }
            }
            b'@' | b'?' | b'*' | b'+' | b'!'
                if flags.extglob && i + 1 < pattern.len() && pattern[i + 1] == b'(' =>
            {
                if let Some((alts, consumed)) = parse_extglob_group(&pattern[i + 1..], flags) {
                    flush_literal!();
                    nodes.push(match b {
                        b'@' => Node::ExtOne(alts),
                        b'?' => Node::ExtOpt(alts),
                        b'*' => Node::ExtStar(alts),
                        b'+' => Node::ExtPlus(alts),
                        b'!' => Node::ExtNeg(alts),
                        _ => unreachable!(),
                    });
                    i += 1 + consumed;
                } else {
                    literal.push(b);
                    i += 1;
                }
            }
            _ => {
                literal.push(b);
                i += 1;
            }
        }
    }
    flush_literal!();
    nodes
}

/// Parse a bracket expression starting at `input[0] == '['`. Returns the
/// bitmap and the number of bytes consumed (including both brackets), or
/// `None` if unterminated or empty.
fn parse_bracket(input: &[u8]) -> Option<(ByteBitmap, usize)> {
    debug_assert_eq!(input.first(), Some(&b'['));
    let mut i = 1;
    let mut bitmap = ByteBitmap::new();

    if input.get(i) == Some(&b'!') {
        bitmap.negated = true;
        i += 1;
    }

    // `]` as the first character (after an optional `!`) is literal, not a
    // terminator.
    let mut first = true;

    loop {
        if i >= input.len() {
            return None;
        }
        if input[i] == b']' && !first {
            i += 1;
            if bitmap.is_empty() {
                return None;
            }
            return Some((bitmap, i));
        }
        first = false;

        if input[i] == b'[' && input.get(i + 1) == Some(&b':') {
            if let Some(end) = find_subsequence(&input[i + 2..], b":]") {
                bitmap.add_posix_class(&input[i + 2..i + 2 + end]);
                i += 2 + end + 2;
                continue;
            }
        }

        let lo = input[i];
        if input.get(i + 1) == Some(&b'-') && input.get(i + 2).is_some() && input[i + 2] != b']' {
            let hi = input[i + 2];
            bitmap.set_range(lo, hi);
            i += 3;
        } else {
            bitmap.set(lo);
            i += 1;
        }
    }
}

/// Exposed for the segment template analyzer, which needs to find and
/// flatten a single bracket expression without compiling a whole pattern.
#[must_use]
pub fn parse_bracket_for_template(input: &[u8]) -> Option<(ByteBitmap, usize)> {
    parse_bracket(input)
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Parse `A|B|...)` (the text after the `(` of an extglob group, with the
/// introducer byte already consumed). Returns the compiled alternatives and
/// bytes consumed including the closing `)`.
fn parse_extglob_group(input: &[u8], flags: MatchFlags) -> Option<(Vec<Pattern>, usize)> {
    debug_assert_eq!(input.first(), Some(&b'('));
    let mut depth = 1;
    let mut i = 1;
    let mut alt_start = 1;
    let mut alts: Vec<Pattern> = Vec::new();

    while i < input.len() {
        match input[i] {
            b'\\' if !flags.no_escape => {
                i += 2;
                continue;
            }
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    alts.push(compile(&input[alt_start..i], flags));
                    i += 1;
                    return Some((alts, i));
                }
            }
            b'|' if depth == 1 => {
                alts.push(compile(&input[alt_start..i], flags));
                alt_start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Recursive backtracking match with memoization on `(node index, remaining
/// length)` so repeated sub-problems (the classic cost of naive star
/// backtracking, amplified here by extglob repetition) are solved once.
fn match_rec(nodes: &[Node], ni: usize, text: &[u8], flags: MatchFlags, memo: &mut HashMap<(usize, usize), bool>) -> bool {
    if ni == nodes.len() {
        return text.is_empty();
    }

    let key = (ni, text.len());
    if let Some(&cached) = memo.get(&key) {
        return cached;
    }
    // Break potential recursion during computation of this very key (not
    // reachable in practice since consuming nodes always advance `ni`, but
    // keeps this function total under future node types).
    memo.insert(key, false);

    let result = match &nodes[ni] {
        Node::Literal(lit) => literal_matches(text, lit, flags) && match_rec(nodes, ni + 1, &text[lit.len()..], flags, memo),
        Node::AnyChar => !text.is_empty() && match_rec(nodes, ni + 1, &text[1..], flags, memo),
        Node::AnyStar => (0..=text.len()).rev().any(|len| match_rec(nodes, ni + 1, &text[len..], flags, memo)),
        Node::Bracket(bitmap) => match text.first() {
            Some(&b) => bracket_hit(bitmap, b, flags) && match_rec(nodes, ni + 1, &text[1..], flags, memo),
            None => false,
        },
        Node::ExtOne(alts) => ext_candidates(alts, text, flags, 1, 1)
            .into_iter()
            .any(|len| match_rec(nodes, ni + 1, &text[len..], flags, memo)),
        Node::ExtOpt(alts) => ext_candidates(alts, text, flags, 0, 1)
            .into_iter()
            .any(|len| match_rec(nodes, ni + 1, &text[len..], flags, memo)),
        Node::ExtStar(alts) => ext_candidates(alts, text, flags, 0, text.len())
            .into_iter()
            .any(|len| match_rec(nodes, ni + 1, &text[len..], flags, memo)),
        Node::ExtPlus(alts) => ext_candidates(alts, text, flags, 1, text.len())
            .into_iter()
            .any(|len| match_rec(nodes, ni + 1, &text[len..], flags, memo)),
        Node::ExtNeg(alts) => (0..=text.len()).rev().any(|len| {
            !alts.iter().any(|a| alt_fullmatch(a, &text[..len], flags)) && match_rec(nodes, ni + 1, &text[len..], flags, memo)
        }),
    };

    memo.insert(key, result);
    result
}

fn literal_matches(text: &[u8], lit: &[u8], flags: MatchFlags) -> bool {
    if text.len() < lit.len() {
        return false;
    }
    if flags.case_fold {
        text[..lit.len()].eq_ignore_ascii_case(lit)
    } else {
        &text[..lit.len()] == lit
    }
}

fn bracket_hit(bitmap: &ByteBitmap, b: u8, flags: MatchFlags) -> bool {
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

fn alt_fullmatch(alt: &Pattern, text: &[u8], flags: MatchFlags) -> bool {
    let mut memo = HashMap::new();
    match_rec(alt, 0, text, flags, &mut memo)
}

/// Lengths of `text` fully consumed by `alt` (i.e. prefixes `text[..L]` that
/// `alt` matches exactly), shortest-first.
fn alt_match_lengths(alt: &Pattern, text: &[u8], flags: MatchFlags) -> Vec<usize> {
    (0..=text.len()).filter(|&len| alt_fullmatch(alt, &text[..len], flags)).collect()
}

/// Candidate total-consumed lengths for `min..=max` repetitions of `alts`
/// against the front of `text`, as a breadth-first closure over reachable
/// offsets. Zero-length alternative matches never advance a repetition
/// (required so `*()`/`+()` terminate).
fn ext_candidates(alts: &[Pattern], text: &[u8], flags: MatchFlags, min: usize, max: usize) -> Vec<usize> {
    let cap = max.min(text.len().saturating_add(1));
    let mut levels: Vec<std::collections::HashSet<usize>> = vec![[0].into_iter().collect()];

    for rep in 1..=cap {
        let prev = levels[rep - 1].clone();
        let mut cur = std::collections::HashSet::new();
        for off in prev {
            if off > text.len() {
                continue;
            }
            for alt in alts {
                for len in alt_match_lengths(alt, &text[off..], flags) {
                    if len == 0 {
                        continue;
                    }
                    cur.insert(off + len);
                }
            }
        }
        if cur.is_empty() {
            break;
        }
        levels.push(cur);
    }

    let mut result: std::collections::HashSet<usize> = std::collections::HashSet::new();
    for (rep, level) in levels.iter().enumerate() {
        if rep < min || rep > max {
            continue;
        }
        result.extend(level.iter().copied());
    }
    result.into_iter().collect()
}
