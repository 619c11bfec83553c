//! Brace expansion: `{a,b,c}` into N independent patterns via
//! balanced-brace, left-to-right scanning.

/// Expand the first (outermost) `{...}` group in `pattern` and recurse into
/// each alternative. Returns `[pattern]` unchanged if there is no balanced
/// brace group to expand (including genuinely unbalanced ones, which are
/// left as literal `{`).
#[must_use]
pub fn expand_braces(pattern: &[u8]) -> Vec<Vec<u8>> {
    match find_outermost_group(pattern) {
        None => vec![pattern.to_vec()],
        Some((open, close)) => {
            let prefix = &pattern[..open];
            let suffix = &pattern[close + 1..];
            let body = &pattern[open + 1..close];
            let alts = split_top_level_commas(body);

            let mut out = Vec::new();
            for alt in alts {
                let mut combined = Vec::with_capacity(prefix.len() + alt.len() + suffix.len());
                combined.extend_from_slice(prefix);
                combined.extend_from_slice(&alt);
                combined.extend_from_slice(suffix);
                out.extend(expand_braces(&combined));
            }
            out
        }
    }
}

/// Locate the first `{` that has a matching `}`, skipping escaped braces and
/// braces nested inside `[...]` (bracket expressions never contain `/` or
/// unescaped structural braces, so a bracket's contents are opaque to brace
/// scanning). Returns byte offsets `(open, close)`. `None` if no `{` has a
/// matching `}` (an unbalanced `{` is left as a literal character).
fn find_outermost_group(pattern: &[u8]) -> Option<(usize, usize)> {
    let mut i = 0;
    while i < pattern.len() {
        match pattern[i] {
            b'\\' if i + 1 < pattern.len() => i += 2,
            b'[' => {
                i = skip_bracket(pattern, i);
            }
            b'{' => {
                if let Some(close) = find_matching_brace(pattern, i) {
                    return Some((i, close));
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// Given `pattern[start] == '['`, return the index just past the bracket's
/// closing `]` (or `start + 1` if it never closes, so scanning continues
/// byte-by-byte through what's actually a literal `[`).
fn skip_bracket(pattern: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    if pattern.get(i) == Some(&b'!') {
        i += 1;
    }
    let mut first = true;
    while i < pattern.len() {
        if pattern[i] == b']' && !first {
            return i + 1;
        }
        first = false;
        i += 1;
    }
    start + 1
}

/// Find the `}` matching the `{` at `open`, tracking nesting depth and
/// skipping escapes and bracket expressions along the way.
fn find_matching_brace(pattern: &[u8], open: usize) -> Option<usize> {
    let mut depth = 1;
    let mut i = open + 1;
    while i < pattern.len() {
        match pattern[i] {
            b'\\' if i + 1 < pattern.len() => i += 2,
            b'[' => i = skip_bracket(pattern, i),
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// Split `body` on top-level commas (not nested in `{...}` or `[...]`, and
/// not escaped). Empty alternatives are preserved, so `{,x}` yields `["",
/// "x"]`.
fn split_top_level_commas(body: &[u8]) -> Vec<Vec<u8>> {
    let mut alts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut i = 0;
    while i < body.len() {
        match body[i] {
            b'\\' if i + 1 < body.len() => i += 2,
            b'[' => i = skip_bracket(body, i),
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                i += 1;
            }
            b',' if depth == 0 => {
                alts.push(body[start..i].to_vec());
                i += 1;
                start = i;
            }
            _ => i += 1,
        }
    }
    alts.push(body[start..].to_vec());
    alts
}
