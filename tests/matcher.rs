use zlob::matcher::{match_one, MatchFlags};

fn m(pattern: &str, name: &str) -> bool {
    match_one(pattern.as_bytes(), name.as_bytes(), MatchFlags::default())
}

//
//
// Literal and basic wildcards
//
//

#[test]
fn literal_exact() {
    assert!(m("hello.txt", "hello.txt"));
    assert!(!m("hello.txt", "hello.TXT"));
}

#[test]
fn star_matches_any_run() {
    assert!(m("*.txt", "a.txt"));
    assert!(m("*.txt", "a.b.c.txt"));
    assert!(!m("*.txt", "a.log"));
}

#[test]
fn question_matches_one_byte() {
    assert!(m("a?c", "abc"));
    assert!(!m("a?c", "ac"));
    assert!(!m("a?c", "abbc"));
}

#[test]
fn star_can_match_empty() {
    assert!(m("a*b", "ab"));
}

//
//
// Bracket expressions
//
//

#[test]
fn bracket_range() {
    assert!(m("file[0-9].txt", "file5.txt"));
    assert!(!m("file[0-9].txt", "fileA.txt"));
}

#[test]
fn bracket_negated() {
    assert!(m("file[!0-9].txt", "fileA.txt"));
    assert!(!m("file[!0-9].txt", "file5.txt"));
}

#[test]
fn bracket_posix_class() {
    assert!(m("file[[:digit:]].txt", "file1.txt"));
    assert!(!m("file[[:digit:]].txt", "fileA.txt"));
}

#[test]
fn bracket_literal_close_bracket_first() {
    assert!(m("[]a]", "]"));
    assert!(m("[]a]", "a"));
    assert!(!m("[]a]", "b"));
}

#[test]
fn unterminated_bracket_is_literal() {
    assert!(m("[abc", "[abc"));
    assert!(!m("[abc", "a"));
}

//
//
// Escapes and period rule
//
//

#[test]
fn escaped_star_is_literal() {
    assert!(m("a\\*b", "a*b"));
    assert!(!m("a\\*b", "axb"));
}

#[test]
fn noescape_flag_treats_backslash_literally() {
    let flags = MatchFlags { no_escape: true, ..Default::default() };
    assert!(match_one(b"a\\*b", b"a\\xb", flags));
}

#[test]
fn period_rule_blocks_implicit_leading_dot() {
    let flags = MatchFlags { period: true, ..Default::default() };
    assert!(!match_one(b"*", b".hidden", flags));
    assert!(match_one(b"*", b"visible", flags));
    assert!(match_one(b".*", b".hidden", flags));
}

//
//
// Extglob alternation and negation groups
//
//

#[test]
fn extglob_one_of_alternation() {
    let flags = MatchFlags { extglob: true, ..Default::default() };
    assert!(match_one(b"*.@(js|ts)", b"app.js", flags));
    assert!(match_one(b"*.@(js|ts)", b"app.ts", flags));
    assert!(!match_one(b"*.@(js|ts)", b"app.zig", flags));
}

#[test]
fn extglob_negation() {
    let flags = MatchFlags { extglob: true, ..Default::default() };
    assert!(!match_one(b"*.!(js)", b"a.js", flags));
    assert!(match_one(b"*.!(js)", b"a.ts", flags));
    assert!(match_one(b"*.!(js)", b"a.zig", flags));
}

#[test]
fn extglob_star_zero_or_more() {
    let flags = MatchFlags { extglob: true, ..Default::default() };
    assert!(match_one(b"a*(b)c", b"ac", flags));
    assert!(match_one(b"a*(b)c", b"abc", flags));
    assert!(match_one(b"a*(b)c", b"abbbc", flags));
    assert!(!match_one(b"a*(b)c", b"axc", flags));
}

#[test]
fn extglob_plus_one_or_more() {
    let flags = MatchFlags { extglob: true, ..Default::default() };
    assert!(!match_one(b"a+(b)c", b"ac", flags));
    assert!(match_one(b"a+(b)c", b"abc", flags));
    assert!(match_one(b"a+(b)c", b"abbbc", flags));
}

#[test]
fn extglob_opt_zero_or_one() {
    let flags = MatchFlags { extglob: true, ..Default::default() };
    assert!(match_one(b"a?(b)c", b"ac", flags));
    assert!(match_one(b"a?(b)c", b"abc", flags));
    assert!(!match_one(b"a?(b)c", b"abbc", flags));
}

#[test]
fn extglob_disabled_is_literal() {
    // Without the extglob flag, `@(` has no special meaning.
    assert!(!m("*.@(js|ts)", "app.js"));
}

//
//
// Totality: the matcher must never panic or loop on adversarial input
//
//

#[test]
fn adversarial_inputs_never_panic() {
    let flags = MatchFlags { extglob: true, ..Default::default() };
    let patterns: &[&[u8]] = &[
        b"*(*(*(*(*(a)))))",
        b"[",
        b"[!",
        b"[[:bogus:]]",
        b"a**(b|*(c))*d",
        b"!(!(!(!(a))))",
        b"",
    ];
    for p in patterns {
        let _ = match_one(p, b"anything", flags);
        let _ = match_one(p, b"", flags);
    }
}
