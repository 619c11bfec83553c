use zlob::brace::expand_braces;

fn expand(pattern: &str) -> Vec<String> {
    expand_braces(pattern.as_bytes()).into_iter().map(|v| String::from_utf8(v).unwrap()).collect()
}

//
//
// Basic expansion
//
//

#[test]
fn no_braces_returns_pattern_unchanged() {
    assert_eq!(expand("a/b/c.txt"), vec!["a/b/c.txt"]);
}

#[test]
fn simple_alternatives() {
    assert_eq!(expand("{a,b,c}"), vec!["a", "b", "c"]);
}

#[test]
fn prefix_and_suffix_kept() {
    assert_eq!(expand("src/{a,b}.rs"), vec!["src/a.rs", "src/b.rs"]);
}

#[test]
fn empty_alternative_preserved() {
    assert_eq!(expand("{,x}"), vec!["", "x"]);
}

//
//
// Nesting and multiple groups
//
//

#[test]
fn nested_braces_expand_recursively() {
    let mut got = expand("{a,b{1,2}}");
    got.sort();
    let mut want = vec!["a", "b1", "b2"];
    want.sort();
    assert_eq!(got, want);
}

#[test]
fn multiple_sibling_groups_cross_product() {
    let mut got = expand("{a,b}-{1,2}");
    got.sort();
    let mut want = vec!["a-1", "a-2", "b-1", "b-2"];
    want.sort();
    assert_eq!(got, want);
}

#[test]
fn recursive_plus_brace_scenario() {
    let mut got = expand("{src,lib}/**/*.{c,h}");
    got.sort();
    let mut want = vec!["src/**/*.c", "src/**/*.h", "lib/**/*.c", "lib/**/*.h"];
    want.sort();
    assert_eq!(got, want);
}

//
//
// Malformed / edge cases degrade to literal
//
//

#[test]
fn unbalanced_open_brace_is_literal() {
    assert_eq!(expand("a{b"), vec!["a{b"]);
}

#[test]
fn bracket_expression_does_not_confuse_brace_scanner() {
    // `[{}]` is a bracket expression matching `{` or `}`, not a brace group.
    assert_eq!(expand("a[{}]b"), vec!["a[{}]b"]);
}

#[test]
fn escaped_brace_is_literal() {
    assert_eq!(expand("a\\{b,c\\}"), vec!["a\\{b,c\\}"]);
}
