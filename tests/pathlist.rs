use zlob::flags::ZlobFlags;
use zlob::match_paths;

fn run(pattern: &str, paths: &[&str], flags: u32) -> Vec<String> {
    let owned: Vec<&[u8]> = paths.iter().map(|s| s.as_bytes()).collect();
    let result = match_paths(pattern.as_bytes(), &owned, ZlobFlags::from(flags), 0);
    result.matches().map(|b| String::from_utf8_lossy(b).into_owned()).collect()
}

//
//
// basic suffix matching
//
//

#[test]
fn suffix_pattern_filters_by_extension() {
    let got = run("*.txt", &["a.txt", "b.log", "c.txt"], 0);
    assert_eq!(got, vec!["a.txt", "c.txt"]);
}

//
//
// extglob, via the ZlobFlags::EXTGLOB bit
//
//

#[test]
fn extglob_alternation_matches_any_branch() {
    let got = run("*.@(js|ts)", &["app.js", "app.ts", "app.zig"], ZlobFlags::EXTGLOB);
    assert_eq!(got, vec!["app.js", "app.ts"]);
}

#[test]
fn extglob_negation_excludes_branch() {
    let got = run("*.!(js)", &["a.js", "a.ts", "a.zig"], ZlobFlags::EXTGLOB);
    assert_eq!(got, vec!["a.ts", "a.zig"]);
}

//
//
// recursive `**` over a flat path list
//
//

#[test]
fn recursive_suffix_matches_at_any_depth() {
    let got = run(
        "**/*.c",
        &["src/main.c", "src/util/helper.c", "include/x.h", "tests/t.c"],
        ZlobFlags::RECURSIVE,
    );
    assert_eq!(got, vec!["src/main.c", "src/util/helper.c", "tests/t.c"]);
}

//
//
// POSIX character class
//
//

#[test]
fn posix_digit_class_matches_single_digit() {
    let got = run("file[[:digit:]].txt", &["file1.txt", "fileA.txt", "file5.txt"], 0);
    assert_eq!(got, vec!["file1.txt", "file5.txt"]);
}

//
//
// leading-period rule
//
//

#[test]
fn period_flag_hides_dotfiles_from_star() {
    let hidden = run("*", &[".hidden", "visible"], ZlobFlags::PERIOD);
    assert_eq!(hidden, vec!["visible"]);

    let both = run("*", &[".hidden", "visible"], 0);
    assert_eq!(both, vec![".hidden", "visible"]);
}

//
//
// Ordering and flags
//
//

#[test]
fn nosort_preserves_encounter_order() {
    let got = run("*.txt", &["c.txt", "a.txt", "b.txt"], ZlobFlags::NOSORT);
    assert_eq!(got, vec!["c.txt", "a.txt", "b.txt"]);
}

#[test]
fn default_sort_is_bytewise_ascending() {
    let got = run("*.txt", &["c.txt", "a.txt", "b.txt"], 0);
    assert_eq!(got, vec!["a.txt", "b.txt", "c.txt"]);
}

#[test]
fn zero_copy_pointers_alias_input() {
    let paths: Vec<&[u8]> = vec![b"only.txt"];
    let result = zlob::match_paths(b"*.txt", &paths, ZlobFlags::from(0), 0);
    let matched = result.get(0).unwrap();
    assert_eq!(matched.as_ptr(), paths[0].as_ptr());
}
