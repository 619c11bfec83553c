use std::fs;
use std::path::Path;
use std::sync::Mutex;

use tempfile::TempDir;
use zlob::flags::ZlobFlags;

// `glob()` resolves relative patterns against the process's current
// directory, same as libc's glob(3); tests in this file all swap it
// temporarily, so they must not run concurrently with each other.
static CWD_LOCK: Mutex<()> = Mutex::new(());

fn write_file(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn run(root: &Path, pattern: &str, flags: u32) -> Vec<String> {
    let _guard = CWD_LOCK.lock().unwrap();
    let cwd = std::env::current_dir().unwrap();
    std::env::set_current_dir(root).unwrap();
    let result = zlob::glob(pattern.as_bytes(), ZlobFlags::from(flags), None, None, 0);
    std::env::set_current_dir(cwd).unwrap();
    match result {
        Ok(r) => r.matches().map(|b| String::from_utf8_lossy(b).into_owned()).collect(),
        Err(_) => Vec::new(),
    }
}

//
//
// recursive descent against a real directory tree
//
//

#[test]
fn recursive_descent_finds_nested_files_by_extension() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(root, "src/main.c", b"");
    write_file(root, "src/util/helper.c", b"");
    write_file(root, "include/x.h", b"");
    write_file(root, "tests/t.c", b"");

    let got = run(root, "**/*.c", ZlobFlags::RECURSIVE);
    assert_eq!(got, vec!["src/main.c", "src/util/helper.c", "tests/t.c"]);
}

//
//
// brace + recursive combined
//
//

#[test]
fn brace_and_recursive_descent_combine() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(root, "src/a.c", b"");
    write_file(root, "src/k/b.h", b"");
    write_file(root, "lib/c.c", b"");
    write_file(root, "docs/d.md", b"");
    write_file(root, "other/e.c", b"");

    let got = run(root, "{src,lib}/**/*.{c,h}", ZlobFlags::BRACE | ZlobFlags::RECURSIVE);
    assert_eq!(got, vec!["lib/c.c", "src/a.c", "src/k/b.h"]);
}

//
//
// gitignore pruning
//
//

#[test]
fn gitignore_prunes_ignored_directory_from_recursion() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(root, "src/main.rs", b"");
    write_file(root, "target/debug/app.rs", b"");
    write_file(root, ".gitignore", b"target/\n");

    let got = run(root, "**/*.rs", ZlobFlags::RECURSIVE | ZlobFlags::GITIGNORE);
    assert_eq!(got, vec!["src/main.rs"]);
}

//
//
// no-match + nocheck fallback
//
//

#[test]
fn nocheck_returns_literal_pattern_on_no_match() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(root, "a.txt", b"");

    let got = run(root, "*.xyz", ZlobFlags::NOCHECK);
    assert_eq!(got, vec!["*.xyz"]);
}

#[test]
fn no_match_without_nocheck_is_an_error() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(root, "a.txt", b"");

    let _guard = CWD_LOCK.lock().unwrap();
    let cwd = std::env::current_dir().unwrap();
    std::env::set_current_dir(root).unwrap();
    let result = zlob::glob(b"*.xyz", ZlobFlags::from(0), None, None, 0);
    std::env::set_current_dir(cwd).unwrap();
    assert!(matches!(result, Err(zlob::ZlobError::NoMatch)));
}

//
//
// `**` trailing behavior: includes the directory itself
//
//

#[test]
fn trailing_double_star_includes_directory_itself() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(root, "src/main.rs", b"");

    let got = run(root, "src/**", ZlobFlags::RECURSIVE);
    assert!(got.contains(&"src".to_string()));
    assert!(got.contains(&"src/main.rs".to_string()));
}

//
//
// mark flag appends `/` to directory matches
//
//

#[test]
fn mark_flag_appends_slash_to_directories() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(root, "src/main.rs", b"");

    let got = run(root, "src", ZlobFlags::MARK);
    assert_eq!(got, vec!["src/"]);
}

//
//
// onlydir restricts matches to directories
//
//

#[test]
fn onlydir_excludes_plain_files() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(root, "src/main.rs", b"");
    write_file(root, "readme.txt", b"");

    let got = run(root, "*", ZlobFlags::ONLYDIR);
    assert_eq!(got, vec!["src"]);
}
