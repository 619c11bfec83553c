use zlob::gitignore::GitignoreRuleSet;

//
//
// Basic rule matching
//
//

#[test]
fn plain_name_matches_at_any_depth() {
    let set = GitignoreRuleSet::parse("target\n");
    assert!(set.is_ignored("target", true));
    assert!(set.is_ignored("nested/target", true));
    assert!(set.is_ignored("nested/target", false));
}

#[test]
fn anchored_rule_matches_only_at_root() {
    let set = GitignoreRuleSet::parse("/target\n");
    assert!(set.is_ignored("target", true));
    assert!(!set.is_ignored("nested/target", true));
}

#[test]
fn dir_only_rule_does_not_match_a_file() {
    let set = GitignoreRuleSet::parse("build/\n");
    assert!(set.is_ignored("build", true));
    assert!(!set.is_ignored("build", false));
}

#[test]
fn dir_only_rule_matches_strict_ancestor() {
    let set = GitignoreRuleSet::parse("build/\n");
    assert!(set.is_ignored("build/output.rs", false));
}

//
//
// Negation and last-match-wins
//
//

#[test]
fn negation_overrides_prior_match() {
    let set = GitignoreRuleSet::parse("*.log\n!important.log\n");
    assert!(set.is_ignored("debug.log", false));
    assert!(!set.is_ignored("important.log", false));
}

#[test]
fn later_rule_wins_over_earlier_one() {
    let set = GitignoreRuleSet::parse("!keep.txt\nkeep.txt\n");
    assert!(set.is_ignored("keep.txt", false));
}

//
//
// `**` semantics
//
//

#[test]
fn leading_double_star_matches_any_depth() {
    let set = GitignoreRuleSet::parse("**/cache\n");
    assert!(set.is_ignored("cache", true));
    assert!(set.is_ignored("a/b/cache", true));
}

#[test]
fn trailing_double_star_matches_everything_under() {
    let set = GitignoreRuleSet::parse("logs/**\n");
    assert!(set.is_ignored("logs/a.txt", false));
    assert!(set.is_ignored("logs/sub/b.txt", false));
    assert!(!set.is_ignored("logs", true));
}

//
//
// Comments and blank lines
//
//

#[test]
fn comment_and_blank_lines_ignored() {
    let set = GitignoreRuleSet::parse("# comment\n\n*.tmp\n");
    assert!(set.is_ignored("a.tmp", false));
}

#[test]
fn escaped_hash_is_a_literal_pattern() {
    let set = GitignoreRuleSet::parse("\\#notacomment\n");
    assert!(set.is_ignored("#notacomment", false));
}

//
//
// should_skip_directory conservatism, including negation-rule interaction
//
//

#[test]
fn skip_directory_for_plain_ignored_dir() {
    let set = GitignoreRuleSet::parse("target/\n");
    assert!(set.should_skip_directory("target"));
}

#[test]
fn skip_directory_inhibited_by_reaching_negation() {
    let set = GitignoreRuleSet::parse("target/\n!target/keep\n");
    assert!(!set.should_skip_directory("target"));
}

#[test]
fn skip_directory_not_inhibited_by_unrelated_negation() {
    let set = GitignoreRuleSet::parse("target/\n!other/keep\n");
    assert!(set.should_skip_directory("target"));
}
