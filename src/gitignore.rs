//! `.gitignore`-style rule set: parses ignore rules in source order and
//! answers two questions — is this path ignored, and should this directory
//! be pruned from traversal entirely.
//!
//! Matching is generalized to full gitignore anchoring,
//! negation-overrides-last-match, and `**` semantics, reusing the
//! single-component matcher per segment instead of a bespoke two-pointer
//! glob.

use std::path::{Path, PathBuf};

use crate::matcher::{self, MatchFlags};

#[derive(Clone, Debug)]
enum RuleSeg {
    DoubleStar,
    Comp(Vec<u8>),
}

/// One parsed `.gitignore` line.
#[derive(Clone, Debug)]
pub struct GitignoreRule {
    pub text: String,
    pub negated: bool,
    pub dir_only: bool,
    pub anchored: bool,
    pub has_double_star: bool,
    /// Literal prefix of `text` before its first metacharacter, used by the
    /// directory-prune conservatism check.
    literal_prefix: String,
    segments: Vec<RuleSeg>,
}

/// An ordered set of gitignore rules; the last matching rule wins.
#[derive(Clone, Debug, Default)]
pub struct GitignoreRuleSet {
    rules: Vec<GitignoreRule>,
}

impl GitignoreRuleSet {
    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Parse the text content of a `.gitignore` file.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let rules = content.lines().filter_map(parse_line).collect();
        Self { rules }
    }

    /// Combine rule sets from multiple `.gitignore` files found while
    /// walking upward from CWD, outermost first, so closer-to-root rules
    /// are overridden by closer-to-leaf rules (later entries win ties, per
    /// the "last matching rule wins" policy already used within one file).
    #[must_use]
    pub fn merge(sets: Vec<GitignoreRuleSet>) -> Self {
        let mut rules = Vec::new();
        for set in sets {
            rules.extend(set.rules);
        }
        Self { rules }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Is `path` (relative, `/`-separated, no leading `/`) ignored?
    #[must_use]
    pub fn is_ignored(&self, path: &str, is_dir: bool) -> bool {
        let segs: Vec<&[u8]> = split_segments(path);
        if segs.is_empty() {
            return false;
        }

        let mut ignored = false;
        for rule in &self.rules {
            if rule_matches_path(rule, &segs, is_dir) {
                ignored = !rule.negated;
            }
        }
        ignored
    }

    /// Should traversal avoid descending into `dir_path` (relative,
    /// `/`-separated) at all? Conservative: a later negation whose literal
    /// prefix could reach inside `dir_path` inhibits pruning.
    #[must_use]
    pub fn should_skip_directory(&self, dir_path: &str) -> bool {
        let segs: Vec<&[u8]> = split_segments(dir_path);
        if segs.is_empty() {
            return false;
        }

        let mut ignored = false;
        let mut last_match = None;
        for (i, rule) in self.rules.iter().enumerate() {
            if rule_matches_path(rule, &segs, true) {
                ignored = !rule.negated;
                last_match = Some(i);
            }
        }
        if !ignored {
            return false;
        }

        let last_match = last_match.expect("ignored implies some rule matched");
        let later_negation_could_reach_inside = self.rules[last_match + 1..]
            .iter()
            .filter(|r| r.negated)
            .any(|r| could_reach_inside(&r.literal_prefix, dir_path));

        !later_negation_could_reach_inside
    }
}

/// Walk upward from `start_dir` looking for the nearest `.gitignore`,
/// stopping at the filesystem root. Returns the parsed rule set and the
/// directory it was found in, so callers can compute gitignore-root-relative
/// paths. `None` if no `.gitignore` is found.
#[must_use]
pub fn discover(start_dir: &Path) -> Option<(GitignoreRuleSet, PathBuf)> {
    let mut dir = Some(start_dir.to_path_buf());
    while let Some(d) = dir {
        let candidate = d.join(".gitignore");
        if let Ok(content) = std::fs::read_to_string(&candidate) {
            return Some((GitignoreRuleSet::parse(&content), d));
        }
        dir = d.parent().map(Path::to_path_buf);
    }
    None
}

fn split_segments(path: &str) -> Vec<&[u8]> {
    path.trim_matches('/').as_bytes().split(|&b| b == b'/').filter(|s| !s.is_empty()).collect()
}

fn rule_matches_path(rule: &GitignoreRule, path_segs: &[&[u8]], is_dir: bool) -> bool {
    if rule.dir_only {
        // A dir_only rule matches the full path only if it's a directory;
        // it always matches any strict ancestor, since every ancestor of a
        // path is necessarily a directory.
        for end in 1..=path_segs.len() {
            if end == path_segs.len() && !is_dir {
                continue;
            }
            if match_segments(&rule.segments, &path_segs[..end]) {
                return true;
            }
        }
        false
    } else {
        match_segments(&rule.segments, path_segs)
    }
}

fn match_segments(rule: &[RuleSeg], path: &[&[u8]]) -> bool {
    match rule.split_first() {
        None => path.is_empty(),
        // A trailing `/**` matches everything *inside* the directory it
        // follows, not the directory itself, so it must consume at least
        // one path component; `**` everywhere else (leading or interior)
        // may consume zero.
        Some((RuleSeg::DoubleStar, rest)) if rest.is_empty() => {
            !path.is_empty() && (1..=path.len()).any(|k| match_segments(rest, &path[k..]))
        }
        Some((RuleSeg::DoubleStar, rest)) => (0..=path.len()).any(|k| match_segments(rest, &path[k..])),
        Some((RuleSeg::Comp(pat), rest)) => {
            !path.is_empty() && matcher::match_one(pat, path[0], MatchFlags::default()) && match_segments(rest, &path[1..])
        }
    }
}

/// Conservative prune-inhibition test: does `prefix` (a rule's literal
/// prefix, pre-metacharacter) overlap with `dir_path` such that the rule
/// could plausibly match something under `dir_path`? Either side being a
/// prefix of the other counts, a deliberately conservative test (an empty
/// literal prefix — a rule starting with `**` or a bare wildcard — always
/// inhibits pruning).
fn could_reach_inside(prefix: &str, dir_path: &str) -> bool {
    let dir_path = dir_path.trim_matches('/');
    dir_path.starts_with(prefix) || prefix.starts_with(dir_path)
}

fn parse_line(raw: &str) -> Option<GitignoreRule> {
    let line = raw.trim_end();
    if line.is_empty() {
        return None;
    }
    // Full-line comment, unless escaped.
    if line.starts_with('#') {
        return None;
    }

    let mut text = line.to_string();
    let mut negated = false;

    if let Some(rest) = text.strip_prefix("\\!") {
        text = format!("!{rest}");
    } else if let Some(rest) = text.strip_prefix("\\#") {
        text = format!("#{rest}");
    } else if let Some(rest) = text.strip_prefix('!') {
        negated = true;
        text = rest.to_string();
    }

    if text.is_empty() {
        return None;
    }

    let mut dir_only = false;
    if text.ends_with('/') && !text.ends_with("\\/") {
        dir_only = true;
        text.pop();
    }
    if text.is_empty() {
        return None;
    }

    let anchored = text.starts_with('/') || text[..text.len() - 1].contains('/');
    let body = text.strip_prefix('/').unwrap_or(&text).to_string();
    let has_double_star = text.contains("**");

    let mut segments: Vec<RuleSeg> = body
        .split('/')
        .map(|seg| if seg == "**" { RuleSeg::DoubleStar } else { RuleSeg::Comp(seg.as_bytes().to_vec()) })
        .collect();
    if !anchored {
        segments.insert(0, RuleSeg::DoubleStar);
    }

    let literal_prefix = literal_prefix_of(&body);

    Some(GitignoreRule {
        text,
        negated,
        dir_only,
        anchored,
        has_double_star,
        literal_prefix,
        segments,
    })
}

fn literal_prefix_of(body: &str) -> String {
    let bytes = body.as_bytes();
    let end = bytes.iter().position(|&b| matches!(b, b'*' | b'?' | b'[')).unwrap_or(bytes.len());
    body[..end].to_string()
}
