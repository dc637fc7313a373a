use std::sync::OnceLock;

use regex::Regex;
use semver::{Version, VersionReq};

/// How a requested range is compared to an installed version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionCheck {
    /// npm range semantics (`^1.2.0`, `~1.2`, `>=1 <2`, `1.x || 2.x`, ...).
    #[default]
    Semver,
    /// Plain string equality, for trees with non-semver versions.
    Literal,
}

impl VersionCheck {
    pub fn from_disabled(disable_npm_version_check: bool) -> Self {
        if disable_npm_version_check {
            VersionCheck::Literal
        } else {
            VersionCheck::Semver
        }
    }

    /// Does `version` satisfy the requested `range`?
    pub fn matches(self, range: &str, version: &str) -> bool {
        match self {
            VersionCheck::Literal => range == version,
            VersionCheck::Semver => satisfies(range, version),
        }
    }
}

fn satisfies(range: &str, version: &str) -> bool {
    let range = range.trim();
    if range.is_empty() || range == "*" || range == "latest" {
        return true;
    }

    // file:, git+, URLs, dist-tags: anything installed under that name will do
    let Some(alternatives) = parse_npm_range(range) else {
        return true;
    };

    let cleaned = version.trim().trim_start_matches('=').trim_start_matches('v');
    match Version::parse(cleaned) {
        Ok(v) => alternatives.iter().any(|req| req.matches(&v)),
        Err(_) => range == version,
    }
}

fn hyphen_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\S+)\s+-\s+(\S+)$").expect("hyphen range regex is valid")
    })
}

fn spaced_operator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(>=|<=|>|<|=|~|\^)\s+").expect("operator regex is valid")
    })
}

/// Translate an npm range into `semver` requirements, one per `||` alternative.
///
/// Alternatives that are not version ranges are dropped. Returns `None` only
/// when no alternative parses.
pub fn parse_npm_range(range: &str) -> Option<Vec<VersionReq>> {
    let reqs: Vec<VersionReq> = range
        .split("||")
        .filter_map(|alt| parse_alternative(alt.trim()))
        .collect();

    if reqs.is_empty() {
        return None;
    }
    Some(reqs)
}

fn parse_alternative(alt: &str) -> Option<VersionReq> {
    if let Some(caps) = hyphen_re().captures(alt) {
        let req = format!(">={}, <={}", strip_v(&caps[1]), strip_v(&caps[2]));
        return VersionReq::parse(&req).ok();
    }

    let joined = spaced_operator_re().replace_all(alt, "$1");
    let comparators: Vec<String> = joined
        .split_whitespace()
        .map(npm_comparator)
        .filter(|c| c != "*")
        .collect();

    if comparators.is_empty() {
        return Some(VersionReq::STAR);
    }

    VersionReq::parse(&comparators.join(", ")).ok()
}

/// Rewrite a single npm comparator into `semver` crate syntax.
///
/// npm treats a bare version as exact while `semver` treats it as caret, so
/// bare versions get an explicit `=`.
fn npm_comparator(token: &str) -> String {
    let op_len = token
        .find(|c: char| c.is_ascii_alphanumeric() || c == '*')
        .unwrap_or(token.len());
    let (op, rest) = token.split_at(op_len);
    let rest = strip_v(rest);

    let is_wildcard = |part: &str| part == "x" || part == "X" || part == "*";
    if rest.split('.').any(is_wildcard) {
        let parts: Vec<&str> = rest
            .split('.')
            .take_while(|p| !is_wildcard(p))
            .collect();
        if parts.is_empty() {
            return "*".to_string();
        }
        return format!("{}{}.*", op, parts.join("."));
    }

    if op.is_empty() {
        format!("={}", rest)
    } else {
        format!("{}{}", op, rest)
    }
}

fn strip_v(s: &str) -> &str {
    s.strip_prefix('v').unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn semver(range: &str, version: &str) -> bool {
        VersionCheck::Semver.matches(range, version)
    }

    #[test]
    fn test_caret_and_tilde() {
        assert!(semver("^4.17.0", "4.17.21"));
        assert!(!semver("^4.17.0", "5.0.0"));
        assert!(semver("~1.3.8", "1.3.9"));
        assert!(!semver("~1.3.8", "1.4.0"));
    }

    #[test]
    fn test_bare_version_is_exact() {
        assert!(semver("1.20.1", "1.20.1"));
        assert!(!semver("1.20.1", "1.20.2"));
    }

    #[test]
    fn test_space_separated_comparators() {
        assert!(semver(">=1.0.0 <2.0.0", "1.9.9"));
        assert!(!semver(">=1.0.0 <2.0.0", "2.0.0"));
        assert!(semver(">= 1.2.0", "1.5.0"));
    }

    #[test]
    fn test_or_alternatives() {
        assert!(semver("^1.0.0 || ^2.0.0", "2.3.0"));
        assert!(!semver("^1.0.0 || ^2.0.0", "3.0.0"));
    }

    #[test]
    fn test_unparsable_alternative_is_ignored() {
        assert!(semver("^1.0.0 || bogus", "1.4.0"));
        assert!(!semver("^1.0.0 || bogus", "9.9.9"));
        assert_eq!(parse_npm_range("^1.0.0 || bogus").map(|r| r.len()), Some(1));
        assert!(parse_npm_range("bogus || file:../x").is_none());
    }

    #[test]
    fn test_hyphen_range() {
        assert!(semver("1.0.0 - 2.0.0", "1.5.0"));
        assert!(semver("1.0.0 - 2.0.0", "2.0.0"));
        assert!(!semver("1.0.0 - 2.0.0", "2.0.1"));
    }

    #[test]
    fn test_wildcards() {
        assert!(semver("1.x", "1.99.0"));
        assert!(!semver("1.x", "2.0.0"));
        assert!(semver("1.2.X", "1.2.7"));
        assert!(semver("*", "0.0.1"));
        assert!(semver("", "3.1.4"));
        assert!(semver("latest", "3.1.4"));
    }

    #[test]
    fn test_non_semver_ranges_match_any() {
        assert!(semver("file:../local-lib", "0.0.0"));
        assert!(semver("git+https://github.com/user/repo.git#v1", "1.0.0"));
        assert!(semver("github:user/repo", "1.0.0"));
    }

    #[test]
    fn test_literal_mode_compares_strings() {
        assert!(VersionCheck::Literal.matches("1.0.0", "1.0.0"));
        assert!(!VersionCheck::Literal.matches("^1.0.0", "1.0.0"));
        assert_eq!(VersionCheck::from_disabled(true), VersionCheck::Literal);
        assert_eq!(VersionCheck::from_disabled(false), VersionCheck::Semver);
    }
}
