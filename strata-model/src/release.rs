//! Release selection
//!
//! A [`VersionPattern`] is a small deterministic grammar over version
//! strings: literal characters must match exactly, and each `N` wildcard
//! matches a non-empty run of ASCII digits. `vN.N.N-demo` therefore matches
//! `v1.2.3-demo` and captures `[1, 2, 3]`. Keeping the grammar this small
//! makes release selection auditable; there is no backtracking and no
//! general-purpose pattern engine involved.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The `vN.N.N` base pattern used by most runtime environments
pub const VN_N_N: &str = "vN.N.N";

/// Which candidate releases are eligible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseType {
    /// The pattern must consume the candidate exactly
    StableOnly,

    /// A trailing pre-release/build suffix (`-...` or `+...`) is permitted
    AllowPrerelease,
}

/// A literal-plus-digit-wildcard version pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionPattern {
    pattern: String,
}

/// A successful pattern match against one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Digit groups captured by the `N` wildcards, in order
    pub groups: Vec<u64>,

    /// Unconsumed tail of the candidate after the pattern
    pub remainder: String,
}

impl VersionPattern {
    /// Create a pattern, e.g. `vN.N.N-demo`
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Append a literal suffix, e.g. `VersionPattern::new(VN_N_N).suffixed("-demo")`
    pub fn suffixed(&self, suffix: &str) -> Self {
        Self {
            pattern: format!("{}{}", self.pattern, suffix),
        }
    }

    /// The raw pattern string
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Number of `N` wildcards in the pattern
    pub fn wildcard_count(&self) -> usize {
        self.pattern.chars().filter(|c| *c == 'N').count()
    }

    /// Match the pattern against the front of `candidate`.
    ///
    /// Each `N` consumes the longest run of digits at the current position;
    /// every other pattern character must match the candidate literally.
    /// Returns the captured digit groups and the unconsumed remainder, or
    /// `None` when the candidate does not fit.
    pub fn match_prefix(&self, candidate: &str) -> Option<PatternMatch> {
        let bytes = candidate.as_bytes();
        let mut pos = 0;
        let mut groups = Vec::new();

        for pc in self.pattern.chars() {
            if pc == 'N' {
                let start = pos;
                while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                    pos += 1;
                }
                if pos == start {
                    return None;
                }
                let group: u64 = candidate[start..pos].parse().ok()?;
                groups.push(group);
            } else {
                let mut buf = [0u8; 4];
                let encoded = pc.encode_utf8(&mut buf).as_bytes();
                if bytes.len() < pos + encoded.len() || &bytes[pos..pos + encoded.len()] != encoded
                {
                    return None;
                }
                pos += encoded.len();
            }
        }

        Some(PatternMatch {
            groups,
            remainder: candidate[pos..].to_string(),
        })
    }
}

/// Selects the best eligible release among candidate tag/branch names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionPatternReleaseSelector {
    /// Pattern candidates must satisfy
    pub pattern: VersionPattern,

    /// Eligibility filter applied after the pattern match
    pub release_type: ReleaseType,
}

impl VersionPatternReleaseSelector {
    /// Create a selector
    pub fn new(pattern: VersionPattern, release_type: ReleaseType) -> Self {
        Self {
            pattern,
            release_type,
        }
    }

    /// Whether a single candidate is eligible under pattern and release type
    pub fn is_eligible(&self, candidate: &str) -> bool {
        self.eligible_match(candidate).is_some()
    }

    /// Pick the highest eligible release among `candidates`.
    ///
    /// Matches are ordered by their captured digit groups; three-group
    /// patterns order as semantic versions. On equal groups a candidate the
    /// pattern consumes exactly outranks one carrying a trailing suffix,
    /// mirroring how semver ranks a release above its pre-releases. Returns
    /// `None` when nothing matches, which callers treat as "no eligible
    /// release yet" rather than an error.
    pub fn select_best_match<'a, I>(&self, candidates: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut best: Option<(Vec<u64>, bool, &str)> = None;
        for candidate in candidates {
            let Some((groups, exact)) = self.eligible_match(candidate) else {
                continue;
            };
            let better = match &best {
                None => true,
                Some((best_groups, best_exact, _)) => {
                    match compare_groups(&groups, best_groups) {
                        Ordering::Greater => true,
                        Ordering::Equal => exact && !*best_exact,
                        Ordering::Less => false,
                    }
                }
            };
            if better {
                best = Some((groups, exact, candidate));
            }
        }
        best.map(|(_, _, candidate)| candidate.to_string())
    }

    fn eligible_match(&self, candidate: &str) -> Option<(Vec<u64>, bool)> {
        let matched = self.pattern.match_prefix(candidate)?;
        let exact = matched.remainder.is_empty();
        let ok = match self.release_type {
            ReleaseType::StableOnly => exact,
            ReleaseType::AllowPrerelease => {
                exact
                    || matched.remainder.starts_with('-')
                    || matched.remainder.starts_with('+')
            }
        };
        ok.then_some((matched.groups, exact))
    }
}

/// Order two captured group vectors; major.minor.patch groups order as
/// semantic versions, anything else compares numerically left to right.
fn compare_groups(a: &[u64], b: &[u64]) -> Ordering {
    if a.len() == 3 && b.len() == 3 {
        let va = semver::Version::new(a[0], a[1], a[2]);
        let vb = semver::Version::new(b[0], b[1], b[2]);
        va.cmp(&vb)
    } else {
        a.cmp(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_selector(release_type: ReleaseType) -> VersionPatternReleaseSelector {
        VersionPatternReleaseSelector::new(
            VersionPattern::new(VN_N_N).suffixed("-demo"),
            release_type,
        )
    }

    #[test]
    fn test_pattern_matches_demo_tag() {
        let pattern = VersionPattern::new(VN_N_N).suffixed("-demo");
        let matched = pattern.match_prefix("v1.2.3-demo").unwrap();
        assert_eq!(matched.groups, vec![1, 2, 3]);
        assert_eq!(matched.remainder, "");
    }

    #[test]
    fn test_pattern_rejects_wrong_literal() {
        let pattern = VersionPattern::new(VN_N_N).suffixed("-demo");
        assert!(pattern.match_prefix("v1.2.3-prod").is_none());
        assert!(pattern.match_prefix("1.2.3-demo").is_none());
    }

    #[test]
    fn test_wildcard_requires_digits() {
        let pattern = VersionPattern::new(VN_N_N);
        assert!(pattern.match_prefix("v1..3").is_none());
        assert!(pattern.match_prefix("vx.2.3").is_none());
    }

    #[test]
    fn test_wildcard_is_greedy() {
        let pattern = VersionPattern::new(VN_N_N);
        let matched = pattern.match_prefix("v10.234.5").unwrap();
        assert_eq!(matched.groups, vec![10, 234, 5]);
    }

    #[test]
    fn test_stable_only_rejects_trailing_suffix() {
        let selector = demo_selector(ReleaseType::StableOnly);
        assert!(selector.is_eligible("v1.2.3-demo"));
        assert!(!selector.is_eligible("v1.2.3-demo-rc1"));
    }

    #[test]
    fn test_allow_prerelease_accepts_suffix() {
        let selector = demo_selector(ReleaseType::AllowPrerelease);
        assert!(selector.is_eligible("v1.2.3-demo"));
        assert!(selector.is_eligible("v1.2.3-demo-rc1"));
        assert!(selector.is_eligible("v1.2.3-demo+build5"));
        assert!(!selector.is_eligible("v1.2.3-demox"));
    }

    #[test]
    fn test_select_best_match_orders_semantically() {
        let selector = demo_selector(ReleaseType::StableOnly);
        let candidates = vec![
            "v1.2.3-demo",
            "v1.10.0-demo",
            "v1.9.9-demo",
            "v0.99.99-demo",
        ];
        assert_eq!(
            selector.select_best_match(candidates),
            Some("v1.10.0-demo".to_string())
        );
    }

    #[test]
    fn test_select_best_match_ignores_ineligible() {
        let selector = demo_selector(ReleaseType::StableOnly);
        let candidates = vec!["v9.9.9-demo-rc1", "v1.0.0-demo", "main", "v2.0.0"];
        assert_eq!(
            selector.select_best_match(candidates),
            Some("v1.0.0-demo".to_string())
        );
    }

    #[test]
    fn test_group_tie_prefers_exact_match_over_suffix() {
        let selector = demo_selector(ReleaseType::AllowPrerelease);
        // Either input order picks the suffix-free tag.
        assert_eq!(
            selector.select_best_match(vec!["v1.2.3-demo-rc1", "v1.2.3-demo"]),
            Some("v1.2.3-demo".to_string())
        );
        assert_eq!(
            selector.select_best_match(vec!["v1.2.3-demo", "v1.2.3-demo-rc1"]),
            Some("v1.2.3-demo".to_string())
        );
        // Higher groups still win over an exact lower match.
        assert_eq!(
            selector.select_best_match(vec!["v1.2.3-demo", "v1.2.4-demo-rc1"]),
            Some("v1.2.4-demo-rc1".to_string())
        );
    }

    #[test]
    fn test_select_best_match_absent_when_nothing_matches() {
        let selector = demo_selector(ReleaseType::StableOnly);
        assert_eq!(selector.select_best_match(vec!["main", "v1.2-demo"]), None);
        assert_eq!(selector.select_best_match(Vec::<&str>::new()), None);
    }
}
