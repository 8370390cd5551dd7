//! Route matching logic.
//!
//! # Design Decisions
//! - Paths are compared literally and case-sensitively
//! - The query string is not part of the match
//! - No prefix or regex matching: `/api/login/extra` does not match `/api/login`

use std::collections::HashSet;

/// Trait for matching request paths against a rule.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path belongs to this rule.
    fn matches(&self, path: &str) -> bool;
}

/// Matches membership in a fixed set of literal paths.
#[derive(Debug, Clone, Default)]
pub struct ExactPathMatcher {
    paths: HashSet<String>,
}

impl ExactPathMatcher {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}

impl Matcher for ExactPathMatcher {
    fn matches(&self, path: &str) -> bool {
        self.paths.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_path_matcher() {
        let matcher = ExactPathMatcher::new(["/api/login", "/api/register"]);

        assert!(matcher.matches("/api/login"));
        assert!(matcher.matches("/api/register"));
        assert!(!matcher.matches("/api/login/"));
        assert!(!matcher.matches("/api/login/extra"));
        assert!(!matcher.matches("/API/LOGIN"));
        assert!(!matcher.matches("/api"));
    }

    #[test]
    fn test_empty_matcher_matches_nothing() {
        let matcher = ExactPathMatcher::default();
        assert!(!matcher.matches("/"));
        assert_eq!(matcher.paths().count(), 0);
    }
}
