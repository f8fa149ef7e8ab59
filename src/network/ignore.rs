// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Ignore rules for URLs that must not produce telemetry

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};

/// A single ignore rule
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawIgnoreRule")]
pub enum IgnoreRule {
    /// Matches a URL equal to the string
    Exact(String),
    /// Matches a URL the regex finds a match in
    Pattern(Regex),
}

/// JSON form: a bare string or `{ "pattern": "..." }`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawIgnoreRule {
    Exact(String),
    Pattern { pattern: String },
}

impl TryFrom<RawIgnoreRule> for IgnoreRule {
    type Error = Error;

    fn try_from(raw: RawIgnoreRule) -> Result<Self> {
        match raw {
            RawIgnoreRule::Exact(url) => Ok(IgnoreRule::Exact(url)),
            RawIgnoreRule::Pattern { pattern } => IgnoreRule::pattern(&pattern),
        }
    }
}

impl IgnoreRule {
    /// Create an exact-match rule
    pub fn exact(url: impl Into<String>) -> Self {
        IgnoreRule::Exact(url.into())
    }

    /// Compile a pattern rule
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(IgnoreRule::Pattern(Regex::new(pattern)?))
    }

    /// Test the rule against a URL
    pub fn matches(&self, url: &str) -> bool {
        match self {
            IgnoreRule::Exact(exact) => exact == url,
            IgnoreRule::Pattern(regex) => regex.is_match(url),
        }
    }
}

impl From<Regex> for IgnoreRule {
    fn from(regex: Regex) -> Self {
        IgnoreRule::Pattern(regex)
    }
}

impl fmt::Display for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreRule::Exact(url) => write!(f, "{}", url),
            IgnoreRule::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

/// Decides whether a URL is excluded from observation
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    rules: Arc<Vec<IgnoreRule>>,
}

impl IgnoreMatcher {
    /// Create a matcher over an ordered rule list
    pub fn new(rules: Vec<IgnoreRule>) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    /// Number of configured rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are configured
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule matching the URL, without tracing
    pub fn matching_rule(&self, url: &str) -> Option<&IgnoreRule> {
        if self.rules.is_empty() || url.is_empty() {
            return None;
        }
        self.rules.iter().find(|rule| rule.matches(url))
    }

    /// Check whether the URL should be dropped
    ///
    /// An empty URL is never ignored. Every match emits one debug trace.
    pub fn should_ignore(&self, url: &str) -> bool {
        match self.matching_rule(url) {
            Some(rule) => {
                tracing::debug!(rule = %rule, url = %url, "Request ignored");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    use super::*;

    struct DebugCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for DebugCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::DEBUG {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_debug_traces<F: FnOnce()>(f: F) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(DebugCounter(count.clone()));
        tracing::subscriber::with_default(subscriber, f);
        count.load(Ordering::SeqCst)
    }

    fn matcher() -> IgnoreMatcher {
        IgnoreMatcher::new(vec![
            IgnoreRule::exact("https://example.com/health"),
            IgnoreRule::pattern(r"^https://cdn\.example\.com/").unwrap(),
            IgnoreRule::pattern(r"\.png$").unwrap(),
        ])
    }

    #[test]
    fn test_exact_rules() {
        let m = matcher();
        assert!(m.should_ignore("https://example.com/health"));
        assert!(!m.should_ignore("https://example.com/health?x=1"));
        assert!(!m.should_ignore("https://example.com/api"));
    }

    #[test]
    fn test_pattern_rules() {
        let m = matcher();
        assert!(m.should_ignore("https://cdn.example.com/app.js"));
        assert!(m.should_ignore("https://example.com/logo.png"));
        assert!(!m.should_ignore("https://example.com/logo.png.txt"));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(!matcher().should_ignore(""));
        assert!(!IgnoreMatcher::default().should_ignore("https://example.com/health"));
        assert!(IgnoreMatcher::default().is_empty());
    }

    #[test]
    fn test_first_match_wins() {
        let m = IgnoreMatcher::new(vec![
            IgnoreRule::pattern("example").unwrap(),
            IgnoreRule::exact("https://example.com/"),
        ]);
        let rule = m.matching_rule("https://example.com/").unwrap();
        assert!(matches!(rule, IgnoreRule::Pattern(_)));
    }

    #[test]
    fn test_trace_once_per_match() {
        let m = matcher();

        let hits = count_debug_traces(|| {
            assert!(m.should_ignore("https://cdn.example.com/a.png"));
        });
        assert_eq!(hits, 1);

        let misses = count_debug_traces(|| {
            assert!(!m.should_ignore("https://example.com/api"));
            assert!(!m.should_ignore(""));
        });
        assert_eq!(misses, 0);
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(IgnoreRule::exact("/a").to_string(), "/a");
        assert_eq!(IgnoreRule::pattern("^/b").unwrap().to_string(), "/^/b/");
    }
}
