//! Configured regular expressions.
//!
//! Patterns come from configuration and are compiled once, when a
//! [`RedirectTable`](super::RedirectTable) is built. A pattern that fails
//! to compile is kept around as a permanently non-matching [`Pattern`]
//! so that bad configuration degrades to pass-through at request time.

use regex::{Regex, RegexBuilder};

use crate::config::schema::MatchingConfig;
use crate::redirect::template::Replacement;

/// Bounds on the regex work done per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLimits {
    /// Upper bound, in bytes, on each compiled program and its lazy DFA.
    pub regex_size_limit: usize,
    /// Requests whose `host + path` is longer than this are not resolved.
    pub max_input_len: usize,
}

impl Default for MatchLimits {
    fn default() -> Self {
        MatchingConfig::default().limits()
    }
}

impl MatchingConfig {
    pub fn limits(&self) -> MatchLimits {
        MatchLimits {
            regex_size_limit: self.regex_size_limit,
            max_input_len: self.max_input_len,
        }
    }
}

/// A compiled pattern, or the memory of one that failed to compile.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Option<Regex>,
}

impl Pattern {
    pub fn compile(source: &str, limits: &MatchLimits) -> Self {
        Self {
            source: source.to_owned(),
            regex: Self::build(source, limits).ok(),
        }
    }

    /// Compiles `source` only to report why it would never match.
    pub fn check(source: &str, limits: &MatchLimits) -> Result<(), regex::Error> {
        Self::build(source, limits).map(|_| ())
    }

    fn build(source: &str, limits: &MatchLimits) -> Result<Regex, regex::Error> {
        RegexBuilder::new(source)
            .size_limit(limits.regex_size_limit)
            .dfa_size_limit(limits.regex_size_limit)
            .build()
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    /// Invalid patterns never match.
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(haystack))
    }

    /// Replaces every match in `haystack`.
    ///
    /// Returns `None` only when the pattern is invalid. A valid pattern
    /// that does not match returns `haystack` unchanged.
    pub fn replace_all(&self, haystack: &str, replacement: &Replacement) -> Option<String> {
        let re = self.regex.as_ref()?;
        Some(re.replace_all(haystack, replacement.expansion()).into_owned())
    }
}
