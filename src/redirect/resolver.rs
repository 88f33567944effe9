//! Redirect resolution.
//!
//! Rules are tried in configured order and the first one that yields a
//! target wins. Within a rule the tiers are:
//!
//! ```text
//! domain match (regex on host+path, else host == domainPattern)
//!     → path rules         first rule whose pattern matches the path
//!     → top-level pattern  rewrite the path, target is the replacement
//!     → domain rewrite     domainPattern matched and contains '('
//!     → plain target       target verbatim
//! ```
//!
//! A rule that matches the domain but produces nothing in any tier does
//! not stop evaluation.

use serde::Serialize;

use crate::config::schema::RedirectConfig;
use crate::redirect::pattern::MatchLimits;
use crate::redirect::rules::{CompiledRedirect, RedirectTable};

/// Which tier of a rule produced the redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    PathRule,
    Pattern,
    DomainRewrite,
    Target,
}

impl MatchTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PathRule => "path_rule",
            Self::Pattern => "pattern",
            Self::DomainRewrite => "domain_rewrite",
            Self::Target => "target",
        }
    }
}

/// A resolved redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    /// Value for the `Location` header.
    pub location: String,
    pub status: u16,
    /// Index of the matching entry in the configured list.
    pub rule: usize,
    pub tier: MatchTier,
}

impl RedirectTable {
    /// Resolves a request. `None` means the request should pass through.
    pub fn resolve(&self, host: &str, path: &str) -> Option<Redirect> {
        if host.len() + path.len() > self.limits.max_input_len {
            tracing::debug!(
                host_len = host.len(),
                path_len = path.len(),
                "Request too long to resolve"
            );
            return None;
        }

        let host_with_path = format!("{host}{path}");
        self.rules
            .iter()
            .find_map(|rule| rule.resolve(host, path, &host_with_path))
    }
}

/// Compiles `rules` with default limits and resolves a single request.
///
/// Servers should compile a [`RedirectTable`] once instead.
pub fn resolve(host: &str, path: &str, rules: &[RedirectConfig]) -> Option<Redirect> {
    RedirectTable::compile(rules, &MatchLimits::default()).resolve(host, path)
}

impl CompiledRedirect {
    fn resolve(&self, host: &str, path: &str, host_with_path: &str) -> Option<Redirect> {
        let regex_matched = self.domain_regex.is_match(host_with_path);
        if !regex_matched && host != self.domain {
            return None;
        }

        self.match_path_rules(path)
            .or_else(|| self.default_redirect(path, host_with_path, regex_matched))
    }

    fn match_path_rules(&self, path: &str) -> Option<Redirect> {
        let rule = self.path_rules.iter().find(|r| r.pattern.is_match(path))?;
        let rewritten = rule.pattern.replace_all(path, &rule.replacement)?;

        let location = match &self.target {
            _ if rule.replacement.is_absolute_url() => rewritten,
            Some(target) => format!("{}{}", target.trim_end_matches('/'), rewritten),
            None => rewritten,
        };

        Some(self.redirect(location, rule.status, MatchTier::PathRule))
    }

    fn default_redirect(
        &self,
        path: &str,
        host_with_path: &str,
        regex_matched: bool,
    ) -> Option<Redirect> {
        if let Some(pattern) = &self.pattern {
            let location = pattern.replace_all(path, &self.target_replacement)?;
            return Some(self.redirect(location, self.status, MatchTier::Pattern));
        }

        let target = self.target.as_deref()?;
        if regex_matched && self.rewrites_host {
            let location = self
                .domain_regex
                .replace_all(host_with_path, &self.target_replacement)?;
            return Some(self.redirect(location, self.status, MatchTier::DomainRewrite));
        }

        Some(self.redirect(target.to_owned(), self.status, MatchTier::Target))
    }

    fn redirect(&self, location: String, status: u16, tier: MatchTier) -> Redirect {
        Redirect {
            location,
            status,
            rule: self.index,
            tier,
        }
    }
}
