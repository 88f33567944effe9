//! Compiled redirect rules.
//!
//! # Design Decisions
//! - Compiled once per configuration load, immutable afterwards
//! - Entries without a `domainPattern` are dropped here, never at request time
//! - Configuration order is preserved; nothing is re-sorted

use crate::config::schema::{PathRuleConfig, RedirectConfig};
use crate::redirect::pattern::{MatchLimits, Pattern};
use crate::redirect::template::Replacement;

/// Status used when a rule does not name one.
pub const DEFAULT_STATUS: u16 = 301;

/// Replacement used when a path rule does not name one.
pub const DEFAULT_REPLACEMENT: &str = "/";

/// A redirect entry ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledRedirect {
    /// Position of the entry in the configured list.
    pub(crate) index: usize,
    pub(crate) domain: String,
    pub(crate) domain_regex: Pattern,
    /// The domain pattern contains a `(` and is treated as a rewrite
    /// pattern when it matched as a regex.
    pub(crate) rewrites_host: bool,
    pub(crate) target: Option<String>,
    /// `target` as a replacement string, empty when there is no target.
    pub(crate) target_replacement: Replacement,
    pub(crate) pattern: Option<Pattern>,
    pub(crate) status: u16,
    pub(crate) path_rules: Vec<CompiledPathRule>,
}

#[derive(Debug, Clone)]
pub struct CompiledPathRule {
    pub(crate) pattern: Pattern,
    pub(crate) replacement: Replacement,
    pub(crate) status: u16,
}

impl CompiledRedirect {
    fn compile(index: usize, config: &RedirectConfig, limits: &MatchLimits) -> Option<Self> {
        let domain = config.domain_pattern.as_deref().filter(|d| !d.is_empty())?;

        Some(Self {
            index,
            domain: domain.to_owned(),
            domain_regex: Pattern::compile(domain, limits),
            rewrites_host: domain.contains('('),
            target: config.target.clone(),
            target_replacement: Replacement::parse(config.target.as_deref().unwrap_or_default()),
            pattern: config.pattern.as_deref().map(|p| Pattern::compile(p, limits)),
            status: config.status_code.unwrap_or(DEFAULT_STATUS),
            path_rules: config
                .rules
                .iter()
                .filter_map(|rule| CompiledPathRule::compile(rule, limits))
                .collect(),
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl CompiledPathRule {
    fn compile(config: &PathRuleConfig, limits: &MatchLimits) -> Option<Self> {
        let pattern = config.pattern.as_deref()?;
        Some(Self {
            pattern: Pattern::compile(pattern, limits),
            replacement: Replacement::parse(
                config.replacement.as_deref().unwrap_or(DEFAULT_REPLACEMENT),
            ),
            status: config.status_code.unwrap_or(DEFAULT_STATUS),
        })
    }
}

/// The ordered, compiled redirect configuration.
///
/// Immutable after construction and shared between requests via `Arc`.
#[derive(Debug, Clone, Default)]
pub struct RedirectTable {
    pub(crate) rules: Vec<CompiledRedirect>,
    pub(crate) limits: MatchLimits,
}

impl RedirectTable {
    pub fn compile(configs: &[RedirectConfig], limits: &MatchLimits) -> Self {
        let rules = configs
            .iter()
            .enumerate()
            .filter_map(|(index, config)| CompiledRedirect::compile(index, config, limits))
            .collect();

        Self {
            rules,
            limits: *limits,
        }
    }

    /// Number of usable entries (those with a domain pattern).
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[CompiledRedirect] {
        &self.rules
    }
}
