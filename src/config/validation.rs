//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Report redirect entries that can never match
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RedirectorConfig → Result<Vec<ValidationWarning>, Vec<ValidationError>>
//! - Redirect problems are warnings only; a bad entry degrades to
//!   "no match" at request time instead of rejecting the whole file

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{RedirectConfig, RedirectorConfig};
use crate::redirect::pattern::{MatchLimits, Pattern};

/// A problem that rejects the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// A redirect entry that is accepted but can never fire as written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    #[error("redirects[{index}]: missing domainPattern, entry ignored")]
    MissingDomainPattern { index: usize },

    #[error("{location}: invalid pattern '{pattern}' never matches: {reason}")]
    InvalidPattern {
        location: String,
        pattern: String,
        reason: String,
    },

    #[error("{location}: status {status} is not a redirect status")]
    NonRedirectStatus { location: String, status: u16 },

    #[error("redirects[{index}].rules[{rule}]: missing pattern, rule ignored")]
    MissingRulePattern { index: usize, rule: usize },

    #[error("redirects[{index}]: target '{target}' is not a valid URL")]
    InvalidTarget { index: usize, target: String },
}

/// Validates `config`, returning warnings on success.
pub fn validate_config(
    config: &RedirectorConfig,
) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if let Some(address) = &config.upstream.address {
        check_address(&mut errors, "upstream.address", address);
    }
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "timeouts.request_secs",
        });
    }
    if config.matching.regex_size_limit == 0 {
        errors.push(ValidationError::Zero {
            field: "matching.regex_size_limit",
        });
    }
    if config.matching.max_input_len == 0 {
        errors.push(ValidationError::Zero {
            field: "matching.max_input_len",
        });
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let limits = config.matching.limits();
    Ok(config
        .redirects
        .iter()
        .enumerate()
        .flat_map(|(index, redirect)| check_redirect(index, redirect, &limits))
        .collect())
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_redirect(index: usize, redirect: &RedirectConfig, limits: &MatchLimits) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let Some(domain) = redirect.domain_pattern.as_deref().filter(|d| !d.is_empty()) else {
        warnings.push(ValidationWarning::MissingDomainPattern { index });
        return warnings;
    };

    // A domain pattern that does not compile still matches by host equality.
    if domain.contains('(') {
        check_pattern(&mut warnings, format!("redirects[{index}].domainPattern"), domain, limits);
    }
    if let Some(pattern) = &redirect.pattern {
        check_pattern(&mut warnings, format!("redirects[{index}].pattern"), pattern, limits);
    }
    if let Some(status) = redirect.status_code {
        check_status(&mut warnings, format!("redirects[{index}].statusCode"), status);
    }
    if let Some(target) = &redirect.target {
        let absolute = target.starts_with("http://") || target.starts_with("https://");
        if absolute && !target.contains('$') && url::Url::parse(target).is_err() {
            warnings.push(ValidationWarning::InvalidTarget {
                index,
                target: target.clone(),
            });
        }
    }

    for (rule, path_rule) in redirect.rules.iter().enumerate() {
        let Some(pattern) = &path_rule.pattern else {
            warnings.push(ValidationWarning::MissingRulePattern { index, rule });
            continue;
        };
        check_pattern(
            &mut warnings,
            format!("redirects[{index}].rules[{rule}].pattern"),
            pattern,
            limits,
        );
        if let Some(status) = path_rule.status_code {
            check_status(
                &mut warnings,
                format!("redirects[{index}].rules[{rule}].statusCode"),
                status,
            );
        }
    }

    warnings
}

fn check_pattern(warnings: &mut Vec<ValidationWarning>, location: String, pattern: &str, limits: &MatchLimits) {
    if let Err(e) = Pattern::check(pattern, limits) {
        warnings.push(ValidationWarning::InvalidPattern {
            location,
            pattern: pattern.to_string(),
            reason: e.to_string().lines().last().unwrap_or_default().trim().to_string(),
        });
    }
}

fn check_status(warnings: &mut Vec<ValidationWarning>, location: String, status: u16) {
    if !(300..=399).contains(&status) {
        warnings.push(ValidationWarning::NonRedirectStatus { location, status });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::PathRuleConfig;

    fn redirect(domain: &str) -> RedirectConfig {
        RedirectConfig {
            domain_pattern: Some(domain.into()),
            target: Some("https://new.example.com".into()),
            ..RedirectConfig::default()
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&RedirectorConfig::default()), Ok(vec![]));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RedirectorConfig::default();
        config.listener.bind_address = "nope".into();
        config.upstream.address = Some("localhost".into());
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::Zero {
            field: "timeouts.request_secs"
        }));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = RedirectorConfig::default();
        config.observability.metrics_address = "bad".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_redirect_problems_are_warnings() {
        let mut config = RedirectorConfig::default();
        config.redirects.push(RedirectConfig::default());

        let mut bad = redirect("(unclosed");
        bad.status_code = Some(200);
        bad.rules.push(PathRuleConfig::default());
        bad.rules.push(PathRuleConfig {
            pattern: Some("[".into()),
            status_code: Some(302),
            ..PathRuleConfig::default()
        });
        config.redirects.push(bad);
        config.redirects.push(redirect("fine.example.com"));

        let warnings = validate_config(&config).unwrap();
        assert_eq!(warnings.len(), 5);
        assert_eq!(warnings[0], ValidationWarning::MissingDomainPattern { index: 0 });
        assert!(matches!(
            &warnings[1],
            ValidationWarning::InvalidPattern { location, .. } if location == "redirects[1].domainPattern"
        ));
        assert_eq!(
            warnings[2],
            ValidationWarning::NonRedirectStatus {
                location: "redirects[1].statusCode".into(),
                status: 200
            }
        );
        assert_eq!(warnings[3], ValidationWarning::MissingRulePattern { index: 1, rule: 0 });
        assert!(matches!(
            &warnings[4],
            ValidationWarning::InvalidPattern { location, .. } if location == "redirects[1].rules[1].pattern"
        ));
    }

    #[test]
    fn test_literal_domain_with_regex_chars_is_not_flagged() {
        let mut config = RedirectorConfig::default();
        config.redirects.push(redirect("*.example.com"));

        assert_eq!(validate_config(&config), Ok(vec![]));
    }

    #[test]
    fn test_invalid_absolute_target_warns() {
        let mut config = RedirectorConfig::default();
        let mut entry = redirect("old.example.com");
        entry.target = Some("https://exa mple.com".into());
        config.redirects.push(entry);

        let warnings = validate_config(&config).unwrap();
        assert!(matches!(warnings[0], ValidationWarning::InvalidTarget { index: 0, .. }));
    }
}
