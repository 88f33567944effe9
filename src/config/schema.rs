//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! redirector. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the redirector.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RedirectorConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where requests that are not redirected are forwarded.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Bounds on pattern compilation and matching.
    pub matching: MatchingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Redirect entries, evaluated in order.
    pub redirects: Vec<RedirectConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Pass-through target for requests no redirect matched.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:3000"). Without one, unmatched
    /// requests get `404 Not Found`.
    pub address: Option<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Pattern matching limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Size limit in bytes for each compiled regex and its lazy DFA.
    pub regex_size_limit: usize,

    /// Requests with a longer `host + path` are passed through unresolved.
    pub max_input_len: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            regex_size_limit: 1024 * 1024,
            max_input_len: 8192,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// A redirect entry.
///
/// Keys keep their camelCase names (`domainPattern`, `statusCode`) so
/// existing redirect lists can be reused unchanged.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RedirectConfig {
    /// Literal host, or a regex matched against `host + path`.
    /// Entries without one are ignored.
    pub domain_pattern: Option<String>,

    /// Base URL for path rules, or the replacement for `pattern` and
    /// grouped domain patterns, or the literal redirect target.
    pub target: Option<String>,

    /// Regex rewriting the path, with `target` as replacement.
    pub pattern: Option<String>,

    /// Status when the entry itself redirects (default 301).
    pub status_code: Option<u16>,

    /// Path rules, tried in order before the entry's own target.
    pub rules: Vec<PathRuleConfig>,
}

/// A path rule within a redirect entry.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PathRuleConfig {
    /// Regex matched against the path only.
    pub pattern: Option<String>,

    /// Absolute `http(s)://` URL or path template (default "/").
    pub replacement: Option<String>,

    /// Status for this rule (default 301).
    pub status_code: Option<u16>,
}
