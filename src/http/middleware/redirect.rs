//! Redirect middleware.
//!
//! Resolves every request against the current [`RedirectTable`] and
//! answers with a redirect on a match. Everything else, including
//! redirects that cannot form a valid response, runs the next handler.

use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::config::RedirectorConfig;
use crate::http::request::{request_host, request_id};
use crate::http::response::redirect_response;
use crate::observability::metrics;
use crate::redirect::RedirectTable;

/// Shared, hot-swappable redirect table.
#[derive(Clone)]
pub struct RedirectState {
    table: Arc<ArcSwap<RedirectTable>>,
}

impl RedirectState {
    pub fn new(table: RedirectTable) -> Self {
        metrics::record_rules_loaded(table.len());
        Self {
            table: Arc::new(ArcSwap::from_pointee(table)),
        }
    }

    pub fn from_config(config: &RedirectorConfig) -> Self {
        Self::new(RedirectTable::compile(
            &config.redirects,
            &config.matching.limits(),
        ))
    }

    /// The table in effect right now.
    pub fn table(&self) -> Arc<RedirectTable> {
        self.table.load_full()
    }

    /// Replace the redirect table with one compiled from `config`.
    ///
    /// Only `redirects` and `matching` take effect; listener and upstream
    /// changes need a restart.
    pub fn apply(&self, config: &RedirectorConfig) {
        let table = RedirectTable::compile(&config.redirects, &config.matching.limits());
        let rules = table.len();
        self.table.store(Arc::new(table));

        metrics::record_rules_loaded(rules);
        metrics::record_config_reload(true);
        tracing::info!(rules, "Redirect rules reloaded");
    }
}

pub async fn redirect_middleware(
    State(state): State<RedirectState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let host = request_host(&request);
    let path = request.uri().path();

    let resolved = state.table.load().resolve(&host, path);

    if let Some(redirect) = resolved {
        match redirect_response(&redirect) {
            Ok(response) => {
                tracing::info!(
                    request_id = %request_id(&request),
                    host = %host,
                    path = %path,
                    location = %redirect.location,
                    status = redirect.status,
                    rule = redirect.rule,
                    tier = redirect.tier.as_str(),
                    "Redirecting request"
                );
                metrics::record_redirect(redirect.status, redirect.tier.as_str(), start);
                return response;
            }
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id(&request),
                    rule = redirect.rule,
                    error = %e,
                    "Unusable redirect, passing request through"
                );
            }
        }
    } else {
        tracing::debug!(
            request_id = %request_id(&request),
            host = %host,
            path = %path,
            "No redirect matched"
        );
    }

    metrics::record_passthrough(start);
    next.run(request).await
}
