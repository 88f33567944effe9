//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the redirect layer and pass-through handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Apply configuration reloads to the redirect table
//! - Forward unmatched requests to the upstream, if one is configured

use std::str::FromStr;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri, Version,
    },
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RedirectorConfig;
use crate::http::middleware::{redirect_middleware, RedirectState};
use crate::http::request::{request_id, UuidRequestId};
use crate::lifecycle::shutdown::signalled;

/// Application state injected into the pass-through handler.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Option<Upstream>,
}

/// The application requests are forwarded to when no redirect applies.
#[derive(Clone)]
pub struct Upstream {
    authority: Authority,
    client: Client<HttpConnector, Body>,
}

impl Upstream {
    pub fn new(address: &str) -> Option<Self> {
        let authority = match Authority::from_str(address) {
            Ok(authority) => authority,
            Err(e) => {
                tracing::error!(address, error = %e, "Invalid upstream address");
                return None;
            }
        };

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Some(Self { authority, client })
    }

    async fn forward(&self, request: Request<Body>) -> Response {
        let request_id = request_id(&request).to_string();
        let (mut parts, body) = request.into_parts();

        let mut uri_parts = parts.uri.clone().into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        uri_parts.authority = Some(self.authority.clone());
        if uri_parts.path_and_query.is_none() {
            uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        parts.uri = match Uri::from_parts(uri_parts) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Failed to build upstream URI");
                return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
            }
        };
        parts.version = Version::HTTP_11;

        match self.client.request(Request::from_parts(parts, body)).await {
            Ok(response) => {
                let (parts, body) = response.into_parts();
                Response::from_parts(parts, Body::new(body))
            }
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Upstream error");
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
        }
    }
}

/// HTTP server for the redirector.
pub struct HttpServer {
    router: Router,
    config: RedirectorConfig,
    redirects: RedirectState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RedirectorConfig) -> Self {
        let redirects = RedirectState::from_config(&config);
        let state = AppState {
            upstream: config.upstream.address.as_deref().and_then(Upstream::new),
        };

        tracing::info!(
            rules = redirects.table().len(),
            upstream = config.upstream.address.as_deref().unwrap_or("none"),
            "Redirect table compiled"
        );

        let router = Self::build_router(&config, state, redirects.clone());
        Self {
            router,
            config,
            redirects,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RedirectorConfig, state: AppState, redirects: RedirectState) -> Router {
        Router::new()
            .fallback(passthrough_handler)
            .with_state(state)
            .layer(middleware::from_fn_with_state(redirects, redirect_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configurations received on `config_updates` replace the redirect
    /// table; `shutdown` stops accepting and drains in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RedirectorConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let redirects = self.redirects.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                redirects.apply(&config);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                signalled(shutdown).await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RedirectorConfig {
        &self.config
    }

    /// Handle on the live redirect table.
    pub fn redirects(&self) -> &RedirectState {
        &self.redirects
    }

    /// The fully layered router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Handles requests the redirect layer passed on.
async fn passthrough_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    match &state.upstream {
        Some(upstream) => upstream.forward(request).await,
        None => (StatusCode::NOT_FOUND, "No redirect matched").into_response(),
    }
}
