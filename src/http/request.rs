//! Request handling helpers.
//!
//! # Responsibilities
//! - Generate unique request IDs (UUID v4)
//! - Extract the host and path the redirect rules are matched against
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Hosts are compared without port and in lowercase

use axum::http::{header, uri::Authority, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a fresh UUID v4 for every request lacking an `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The request's host, lowercased and without port.
///
/// Absolute-form and HTTP/2 requests carry it in the URI; everything else
/// in the `Host` header. Requests with neither yield an empty host.
pub fn request_host<B>(request: &Request<B>) -> String {
    if let Some(host) = request.uri().host() {
        return host.to_ascii_lowercase();
    }

    request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.parse::<Authority>().ok())
        .map(|authority| authority.host().to_ascii_lowercase())
        .unwrap_or_default()
}

/// The request ID assigned by the request-id layer, if any.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn with_host(host: &str) -> Request<Body> {
        Request::builder()
            .uri("/path")
            .header("Host", host)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_host_header_normalized() {
        assert_eq!(request_host(&with_host("Old.Example.COM")), "old.example.com");
        assert_eq!(request_host(&with_host("old.example.com:8080")), "old.example.com");
        assert_eq!(request_host(&with_host("[::1]:8080")), "[::1]");
    }

    #[test]
    fn test_absolute_uri_wins_over_header() {
        let request = Request::builder()
            .uri("http://Shop.Old.com:81/x")
            .header("Host", "other.com")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_host(&request), "shop.old.com");
    }

    #[test]
    fn test_missing_host_is_empty() {
        let request = Request::builder().uri("/x").body(Body::empty()).unwrap();
        assert_eq!(request_host(&request), "");
        assert_eq!(request_host(&with_host("bad host")), "");
    }

    #[test]
    fn test_uuid_request_ids_are_unique() {
        let request = Request::builder().body(()).unwrap();
        let mut maker = UuidRequestId;
        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }

    #[test]
    fn test_request_id_lookup() {
        let request = Request::builder()
            .header(X_REQUEST_ID, "abc")
            .body(())
            .unwrap();
        assert_eq!(request_id(&request), "abc");
        assert_eq!(request_id(&Request::new(())), "unknown");
    }
}
