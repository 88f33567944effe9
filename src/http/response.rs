//! Response construction.
//!
//! # Responsibilities
//! - Turn a resolved [`Redirect`] into a status line plus `Location` header
//! - Refuse redirects that cannot be expressed as a valid HTTP response
//!
//! # Design Decisions
//! - Redirect responses have an empty body
//! - An unusable redirect is reported to the caller, which passes the
//!   request through instead of failing it

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use thiserror::Error;

use crate::redirect::Redirect;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRedirect {
    #[error("status {0} is not a valid HTTP status")]
    Status(u16),

    #[error("location {0:?} is not a valid header value")]
    Location(String),
}

/// Build the redirect response for `redirect`.
pub fn redirect_response(redirect: &Redirect) -> Result<Response, InvalidRedirect> {
    let status = StatusCode::from_u16(redirect.status)
        .ok()
        .filter(|s| s.as_u16() < 600)
        .ok_or(InvalidRedirect::Status(redirect.status))?;
    let location = HeaderValue::from_str(&redirect.location)
        .map_err(|_| InvalidRedirect::Location(redirect.location.clone()))?;

    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response.headers_mut().insert(header::LOCATION, location);
    Ok(response)
}
