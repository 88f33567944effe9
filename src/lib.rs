//! Domain and path redirect service.
//!
//! Requests are matched against an ordered list of redirect rules; the
//! first match is answered with a redirect, everything else is passed
//! through. The rule engine in [`redirect`] is independent of HTTP.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod redirect;

pub use config::schema::RedirectorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use redirect::{resolve, Redirect, RedirectTable};
