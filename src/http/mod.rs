//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → middleware/redirect.rs (host + path → redirect table)
//!         match    → response.rs (status + Location) → client
//!         no match → server.rs pass-through (upstream or 404)
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::RedirectState;
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
