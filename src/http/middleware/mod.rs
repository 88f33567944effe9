//! HTTP middleware.

pub mod redirect;

pub use redirect::{redirect_middleware, RedirectState};
