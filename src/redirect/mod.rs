//! Redirect resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path)
//!     → resolver.rs (walk rules in order, first match wins)
//!     → pattern.rs / template.rs (regex match and rewrite)
//!     → Return: Redirect { location, status } or None (pass through)
//!
//! Rule Compilation (at load and reload):
//!     RedirectConfig[]
//!     → Drop entries without domainPattern
//!     → Compile patterns (invalid ones become permanent non-matches)
//!     → Freeze as immutable RedirectTable
//! ```
//!
//! # Design Decisions
//! - No dependency on the HTTP layer; host and path in, redirect out
//! - Configured order is kept as-is
//! - Bad patterns degrade to "no match", never to an error

pub mod pattern;
pub mod resolver;
pub mod rules;
pub mod template;

pub use pattern::{MatchLimits, Pattern};
pub use resolver::{resolve, MatchTier, Redirect};
pub use rules::{RedirectTable, DEFAULT_STATUS};
pub use template::Replacement;
