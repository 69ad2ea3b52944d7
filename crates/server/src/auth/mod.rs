//! Session handling. Signing in happens elsewhere (an identity provider or
//! the `issue-session` binary); this module only verifies the session
//! cookie and exposes the caller to handlers.

pub mod cookies;
pub mod extractors;
pub mod jwt;
pub mod middleware;

pub use extractors::{CurrentUser, GuestOnly};
pub use jwt::{Claims, SessionKeys};
