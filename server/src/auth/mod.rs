//! Authentication
//!
//! Session tokens are issued elsewhere; this module only verifies them and
//! exposes the caller identity to handlers.

mod error;
pub mod jwt;
mod middleware;

pub use error::{AuthError, AuthResult};
pub use middleware::{require_auth, AuthUser};
