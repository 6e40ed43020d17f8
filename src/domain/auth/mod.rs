//! Authentication domain
//!
//! Token claims, token decode failures and the error taxonomy shared by the
//! auth service and the HTTP layer.

mod claims;
mod error;

pub use claims::{DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS, TokenClaims, TokenError};
pub use error::AuthError;
