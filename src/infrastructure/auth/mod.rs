//! Authentication infrastructure module
//!
//! JWT token management and the auth service built on top of it.

mod jwt;
mod service;

pub use jwt::{JwtConfig, JwtService, TokenCodec};
pub use service::{AuthService, LoginOutcome};
