//! Token claims and decode failures

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default token lifetime: 24 hours
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Longest accepted token lifetime: 365 days
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * DEFAULT_TOKEN_TTL_SECS;

/// Claims carried by an issued bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (epoch seconds)
    pub iat: i64,
    /// Expiration (epoch seconds)
    pub exp: i64,
}

impl TokenClaims {
    /// Build claims for a subject issued at `now`
    pub fn new(sub: impl Into<String>, now: i64, ttl_secs: u64) -> Self {
        Self {
            sub: sub.into(),
            iat: now,
            exp: now.saturating_add(i64::try_from(ttl_secs).unwrap_or(i64::MAX)),
        }
    }

    /// A token is live strictly before its expiry second
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }

    /// Get user ID from claims
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// Reasons a presented token is rejected, in the order they are checked
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token claims are malformed: {0}")]
    MalformedClaims(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),
}
