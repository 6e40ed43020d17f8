//! Auth service: registration, login and token checks

use std::fmt::Debug;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::domain::auth::{AuthError, TokenError};
use crate::domain::user::{
    normalize_email, require_field, User, UserId, UserProfile, UserRepository,
};
use crate::domain::DomainError;
use crate::infrastructure::user::{CredentialHasher, HashingError};

use super::jwt::TokenCodec;

const BEARER_PREFIX: &str = "Bearer ";

/// Successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: String,
    pub username: String,
}

/// Orchestrates the user directory, the credential hasher and the token codec
///
/// Every business rule and every error classification lives here; the HTTP
/// layer only maps `AuthError` to a status.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenCodec>,
}

impl Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("hasher", &self.hasher)
            .field("tokens", &self.tokens)
            .finish()
    }
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenCodec>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Create an account and return a token for it
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        [("username", username), ("email", email), ("password", password)]
            .into_iter()
            .try_for_each(|(name, value)| require_field(name, value))
            .map_err(|_| AuthError::validation("all fields required"))?;

        let email = normalize_email(email);

        let existing = self.users.count_by_email(&email).await.map_err(store_error)?;
        if existing > 0 {
            debug!(email = %email, "Registration rejected: email already registered");
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hash_password(password).await?;

        let now = Utc::now().timestamp();
        let user = User::new(UserId::generate(), username, &email, password_hash, now);

        // A concurrent registration can pass the count check and win the race.
        self.users.insert(&user).await.map_err(|e| {
            if e.is_conflict() {
                AuthError::DuplicateEmail
            } else {
                store_error(e)
            }
        })?;

        info!(user_id = %user.id(), "User registered");

        self.issue_token(user.id(), now)
    }

    /// Check credentials and return a token plus the display name
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::validation("email and password required"));
        }

        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await.map_err(store_error)? else {
            // Same Argon2 work as a real verification, so response time does
            // not reveal whether the account exists.
            let _ = self.hash_password(password).await;
            debug!(email = %email, "Login rejected: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_password(&user, password).await? {
            debug!(user_id = %user.id(), "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(user.id(), Utc::now().timestamp())?;

        Ok(LoginOutcome {
            token,
            username: user.username().to_string(),
        })
    }

    /// Whether a presented token currently decodes; never fails
    pub fn validate(&self, token: &str) -> bool {
        match self.tokens.decode(token, Utc::now().timestamp()) {
            Ok(_) => true,
            Err(e) => {
                debug!(reason = %e, "Token rejected");
                false
            }
        }
    }

    /// Resolve an `Authorization` header value to the caller's profile
    pub async fn identify(&self, authorization: Option<&str>) -> Result<UserProfile, AuthError> {
        let token = authorization
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .ok_or(AuthError::MissingToken)?;

        let claims = self
            .tokens
            .decode(token, Utc::now().timestamp())
            .map_err(|e| {
                debug!(reason = %e, "Bearer token rejected");
                AuthError::InvalidToken
            })?;

        if claims.user_id().is_empty() {
            return Err(AuthError::InvalidToken);
        }

        // A subject that is not a well-formed id cannot name a stored user.
        let Ok(user_id) = UserId::new(claims.user_id()) else {
            return Err(AuthError::UserNotFound);
        };

        self.users
            .find_by_id(&user_id)
            .await
            .map_err(store_error)?
            .map(|user| user.profile())
            .ok_or(AuthError::UserNotFound)
    }

    /// Readiness of the user directory
    pub async fn check_directory(&self) -> Result<(), AuthError> {
        self.users.health_check().await.map_err(store_error)
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    async fn verify_password(&self, user: &User, password: &str) -> Result<bool, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        let verifier = user.password_hash().to_string();
        let password = password.to_string();

        let result = tokio::task::spawn_blocking(move || hasher.verify(&verifier, &password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        match result {
            Ok(matches) => Ok(matches),
            // A corrupt stored verifier must not reveal itself to the caller.
            Err(HashingError::MalformedVerifier(detail)) => {
                error!(user_id = %user.id(), error = %detail, "Stored password verifier is malformed");
                Ok(false)
            }
            Err(e) => Err(AuthError::Hashing(e.to_string())),
        }
    }

    fn issue_token(&self, user_id: &UserId, now: i64) -> Result<String, AuthError> {
        self.tokens.issue(user_id.as_str(), now).map_err(|e| match e {
            TokenError::Signing(detail) => AuthError::TokenIssuance(detail),
            other => AuthError::TokenIssuance(other.to_string()),
        })
    }
}

/// Detail is kept for the server log; the HTTP layer never echoes it.
fn store_error(e: DomainError) -> AuthError {
    AuthError::Store(e.to_string())
}
