//! Password hashing utilities using Argon2id

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use serde::Deserialize;
use std::fmt::Debug;
use thiserror::Error;

/// Password hashing errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashingError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    #[error("Stored password verifier is malformed: {0}")]
    MalformedVerifier(String),
}

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    /// Memory cost in KiB (default: 19456 = 19 MiB)
    pub memory_cost_kib: u32,
    /// Iterations (default: 2)
    pub time_cost: u32,
    /// Lanes (default: 1)
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost_kib: Params::DEFAULT_M_COST,
            time_cost: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordConfig {
    fn to_params(self) -> Result<Params, HashingError> {
        Params::new(self.memory_cost_kib, self.time_cost, self.parallelism, None)
            .map_err(|e| HashingError::HashingFailed(e.to_string()))
    }
}

/// One-way salted transform from a plaintext password to a storable verifier
///
/// Both operations are CPU-bound; async callers run them on the blocking pool.
pub trait CredentialHasher: Send + Sync + Debug {
    /// Hash a password into a PHC string with an embedded random salt
    fn hash(&self, plaintext: &str) -> Result<String, HashingError>;

    /// Check a plaintext against a stored verifier
    ///
    /// A mismatch is `Ok(false)`; only a verifier that cannot be parsed is an
    /// error.
    fn verify(&self, verifier: &str, plaintext: &str) -> Result<bool, HashingError>;
}

/// Argon2id-based password hasher
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Create a hasher with the given cost parameters
    pub fn new(config: PasswordConfig) -> Result<Self, HashingError> {
        Ok(Self {
            params: config.to_params()?,
        })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, HashingError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashingError::HashingFailed(e.to_string()))
    }

    fn verify(&self, verifier: &str, plaintext: &str) -> Result<bool, HashingError> {
        let parsed = PasswordHash::new(verifier)
            .map_err(|e| HashingError::MalformedVerifier(e.to_string()))?;

        // Cost parameters are read from the verifier itself, so hashes minted
        // under an older cost setting still verify.
        match self.argon2().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashingError::MalformedVerifier(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_err;

    fn hasher() -> Argon2Hasher {
        Argon2Hasher::new(PasswordConfig {
            memory_cost_kib: 1024,
            time_cost: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("my_secure_password").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&hash, "my_secure_password").unwrap());
        assert!(!hasher.verify(&hash, "wrong_password").unwrap());
    }

    #[test]
    fn test_hash_is_unique() {
        let hasher = hasher();

        let hash1 = hasher.hash("my_secure_password").unwrap();
        let hash2 = hasher.hash("my_secure_password").unwrap();

        // Random salt
        assert_ne!(hash1, hash2);
        assert!(hasher.verify(&hash1, "my_secure_password").unwrap());
        assert!(hasher.verify(&hash2, "my_secure_password").unwrap());
    }

    #[test]
    fn test_verify_malformed_verifier() {
        let hasher = hasher();

        assert!(matches!(
            hasher.verify("invalid_hash_format", "password"),
            Err(HashingError::MalformedVerifier(_))
        ));
        assert_err!(hasher.verify("", "password"));
    }

    #[test]
    fn test_verifies_hash_from_other_cost() {
        let strong = Argon2Hasher::new(PasswordConfig {
            memory_cost_kib: 2048,
            time_cost: 2,
            parallelism: 1,
        })
        .unwrap();
        let hash = strong.hash("secret").unwrap();

        assert!(hasher().verify(&hash, "secret").unwrap());
    }

    #[test]
    fn test_invalid_cost_rejected() {
        let result = Argon2Hasher::new(PasswordConfig {
            memory_cost_kib: 1,
            time_cost: 0,
            parallelism: 1,
        });

        assert!(matches!(result, Err(HashingError::HashingFailed(_))));
    }
}
