//! User infrastructure module
//!
//! Password hashing with Argon2 and the in-memory and PostgreSQL user
//! directories.

mod password;
mod postgres_repository;
mod repository;

pub use password::{Argon2Hasher, CredentialHasher, HashingError, PasswordConfig};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
