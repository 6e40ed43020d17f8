//! User domain
//!
//! This module provides domain types and traits for user accounts,
//! including the user entity, validation, and the directory trait.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId, UserProfile};
pub use repository::UserRepository;
pub use validation::{
    USER_ID_BYTES, UserValidationError, normalize_email, require_field, validate_user_id,
};

#[cfg(test)]
pub use repository::MockUserRepository;
