use thiserror::Error;

/// Core domain errors
///
/// Returned by the user directory and the migration runner.
/// Absence of a record is never an error; lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Whether the error reports a uniqueness violation
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
