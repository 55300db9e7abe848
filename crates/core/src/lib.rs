//! Shared primitives for all Rust crates in Auditrail.

#![forbid(unsafe_code)]

/// Failure categories of the external collaborators.
pub mod errors;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use errors::{SecretError, StoreError};

/// Result type used across Auditrail crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Database credentials could not be resolved.
    #[error("secret resolution failed: {0}")]
    Secret(#[from] SecretError),

    /// The audit record could not be persisted.
    #[error("audit persistence failed: {0}")]
    Store(#[from] StoreError),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns whether the failure came from a dependency that was unreachable
    /// or too slow rather than one that answered with a definite rejection.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Secret(SecretError::Unavailable(_))
                | Self::Store(StoreError::Connection(_) | StoreError::Timeout(_))
        )
    }
}
