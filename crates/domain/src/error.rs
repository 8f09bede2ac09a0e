//! Domain error types.

use common::UlidError;
use thiserror::Error;

use crate::email::DeliveryError;

/// Errors raised when a value object rejects its input at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The value is not a syntactically valid email address.
    #[error("Invalid email format: {value}")]
    InvalidEmail { value: String },

    /// The password does not satisfy the strength rules.
    #[error(
        "Password must be between {min} and {max} characters long, contain at least one uppercase letter, contain at least one number, and contain at least one symbol"
    )]
    InvalidPassword { min: usize, max: usize },

    /// The name is outside the allowed length range.
    #[error("Name must be between {min} and {max} characters long")]
    InvalidName { min: usize, max: usize },

    /// The value is not a well-formed identifier.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] UlidError),

    /// An email message was built without any recipient.
    #[error("At least one recipient (to) is required")]
    NoRecipients,

    /// An address in to/cc/bcc is malformed.
    #[error("Invalid email address in '{field}': {value}")]
    InvalidRecipient { field: &'static str, value: String },

    /// An attachment path does not point at a readable file.
    #[error("File does not exist or is not readable: {path}")]
    UnreadableAttachment { path: String },
}

/// Errors that can cross the application-service boundary.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A value object rejected its input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A business invariant was violated, e.g. a duplicate unique key.
    #[error("{0}")]
    Conflict(String),

    /// An external email transport failed.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Anything else. Logged with full context, surfaced opaquely.
    #[error("Internal fault: {0}")]
    Internal(String),
}

impl DomainError {
    /// Builds the conflict raised when a unique email is already taken.
    pub fn duplicate_email(email: &str) -> Self {
        Self::Conflict(format!("User with email \"{email}\" already exists"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_propagates_transparently() {
        let err: DomainError = ValidationError::InvalidEmail {
            value: "nope".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid email format: nope");
    }

    #[test]
    fn duplicate_email_message() {
        let err = DomainError::duplicate_email("a@example.com");
        assert_eq!(
            err.to_string(),
            "User with email \"a@example.com\" already exists"
        );
    }
}
