//! Domain layer for the user service.
//!
//! This crate provides the core domain building blocks:
//! - Self-validating value objects (email, password, name, identifiers)
//! - The `DomainEvent` trait and the `EventRecorder` capability
//! - The `User` aggregate and its `UserCreated` event
//! - The `UserRepository` contract with an in-memory implementation
//! - The `EmailService` contract with message and attachment types

pub mod email;
pub mod error;
pub mod event;
pub mod user;
pub mod value_object;

pub use email::{DeliveryError, EmailAttachment, EmailMessage, EmailService};
pub use error::{DomainError, ValidationError};
pub use event::{DomainEvent, EventRecorder};
pub use user::{InMemoryUserRepository, User, UserCreated, UserRepository};
pub use value_object::{
    Deleted, EmailAddress, EmailVerified, Password, PasswordHash, UserId, UserName,
};
