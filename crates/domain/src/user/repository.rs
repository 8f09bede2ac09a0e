//! Persistence contract for the user aggregate.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::user::aggregate::User;
use crate::value_object::{EmailAddress, UserId};

/// Persistence-agnostic repository consumed by the application services.
///
/// No transaction API is exposed; the implementing adapter owns commit
/// semantics.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists the aggregate's current state.
    async fn save(&self, user: &User) -> Result<(), DomainError>;

    /// Looks a user up by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Looks a user up by their unique email.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, DomainError>;

    /// Returns all persisted users.
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;
}
