//! In-memory user repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::DomainError;
use crate::user::aggregate::User;
use crate::user::repository::UserRepository;
use crate::value_object::{EmailAddress, UserId};

/// In-memory repository used by tests and the demo server.
///
/// Stores aggregates keyed by id and provides the same interface a database
/// adapter would.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored users.
    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Removes all stored users.
    pub async fn clear(&self) {
        self.users.write().await.clear();
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> Result<(), DomainError> {
        // The stored copy keeps no uncommitted events: publication is the
        // saving service's responsibility, on its own instance.
        let mut stored = user.clone();
        stored.pull_domain_events();

        self.users.write().await.insert(user.id().clone(), stored);
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_object::{Password, PasswordHash, UserName};

    fn sample_user(email: &str) -> User {
        let password = Password::new("Abcdef1!").unwrap();
        User::create(
            UserId::random(),
            EmailAddress::new(email).unwrap(),
            PasswordHash::from_password(&password),
            UserName::new("Alice").unwrap(),
        )
    }

    #[tokio::test]
    async fn save_and_find_by_id() {
        let repo = InMemoryUserRepository::new();
        let user = sample_user("a@example.com");

        repo.save(&user).await.unwrap();

        let found = repo.find_by_id(user.id()).await.unwrap().unwrap();
        assert_eq!(found.id(), user.id());
        assert_eq!(found.email().value(), "a@example.com");
    }

    #[tokio::test]
    async fn find_by_email_matches_exactly() {
        let repo = InMemoryUserRepository::new();
        repo.save(&sample_user("a@example.com")).await.unwrap();
        repo.save(&sample_user("b@example.com")).await.unwrap();

        let email = EmailAddress::new("b@example.com").unwrap();
        let found = repo.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(found.email(), &email);

        let missing = EmailAddress::new("c@example.com").unwrap();
        assert!(repo.find_by_email(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.find_by_id(&UserId::random()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_overwrites_existing_aggregate() {
        let repo = InMemoryUserRepository::new();
        let mut user = sample_user("a@example.com");
        repo.save(&user).await.unwrap();

        user.verify_email();
        repo.save(&user).await.unwrap();

        assert_eq!(repo.count().await, 1);
        let found = repo.find_by_id(user.id()).await.unwrap().unwrap();
        assert!(found.is_email_verified().value());
    }

    #[tokio::test]
    async fn stored_copy_has_no_uncommitted_events() {
        let repo = InMemoryUserRepository::new();
        let user = sample_user("a@example.com");
        repo.save(&user).await.unwrap();

        let mut found = repo.find_by_id(user.id()).await.unwrap().unwrap();
        assert!(found.pull_domain_events().is_empty());
    }
}
