//! User aggregate root.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::event::{DomainEvent, EventRecorder};
use crate::user::events::UserCreated;
use crate::value_object::{Deleted, EmailAddress, EmailVerified, PasswordHash, UserId, UserName};

/// User aggregate root.
///
/// The aggregate records the domain events its operations produce but never
/// publishes them itself; the orchestrating application service pulls them
/// after persistence succeeds and hands them to the event bus.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    password: PasswordHash,
    name: UserName,
    is_email_verified: EmailVerified,
    is_deleted: Deleted,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    recorder: EventRecorder,
}

impl User {
    /// Creates a fresh user and records a [`UserCreated`] event.
    ///
    /// New users start unverified and not deleted. Uniqueness of the email
    /// is the caller's concern and must be checked before construction.
    pub fn create(id: UserId, email: EmailAddress, password: PasswordHash, name: UserName) -> Self {
        let now = Utc::now();
        let event = UserCreated::new(id.as_ulid().clone(), email.value(), name.value());

        let mut user = Self {
            id,
            email,
            password,
            name,
            is_email_verified: EmailVerified::not_verified(),
            is_deleted: Deleted::not_deleted(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            recorder: EventRecorder::new(),
        };
        user.record(Arc::new(event));
        user
    }

    /// Appends a domain event to the uncommitted sequence.
    pub fn record(&mut self, event: Arc<dyn DomainEvent>) {
        self.recorder.record(event);
    }

    /// Drains and returns all uncommitted events in recording order.
    pub fn pull_domain_events(&mut self) -> Vec<Arc<dyn DomainEvent>> {
        self.recorder.pull()
    }
}

// Query methods
impl User {
    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &PasswordHash {
        &self.password
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn is_email_verified(&self) -> EmailVerified {
        self.is_email_verified
    }

    pub fn is_deleted(&self) -> Deleted {
        self.is_deleted
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

// Mutations. Every mutation refreshes `updated_at`.
impl User {
    pub fn verify_email(&mut self) {
        self.is_email_verified = EmailVerified::verified();
        self.touch();
    }

    pub fn unverify_email(&mut self) {
        self.is_email_verified = EmailVerified::not_verified();
        self.touch();
    }

    pub fn change_name(&mut self, name: UserName) {
        self.name = name;
        self.touch();
    }

    pub fn change_password(&mut self, password: PasswordHash) {
        self.password = password;
        self.touch();
    }

    pub fn delete(&mut self) {
        self.is_deleted = Deleted::deleted();
        self.deleted_at = Some(Utc::now());
        self.touch();
    }

    pub fn undelete(&mut self) {
        self.is_deleted = Deleted::not_deleted();
        self.deleted_at = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
