//! User creation: command, service, and command handler.

use std::sync::Arc;

use async_trait::async_trait;
use bus::{BusError, Command, CommandHandler, EventBus};
use domain::{
    DomainError, EmailAddress, Password, PasswordHash, User, UserId, UserName, UserRepository,
};

/// Intent to create a user account. Plain data, no identity beyond its type.
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl Command for CreateUserCommand {}

/// Orchestrates user creation as one logical unit.
pub struct CreateUserService {
    users: Arc<dyn UserRepository>,
    event_bus: EventBus,
}

impl CreateUserService {
    pub fn new(users: Arc<dyn UserRepository>, event_bus: EventBus) -> Self {
        Self { users, event_bus }
    }

    /// Validates inputs, checks email uniqueness, builds and persists the
    /// aggregate, then publishes its recorded events.
    ///
    /// Any failing step aborts the rest. If publication fails after the
    /// save, the write stays durable and the side effect is lost — an
    /// accepted inconsistency window, not silently masked.
    #[tracing::instrument(skip(self, password), fields(email = %email))]
    pub async fn create(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<(), DomainError> {
        let email = EmailAddress::new(email)?;
        let password = Password::new(password)?;
        let name = UserName::new(name)?;

        // Checked before the aggregate is built, so a duplicate costs no
        // identifier or hash computation. The check-then-act window stays
        // open until a storage-level unique constraint closes it.
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::duplicate_email(email.value()));
        }

        let mut user = User::create(
            UserId::random(),
            email,
            PasswordHash::from_password(&password),
            name,
        );

        self.users.save(&user).await?;

        // persist-before-publish: events leave the aggregate only after
        // the write succeeded
        let events = user.pull_domain_events();
        self.event_bus.publish(&events).await.map_err(|err| match err {
            BusError::Handler(domain_err) => domain_err,
            other => DomainError::Internal(other.to_string()),
        })?;

        metrics::counter!("users_created_total").increment(1);
        tracing::info!(user_id = %user.id(), "user created");
        Ok(())
    }
}

/// Adapts [`CreateUserService`] onto the command bus.
pub struct CreateUserCommandHandler {
    service: CreateUserService,
}

impl CreateUserCommandHandler {
    pub fn new(service: CreateUserService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CommandHandler<CreateUserCommand> for CreateUserCommandHandler {
    async fn handle(&self, command: CreateUserCommand) -> Result<(), DomainError> {
        self.service
            .create(&command.email, &command.password, &command.name)
            .await
    }
}
