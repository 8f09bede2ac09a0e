//! Sends the account-confirmation email when a user is created.

use std::sync::Arc;

use async_trait::async_trait;
use bus::EventSubscriber;
use domain::{DomainError, DomainEvent, EmailMessage, EmailService, UserCreated};

const SENDER_ADDRESS: &str = "noreply@example.com";
const SENDER_NAME: &str = "User Service";

/// Event subscriber delivering a welcome email to every new user.
///
/// Runs synchronously inside the publish call; under the fail-fast contract
/// a transport failure fails the whole creation request even though the
/// user is already persisted.
pub struct SendUserConfirmationEmail {
    email_service: Arc<dyn EmailService>,
}

impl SendUserConfirmationEmail {
    pub fn new(email_service: Arc<dyn EmailService>) -> Self {
        Self { email_service }
    }

    fn build_message(event: &UserCreated) -> Result<EmailMessage, DomainError> {
        let message = EmailMessage::builder()
            .to(event.email())
            .from(SENDER_ADDRESS)
            .from_name(SENDER_NAME)
            .subject("Welcome - confirm your account")
            .body(welcome_body(event.name()))
            .html(true)
            .build()?;
        Ok(message)
    }
}

#[async_trait]
impl EventSubscriber<UserCreated> for SendUserConfirmationEmail {
    #[tracing::instrument(skip(self, event), fields(user_id = %event.aggregate_id()))]
    async fn handle(&self, event: &UserCreated) -> Result<(), DomainError> {
        let message = Self::build_message(event)?;
        self.email_service.send(&message).await?;

        metrics::counter!("confirmation_emails_sent").increment(1);
        Ok(())
    }
}

fn welcome_body(name: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Welcome</title></head>
<body>
  <h1>Welcome!</h1>
  <p>Hi <strong>{name}</strong>,</p>
  <p>Thanks for signing up. To finish your registration, please confirm
  your account by clicking the button below.</p>
  <p><a href="#">Confirm my account</a></p>
  <p>If you did not request this account, you can safely ignore this
  email.</p>
</body>
</html>"##
    )
}
