//! In-memory email transport.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::{DeliveryError, EmailMessage, EmailService};

#[derive(Debug, Default)]
struct State {
    sent: Vec<EmailMessage>,
    fail_next: bool,
}

/// Email transport for tests and the demo server: records every message
/// instead of delivering it, and can be armed to fail once.
#[derive(Clone, Default)]
pub struct InMemoryEmailService {
    state: Arc<RwLock<State>>,
}

impl InMemoryEmailService {
    /// Creates a new transport with an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns copies of all messages sent so far.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.state.read().unwrap().sent.clone()
    }

    /// Returns the number of messages sent so far.
    pub fn sent_count(&self) -> usize {
        self.state.read().unwrap().sent.len()
    }

    /// Arms the transport to fail the next send.
    pub fn fail_next(&self) {
        self.state.write().unwrap().fail_next = true;
    }
}

#[async_trait]
impl EmailService for InMemoryEmailService {
    async fn send(&self, message: &EmailMessage) -> Result<(), DeliveryError> {
        let mut state = self.state.write().unwrap();

        if state.fail_next {
            state.fail_next = false;
            return Err(DeliveryError::Transport(
                "simulated transport failure".to_string(),
            ));
        }

        tracing::info!(
            to = ?message.to(),
            subject = message.subject(),
            "email sent"
        );
        state.sent.push(message.clone());
        Ok(())
    }
}
