//! User domain events.

use std::any::Any;

use chrono::{DateTime, Utc};
use common::Ulid;

use crate::event::DomainEvent;

/// A user account was created.
#[derive(Debug, Clone)]
pub struct UserCreated {
    aggregate_id: Ulid,
    event_id: Ulid,
    occurred_on: DateTime<Utc>,
    email: String,
    name: String,
}

impl UserCreated {
    /// Builds the event with a freshly generated id and timestamp.
    pub fn new(aggregate_id: Ulid, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self::from_parts(aggregate_id, email, name, Ulid::random(), Utc::now())
    }

    /// Rebuilds the event from already-known metadata, e.g. when decoding
    /// a transported representation.
    pub fn from_parts(
        aggregate_id: Ulid,
        email: impl Into<String>,
        name: impl Into<String>,
        event_id: Ulid,
        occurred_on: DateTime<Utc>,
    ) -> Self {
        Self {
            aggregate_id,
            event_id,
            occurred_on,
            email: email.into(),
            name: name.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl DomainEvent for UserCreated {
    fn aggregate_id(&self) -> &Ulid {
        &self.aggregate_id
    }

    fn event_id(&self) -> &Ulid {
        &self.event_id
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        self.occurred_on
    }

    fn event_type(&self) -> &'static str {
        "user.created"
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "email": self.email,
            "name": self.name,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_is_generated_at_construction() {
        let user_id = Ulid::random();
        let event = UserCreated::new(user_id.clone(), "a@example.com", "Alice");

        assert_eq!(event.aggregate_id(), &user_id);
        assert_eq!(event.event_type(), "user.created");
        assert!(Ulid::is_valid(event.event_id().value()));
        assert!(event.occurred_on() <= Utc::now());
    }

    #[test]
    fn from_parts_preserves_metadata() {
        let user_id = Ulid::random();
        let event_id = Ulid::random();
        let at = Utc::now();

        let event =
            UserCreated::from_parts(user_id, "a@example.com", "Alice", event_id.clone(), at);
        assert_eq!(event.event_id(), &event_id);
        assert_eq!(event.occurred_on(), at);
    }

    #[test]
    fn payload_carries_event_fields() {
        let event = UserCreated::new(Ulid::random(), "a@example.com", "Alice");
        let payload = event.to_payload();
        assert_eq!(payload["email"], "a@example.com");
        assert_eq!(payload["name"], "Alice");
    }
}
