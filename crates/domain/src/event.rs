//! Domain event contract and the per-aggregate event recorder.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::Ulid;

/// Trait for domain events.
///
/// Domain events are immutable facts, named in past tense. The identifying
/// metadata (`event_id`, `occurred_on`) is assigned exactly once at
/// construction and never mutated.
pub trait DomainEvent: Send + Sync + 'static {
    /// Identifier of the aggregate that produced the event.
    fn aggregate_id(&self) -> &Ulid;

    /// Unique identifier of this event instance.
    fn event_id(&self) -> &Ulid;

    /// When the event occurred.
    fn occurred_on(&self) -> DateTime<Utc>;

    /// Stable event name, used for routing and logging.
    fn event_type(&self) -> &'static str;

    /// Event-specific payload as JSON, for transport-neutral export.
    fn to_payload(&self) -> serde_json::Value;

    /// Upcast used by the event bus for typed fan-out.
    fn as_any(&self) -> &dyn Any;
}

/// Records uncommitted domain events for one aggregate instance.
///
/// Embedded in aggregates by composition; exposes only `record` and `pull`.
/// The sequence is owned exclusively by its aggregate for the duration of
/// one service invocation, so no internal synchronization is needed.
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Vec<Arc<dyn DomainEvent>>,
}

impl EventRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event, preserving insertion order.
    pub fn record(&mut self, event: Arc<dyn DomainEvent>) {
        self.events.push(event);
    }

    /// Drains and returns all recorded events in recording order.
    ///
    /// A second call immediately after returns an empty sequence, giving
    /// at-most-once delivery per service invocation.
    pub fn pull(&mut self) -> Vec<Arc<dyn DomainEvent>> {
        std::mem::take(&mut self.events)
    }

    /// Returns the number of uncommitted events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no events are pending.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl fmt::Debug for EventRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRecorder")
            .field("uncommitted", &self.events.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestEvent {
        aggregate_id: Ulid,
        event_id: Ulid,
        occurred_on: DateTime<Utc>,
        label: &'static str,
    }

    impl TestEvent {
        fn new(label: &'static str) -> Self {
            Self {
                aggregate_id: Ulid::random(),
                event_id: Ulid::random(),
                occurred_on: Utc::now(),
                label,
            }
        }
    }

    impl DomainEvent for TestEvent {
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
            self.label
        }

        fn to_payload(&self) -> serde_json::Value {
            serde_json::json!({ "label": self.label })
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn pull_returns_events_in_recording_order() {
        let mut recorder = EventRecorder::new();
        recorder.record(Arc::new(TestEvent::new("first")));
        recorder.record(Arc::new(TestEvent::new("second")));
        recorder.record(Arc::new(TestEvent::new("third")));

        let events = recorder.pull();
        let labels: Vec<_> = events.iter().map(|e| e.event_type()).collect();
        assert_eq!(labels, vec!["first", "second", "third"]);
    }

    #[test]
    fn second_pull_is_empty() {
        let mut recorder = EventRecorder::new();
        recorder.record(Arc::new(TestEvent::new("only")));

        assert_eq!(recorder.pull().len(), 1);
        assert!(recorder.pull().is_empty());
        assert!(recorder.is_empty());
    }

    #[test]
    fn pull_on_fresh_recorder_is_empty() {
        let mut recorder = EventRecorder::new();
        assert!(recorder.pull().is_empty());
    }
}
