//! Event fan-out.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use domain::{DomainError, DomainEvent};
use futures_util::future::BoxFuture;

use crate::error::BusError;

/// Subscriber for a concrete event type. An event type may have zero, one,
/// or many subscribers.
#[async_trait]
pub trait EventSubscriber<E: DomainEvent>: Send + Sync {
    async fn handle(&self, event: &E) -> Result<(), DomainError>;
}

type ErasedSubscriber = Arc<
    dyn for<'a> Fn(&'a dyn DomainEvent) -> BoxFuture<'a, Result<(), DomainError>> + Send + Sync,
>;

/// Builder assembling the subscription registry at startup.
#[derive(Default)]
pub struct EventBusBuilder {
    subscribers: HashMap<TypeId, Vec<ErasedSubscriber>>,
}

impl EventBusBuilder {
    /// Subscribes a handler to event type `E`. Multiple subscribers per
    /// type are allowed; they run in registration order.
    pub fn subscribe<E, S>(mut self, subscriber: S) -> Self
    where
        E: DomainEvent,
        S: EventSubscriber<E> + 'static,
    {
        let subscriber = Arc::new(subscriber);
        let erased: ErasedSubscriber = Arc::new(move |event: &dyn DomainEvent| {
            let subscriber = subscriber.clone();
            Box::pin(async move {
                match event.as_any().downcast_ref::<E>() {
                    Some(event) => subscriber.handle(event).await,
                    // unreachable: the registry is keyed by TypeId
                    None => Err(DomainError::Internal(format!(
                        "event downcast failed for {}",
                        type_name::<E>()
                    ))),
                }
            })
        });

        self.subscribers
            .entry(TypeId::of::<E>())
            .or_default()
            .push(erased);
        self
    }

    /// Finalizes the registry.
    pub fn build(self) -> EventBus {
        EventBus {
            subscribers: Arc::new(self.subscribers),
        }
    }
}

/// Fans each published event out to the subscribers of its concrete type,
/// synchronously, on the calling task.
///
/// Fail-fast: the first subscriber error propagates to the publisher and
/// the remaining subscribers for that publish call do not run. Decoupling
/// side effects from the triggering write would need a durable outbox,
/// which is out of scope here.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<HashMap<TypeId, Vec<ErasedSubscriber>>>,
}

impl EventBus {
    pub fn builder() -> EventBusBuilder {
        EventBusBuilder::default()
    }

    /// Publishes events in order. Publishing zero events is a no-op.
    pub async fn publish(&self, events: &[Arc<dyn DomainEvent>]) -> Result<(), BusError> {
        for event in events {
            let type_id = event.as_any().type_id();
            let subscribers = self.subscribers.get(&type_id).map(Vec::as_slice);

            tracing::debug!(
                event_type = event.event_type(),
                event_id = event.event_id().value(),
                subscribers = subscribers.map_or(0, <[_]>::len),
                "publishing domain event"
            );

            for subscriber in subscribers.unwrap_or(&[]) {
                subscriber(event.as_ref()).await.map_err(BusError::Handler)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::sync::Mutex;

    use chrono::{DateTime, Utc};
    use common::Ulid;

    struct Happened {
        aggregate_id: Ulid,
        event_id: Ulid,
        occurred_on: DateTime<Utc>,
        tag: &'static str,
    }

    impl Happened {
        fn new(tag: &'static str) -> Arc<dyn DomainEvent> {
            Arc::new(Self {
                aggregate_id: Ulid::random(),
                event_id: Ulid::random(),
                occurred_on: Utc::now(),
                tag,
            })
        }
    }

    impl DomainEvent for Happened {
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
            "test.happened"
        }

        fn to_payload(&self) -> serde_json::Value {
            serde_json::json!({ "tag": self.tag })
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl EventSubscriber<Happened> for Recorder {
        async fn handle(&self, event: &Happened) -> Result<(), DomainError> {
            if self.fail {
                return Err(DomainError::Internal("subscriber failed".to_string()));
            }
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.label, event.tag));
            Ok(())
        }
    }

    #[tokio::test]
    async fn publishing_zero_events_is_a_noop() {
        let bus = EventBus::builder().build();
        bus.publish(&[]).await.unwrap();
    }

    #[tokio::test]
    async fn event_without_subscribers_is_dropped() {
        let bus = EventBus::builder().build();
        bus.publish(&[Happened::new("ignored")]).await.unwrap();
    }

    #[tokio::test]
    async fn fan_out_runs_subscribers_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let bus = EventBus::builder()
            .subscribe::<Happened, _>(Recorder {
                label: "first",
                log: log.clone(),
                fail: false,
            })
            .subscribe::<Happened, _>(Recorder {
                label: "second",
                log: log.clone(),
                fail: false,
            })
            .build();

        bus.publish(&[Happened::new("a"), Happened::new("b")])
            .await
            .unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:a", "second:a", "first:b", "second:b"]
        );
    }

    #[tokio::test]
    async fn failing_subscriber_aborts_remaining_fan_out() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let bus = EventBus::builder()
            .subscribe::<Happened, _>(Recorder {
                label: "before",
                log: log.clone(),
                fail: false,
            })
            .subscribe::<Happened, _>(Recorder {
                label: "failing",
                log: log.clone(),
                fail: true,
            })
            .subscribe::<Happened, _>(Recorder {
                label: "after",
                log: log.clone(),
                fail: false,
            })
            .build();

        let result = bus.publish(&[Happened::new("x")]).await;

        assert!(matches!(result, Err(BusError::Handler(_))));
        assert_eq!(*log.lock().unwrap(), vec!["before:x"]);
    }
}
