//! Command dispatch.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use async_trait::async_trait;
use domain::DomainError;
use futures_util::future::BoxFuture;

use crate::error::BusError;

/// Marker trait for commands: immutable intent-to-act messages with no
/// identity beyond their type and no return value.
pub trait Command: Send + 'static {}

/// Handler for a concrete command type. Exactly one per type.
#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    async fn handle(&self, command: C) -> Result<(), DomainError>;
}

type ErasedHandler =
    Arc<dyn Fn(Box<dyn Any + Send>) -> BoxFuture<'static, Result<(), DomainError>> + Send + Sync>;

/// Builder assembling the command registry at startup.
#[derive(Default)]
pub struct CommandBusBuilder {
    handlers: HashMap<TypeId, ErasedHandler>,
}

impl CommandBusBuilder {
    /// Registers the handler for command type `C`.
    ///
    /// Fails with [`BusError::DuplicateHandler`] if one is already present,
    /// so misconfiguration surfaces at boot rather than per request.
    pub fn register<C, H>(mut self, handler: H) -> Result<Self, BusError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let handler = Arc::new(handler);
        let erased: ErasedHandler = Arc::new(move |boxed| {
            let handler = handler.clone();
            Box::pin(async move {
                match boxed.downcast::<C>() {
                    Ok(command) => handler.handle(*command).await,
                    // unreachable: the registry is keyed by TypeId
                    Err(_) => Err(DomainError::Internal(format!(
                        "command downcast failed for {}",
                        type_name::<C>()
                    ))),
                }
            })
        });

        match self.handlers.entry(TypeId::of::<C>()) {
            Entry::Occupied(_) => Err(BusError::DuplicateHandler {
                message_type: type_name::<C>(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(erased);
                Ok(self)
            }
        }
    }

    /// Finalizes the registry.
    pub fn build(self) -> CommandBus {
        CommandBus {
            handlers: Arc::new(self.handlers),
        }
    }
}

/// Routes each command to its single registered handler.
///
/// Dispatch is synchronous: the caller regains control only after the
/// handler completed or failed.
#[derive(Clone)]
pub struct CommandBus {
    handlers: Arc<HashMap<TypeId, ErasedHandler>>,
}

impl CommandBus {
    pub fn builder() -> CommandBusBuilder {
        CommandBusBuilder::default()
    }

    /// Dispatches a command to its handler. Handler errors propagate
    /// unchanged.
    pub async fn dispatch<C: Command>(&self, command: C) -> Result<(), BusError> {
        let handler =
            self.handlers
                .get(&TypeId::of::<C>())
                .ok_or(BusError::NoHandlerFound {
                    message_type: type_name::<C>(),
                })?;

        tracing::debug!(command = type_name::<C>(), "dispatching command");
        handler(Box::new(command)).await.map_err(BusError::Handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Ping {
        payload: String,
    }

    impl Command for Ping {}

    struct Unregistered;

    impl Command for Unregistered {}

    #[derive(Default)]
    struct RecordingHandler {
        received: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl CommandHandler<Ping> for RecordingHandler {
        async fn handle(&self, command: Ping) -> Result<(), DomainError> {
            self.received.lock().unwrap().push(command.payload);
            Ok(())
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl CommandHandler<Ping> for FailingHandler {
        async fn handle(&self, _command: Ping) -> Result<(), DomainError> {
            Err(DomainError::Conflict("boom".to_string()))
        }
    }

    #[tokio::test]
    async fn dispatch_invokes_handler_exactly_once() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let bus = CommandBus::builder()
            .register(RecordingHandler {
                received: received.clone(),
            })
            .unwrap()
            .build();

        bus.dispatch(Ping {
            payload: "hello".to_string(),
        })
        .await
        .unwrap();

        assert_eq!(*received.lock().unwrap(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn dispatch_without_handler_fails() {
        let bus = CommandBus::builder().build();
        let result = bus.dispatch(Unregistered).await;
        assert!(matches!(result, Err(BusError::NoHandlerFound { .. })));
    }

    #[tokio::test]
    async fn duplicate_registration_fails_at_wiring_time() {
        let result = CommandBus::builder()
            .register(RecordingHandler::default())
            .unwrap()
            .register(FailingHandler);
        assert!(matches!(result, Err(BusError::DuplicateHandler { .. })));
    }

    #[tokio::test]
    async fn handler_error_propagates_unchanged() {
        let bus = CommandBus::builder().register(FailingHandler).unwrap().build();

        let result = bus
            .dispatch(Ping {
                payload: "x".to_string(),
            })
            .await;

        match result {
            Err(BusError::Handler(DomainError::Conflict(msg))) => assert_eq!(msg, "boom"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
