//! Query dispatch.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use async_trait::async_trait;
use domain::DomainError;
use futures_util::future::BoxFuture;

use crate::error::BusError;

/// Marker trait for queries: immutable intent-to-read messages returning
/// at most one response.
pub trait Query: Send + 'static {
    /// The read-model projection this query produces.
    type Response: Send + 'static;
}

/// Handler for a concrete query type. Exactly one per type; read-only by
/// convention. `Ok(None)` means "not found" and is distinct from a failure.
#[async_trait]
pub trait QueryHandler<Q: Query>: Send + Sync {
    async fn handle(&self, query: Q) -> Result<Option<Q::Response>, DomainError>;
}

type ErasedResponse = Box<dyn Any + Send>;
type ErasedHandler = Arc<
    dyn Fn(Box<dyn Any + Send>) -> BoxFuture<'static, Result<Option<ErasedResponse>, DomainError>>
        + Send
        + Sync,
>;

/// Builder assembling the query registry at startup.
#[derive(Default)]
pub struct QueryBusBuilder {
    handlers: HashMap<TypeId, ErasedHandler>,
}

impl QueryBusBuilder {
    /// Registers the handler for query type `Q`. Fails with
    /// [`BusError::DuplicateHandler`] if one is already present.
    pub fn register<Q, H>(mut self, handler: H) -> Result<Self, BusError>
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        let handler = Arc::new(handler);
        let erased: ErasedHandler = Arc::new(move |boxed| {
            let handler = handler.clone();
            Box::pin(async move {
                match boxed.downcast::<Q>() {
                    Ok(query) => Ok(handler
                        .handle(*query)
                        .await?
                        .map(|response| Box::new(response) as ErasedResponse)),
                    // unreachable: the registry is keyed by TypeId
                    Err(_) => Err(DomainError::Internal(format!(
                        "query downcast failed for {}",
                        type_name::<Q>()
                    ))),
                }
            })
        });

        match self.handlers.entry(TypeId::of::<Q>()) {
            Entry::Occupied(_) => Err(BusError::DuplicateHandler {
                message_type: type_name::<Q>(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(erased);
                Ok(self)
            }
        }
    }

    /// Finalizes the registry.
    pub fn build(self) -> QueryBus {
        QueryBus {
            handlers: Arc::new(self.handlers),
        }
    }
}

/// Routes each query to its single registered handler and returns the
/// optional response.
#[derive(Clone)]
pub struct QueryBus {
    handlers: Arc<HashMap<TypeId, ErasedHandler>>,
}

impl QueryBus {
    pub fn builder() -> QueryBusBuilder {
        QueryBusBuilder::default()
    }

    /// Asks a query. `Ok(None)` reports "not found"; handler errors
    /// propagate unchanged.
    pub async fn ask<Q: Query>(&self, query: Q) -> Result<Option<Q::Response>, BusError> {
        let handler =
            self.handlers
                .get(&TypeId::of::<Q>())
                .ok_or(BusError::NoHandlerFound {
                    message_type: type_name::<Q>(),
                })?;

        tracing::debug!(query = type_name::<Q>(), "asking query");
        match handler(Box::new(query)).await.map_err(BusError::Handler)? {
            Some(response) => match response.downcast::<Q::Response>() {
                Ok(response) => Ok(Some(*response)),
                Err(_) => Err(BusError::Handler(DomainError::Internal(format!(
                    "response downcast failed for {}",
                    type_name::<Q>()
                )))),
            },
            None => Ok(None),
        }
    }
}
