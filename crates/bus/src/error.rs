//! Bus error types.

use domain::DomainError;
use thiserror::Error;

/// Errors raised by the buses themselves, plus handler failures passed
/// through unchanged.
#[derive(Debug, Error)]
pub enum BusError {
    /// No handler is registered for the dispatched message type.
    #[error("No handler registered for {message_type}")]
    NoHandlerFound { message_type: &'static str },

    /// A second handler was registered for the same message type.
    /// Raised at wiring time, before any traffic is served.
    #[error("A handler is already registered for {message_type}")]
    DuplicateHandler { message_type: &'static str },

    /// The handler failed; the domain error propagates unchanged.
    #[error(transparent)]
    Handler(#[from] DomainError),
}
