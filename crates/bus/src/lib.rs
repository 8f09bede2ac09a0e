//! In-process message buses.
//!
//! Three synchronous mediators route messages to statically wired handlers:
//! - [`CommandBus`] — one handler per command type, no return value
//! - [`QueryBus`] — one handler per query type, optional response
//! - [`EventBus`] — fan-out to all subscribers of an event type
//!
//! Registries are assembled once at startup through builders and are
//! immutable afterwards: handler lookup is a pure read of a static mapping,
//! safe for concurrent dispatch without locks. The one-handler-per-command
//! and per-query invariants are enforced at wiring time, not per call.

pub mod command;
pub mod error;
pub mod event;
pub mod query;

pub use command::{Command, CommandBus, CommandBusBuilder, CommandHandler};
pub use error::BusError;
pub use event::{EventBus, EventBusBuilder, EventSubscriber};
pub use query::{Query, QueryBus, QueryBusBuilder, QueryHandler};
