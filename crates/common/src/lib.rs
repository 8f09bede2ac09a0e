//! Shared types for the user service.
//!
//! Currently this is just [`Ulid`], the sortable identifier used for
//! aggregates and domain events across all layers.

pub mod ulid;

pub use ulid::{Ulid, UlidError};
