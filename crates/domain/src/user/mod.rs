//! User aggregate and related types.

pub mod aggregate;
pub mod events;
pub mod memory;
pub mod repository;

pub use aggregate::User;
pub use events::UserCreated;
pub use memory::InMemoryUserRepository;
pub use repository::UserRepository;
