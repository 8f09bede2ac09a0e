//! Application layer for the user service.
//!
//! Services orchestrate one logical unit each: validate inputs through
//! value objects, enforce the uniqueness constraint, mutate the aggregate,
//! persist through the repository, then pull and publish the recorded
//! domain events — strictly in that order.

pub mod confirmation_email;
pub mod create_user;
pub mod email_service;
pub mod get_user;

pub use confirmation_email::SendUserConfirmationEmail;
pub use create_user::{CreateUserCommand, CreateUserCommandHandler, CreateUserService};
pub use email_service::InMemoryEmailService;
pub use get_user::{GetUserQuery, GetUserQueryHandler, GetUserResponse, GetUserService, UserDto};
