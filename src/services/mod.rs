//! Application services layer - Use cases and business logic.
//!
//! Services depend on the repository and hasher traits, which are passed
//! in explicitly through their constructors.

mod auth_service;
mod user_service;

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use user_service::{UserManager, UserService};
