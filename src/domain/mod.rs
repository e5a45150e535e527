//! Domain layer - Core business entities and rules
//!
//! Contains the user record and its DTOs, the password hashing seam, and
//! the field validators used at registration.

pub mod password;
pub mod user;
pub mod validation;

pub use password::{Argon2Hasher, PasswordHasher};
pub use user::{CreateUser, NewUser, UpdateUser, User, UserChanges, UserField, UserResponse};

#[cfg(any(test, feature = "test-utils"))]
pub use password::MockPasswordHasher;
