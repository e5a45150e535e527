//! Repository layer - Data access abstraction
//!
//! The user repository is the persistence seam of the lifecycle
//! operations; `UserStore` backs it with SeaORM.

pub(crate) mod entities;
mod user_repository;

pub use user_repository::{UserRepository, UserStore};

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
