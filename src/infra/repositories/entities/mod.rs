//! SeaORM entity definitions
//!
//! Database-specific entities, kept separate from the domain models.

pub mod user;

pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
