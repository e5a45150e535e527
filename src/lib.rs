//! User registry - user management REST backend.
//!
//! Create, list, fetch, update and delete user records, with Argon2
//! password hashing and Brazilian document, email and password validation.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: `serve` and `migrate` subcommands
//! - **config**: Environment settings and constants
//! - **domain**: User record, DTOs, password hashing, field validators
//! - **services**: User lifecycle operations and authentication
//! - **infra**: SeaORM connection, migrations and the user repository
//! - **api**: HTTP handlers, middleware, routes and OpenAPI docs
//! - **types**: Shared response bodies
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! cargo run -- serve --port 3000
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

pub use api::AppState;
pub use config::Config;
pub use domain::{User, UserResponse};
pub use errors::{AppError, AppResult};
