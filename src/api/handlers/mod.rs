//! HTTP request handlers, one module per route prefix.

pub mod auth_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use user_handler::user_routes;
