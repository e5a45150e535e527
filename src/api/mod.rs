//! API layer - HTTP handlers and middleware
//!
//! Requests pass through an ordered chain: bearer authentication
//! (`auth_middleware`, protected routes only), body validation
//! (`ValidatedJson`), then the handler.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
