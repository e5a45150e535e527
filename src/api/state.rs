//! Application state - explicit wiring of services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::{Argon2Hasher, PasswordHasher};
use crate::infra::{Database, UserRepository, UserStore};
use crate::services::{AuthService, Authenticator, UserManager, UserService};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Token issuing and verification
    pub auth_service: Arc<dyn AuthService>,
    /// User lifecycle operations
    pub user_service: Arc<dyn UserService>,
    /// Database handle for health checks; absent when services are injected directly
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Wire the SeaORM repository and Argon2 hasher into both services.
    pub fn from_database(database: Arc<Database>, config: Config) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(UserStore::new(database.get_connection()));
        let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());

        let auth_service = Arc::new(Authenticator::new(users.clone(), hasher.clone(), config));
        let user_service = Arc::new(UserManager::new(users, hasher));

        Self {
            auth_service,
            user_service,
            database: Some(database),
        }
    }

    /// Create application state with manually injected services.
    pub fn new(auth_service: Arc<dyn AuthService>, user_service: Arc<dyn UserService>) -> Self {
        Self {
            auth_service,
            user_service,
            database: None,
        }
    }
}
