//! Shared in-memory collaborators for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::DbErr;

use user_registry::domain::{NewUser, PasswordHasher, User, UserChanges, UserField};
use user_registry::errors::{AppError, AppResult};
use user_registry::infra::UserRepository;
use user_registry::services::{Authenticator, UserManager};
use user_registry::Config;

pub const JWT_SECRET: &str = "test-secret-key-for-testing-only-32chars";

/// Vec-backed repository; `fail` makes every call report a storage error.
#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
    fail: bool,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn rows(&self) -> Vec<User> {
        self.rows.lock().unwrap().clone()
    }

    fn check(&self) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Storage(DbErr::Custom(
                "connection refused".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_first_by(&self, field: UserField, value: &str) -> AppResult<Option<User>> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|u| match field {
                UserField::Email => u.email == value,
                UserField::Cpf => u.cpf == value,
            })
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == user.email || u.cpf == user.cpf) {
            return Err(AppError::Storage(DbErr::Custom(
                "duplicate key value violates unique constraint".to_string(),
            )));
        }
        let now = Utc::now();
        let stored = User {
            id: user.id,
            name: user.name,
            email: user.email,
            cpf: user.cpf,
            password: user.password,
            phone: user.phone,
            birth_date: user.birth_date,
            cep: user.cep,
            created_at: now,
            updated_at: now,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn find_many(&self) -> AppResult<Vec<User>> {
        self.check()?;
        Ok(self.rows())
    }

    async fn find_unique(&self, id: &str) -> AppResult<Option<User>> {
        self.check()?;
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn update(&self, id: &str, changes: UserChanges) -> AppResult<User> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let user = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::Storage(DbErr::RecordNotFound(id.to_string())))?;

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(cpf) = changes.cpf {
            user.cpf = cpf;
        }
        if let Some(password) = changes.password {
            user.password = password;
        }
        if let Some(phone) = changes.phone {
            user.phone = Some(phone);
        }
        if let Some(birth_date) = changes.birth_date {
            user.birth_date = Some(birth_date);
        }
        if let Some(cep) = changes.cep {
            user.cep = Some(cep);
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        if rows.len() == before {
            return Err(AppError::Storage(DbErr::RecordNotFound(id.to_string())));
        }
        Ok(())
    }
}

/// Reversible stand-in for Argon2 that records the cost it was asked for.
#[derive(Default)]
pub struct TaggingHasher {
    pub costs: Mutex<Vec<u32>>,
}

impl PasswordHasher for TaggingHasher {
    fn hash(&self, plain_text: &str, cost: u32) -> AppResult<String> {
        self.costs.lock().unwrap().push(cost);
        Ok(format!("hashed:{}", plain_text))
    }

    fn verify(&self, plain_text: &str, hash: &str) -> bool {
        hash.strip_prefix("hashed:") == Some(plain_text)
    }
}

pub fn config() -> Config {
    Config::new("postgres://localhost/test", JWT_SECRET).unwrap()
}

pub fn user_manager(users: Arc<InMemoryUsers>, hasher: Arc<TaggingHasher>) -> UserManager {
    UserManager::new(users, hasher)
}

pub fn authenticator(users: Arc<InMemoryUsers>, hasher: Arc<TaggingHasher>) -> Authenticator {
    Authenticator::new(users, hasher, config())
}
