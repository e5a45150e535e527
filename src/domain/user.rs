//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User record as persisted, password hash included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub cpf: String,
    /// Argon2 PHC hash
    pub password: String,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub cep: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns the persistence layer can look a user up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Email,
    Cpf,
}

impl std::fmt::Display for UserField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserField::Email => write!(f, "email"),
            UserField::Cpf => write!(f, "cpf"),
        }
    }
}

/// User creation data transfer object
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUser {
    #[schema(example = "Maria Silva")]
    pub name: String,
    #[schema(example = "maria@gmail.com")]
    pub email: String,
    #[schema(example = "529.982.247-25")]
    pub cpf: String,
    #[schema(example = "Str0ng!Pass", min_length = 8)]
    pub password: String,
    #[schema(example = "+55 (11) 91234-5678")]
    pub phone: Option<String>,
    #[schema(example = "12/31/1990")]
    pub birth_date: Option<String>,
    #[schema(example = "01310-100")]
    pub cep: Option<String>,
}

/// Partial update addressed by `id`; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUser {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub cpf: Option<String>,
    /// Plain text; hashed before it is stored
    pub password: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub cep: Option<String>,
}

/// Fully prepared record handed to the repository for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub password: String,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub cep: Option<String>,
}

/// Column changes handed to the repository; `password` is already hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub cpf: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub cep: Option<String>,
}

impl From<UpdateUser> for UserChanges {
    fn from(update: UpdateUser) -> Self {
        Self {
            name: update.name,
            email: update.email,
            cpf: update.cpf,
            password: update.password,
            phone: update.phone,
            birth_date: update.birth_date,
            cep: update.cep,
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,
    #[schema(example = "Maria Silva")]
    pub name: String,
    #[schema(example = "maria@gmail.com")]
    pub email: String,
    #[schema(example = "52998224725")]
    pub cpf: String,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub cep: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            cpf: user.cpf,
            phone: user.phone,
            birth_date: user.birth_date,
            cep: user.cep,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
