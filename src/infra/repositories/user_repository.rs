//! User repository backed by SeaORM.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User, UserChanges, UserField};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User persistence operations.
///
/// Every method may fail with `AppError::Storage`; a missing row on
/// `update` or `delete` is reported as `DbErr::RecordNotFound`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// First user whose `field` equals `value`
    async fn find_first_by(&self, field: UserField, value: &str) -> AppResult<Option<User>>;

    /// Insert a new user
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// All stored users
    async fn find_many(&self) -> AppResult<Vec<User>>;

    /// User by primary key
    async fn find_unique(&self, id: &str) -> AppResult<Option<User>>;

    /// Apply the given column changes to an existing user
    async fn update(&self, id: &str, changes: UserChanges) -> AppResult<User>;

    /// Permanently delete a user
    async fn delete(&self, id: &str) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn record_not_found(id: &str) -> DbErr {
    DbErr::RecordNotFound(format!("user {}", id))
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_first_by(&self, field: UserField, value: &str) -> AppResult<Option<User>> {
        let column = match field {
            UserField::Email => user::Column::Email,
            UserField::Cpf => user::Column::Cpf,
        };

        let result = UserEntity::find()
            .filter(column.eq(value))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(new_user.id),
            name: Set(new_user.name),
            email: Set(new_user.email),
            cpf: Set(new_user.cpf),
            password: Set(new_user.password),
            phone: Set(new_user.phone),
            birth_date: Set(new_user.birth_date),
            cep: Set(new_user.cep),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(User::from(model))
    }

    async fn find_many(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find().all(&self.db).await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn find_unique(&self, id: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id.to_string()).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn update(&self, id: &str, changes: UserChanges) -> AppResult<User> {
        let user = UserEntity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| record_not_found(id))?;

        let mut active: ActiveModel = user.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(cpf) = changes.cpf {
            active.cpf = Set(cpf);
        }
        if let Some(password) = changes.password {
            active.password = Set(password);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(birth_date) = changes.birth_date {
            active.birth_date = Set(Some(birth_date));
        }
        if let Some(cep) = changes.cep {
            active.cep = Set(Some(cep));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(record_not_found(id).into());
        }

        Ok(())
    }
}
