//! User service - Lifecycle operations on user records.
//!
//! Validation and hashing policy live here; storage belongs to the
//! repository. Every failure leaves as `InvalidData` (caller-fixable) or
//! `Database` (anything the persistence layer reported).

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{
    MSG_CPF_TAKEN, MSG_CREATE_FAILED, MSG_DATABASE_ERROR, MSG_EMAIL_TAKEN, MSG_INVALID_CPF,
    MSG_INVALID_EMAIL, MSG_INVALID_PASSWORD, MSG_USER_DELETED, MSG_USER_NOT_FOUND,
    PASSWORD_HASH_COST,
};
use crate::domain::validation::{is_valid_cpf, is_valid_email, is_valid_password, normalize_cpf};
use crate::domain::{
    CreateUser, NewUser, PasswordHasher, UpdateUser, User, UserChanges, UserField, UserResponse,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// User lifecycle operations exposed to the transport layer.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Validate, check uniqueness, hash and persist a new user
    async fn create(&self, input: CreateUser) -> AppResult<UserResponse>;

    /// All users exactly as stored, password hashes included
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Single user without its password
    async fn find_by_id(&self, id: &str) -> AppResult<UserResponse>;

    /// Partial update by id; a supplied password is re-hashed
    async fn update(&self, input: UpdateUser) -> AppResult<UserResponse>;

    /// Hard delete; returns a confirmation message
    async fn remove(&self, id: &str) -> AppResult<String>;
}

/// Concrete implementation of UserService.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserManager {
    /// Create a user service over the given persistence and hashing collaborators
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Reject the value if another user already holds it.
    async fn ensure_available(&self, field: UserField, value: &str, taken: &str) -> AppResult<()> {
        let existing = self
            .users
            .find_first_by(field, value)
            .await
            .map_err(database_error(MSG_CREATE_FAILED))?;

        if existing.is_some() {
            tracing::debug!(%field, "Registration rejected, value already registered");
            return Err(AppError::invalid_data(taken));
        }
        Ok(())
    }

    fn hash_password(&self, plain_text: &str) -> AppResult<String> {
        self.hasher.hash(plain_text, PASSWORD_HASH_COST)
    }
}

/// Field checks run before any persistence call, in this order.
fn validate_new_user(input: &CreateUser) -> AppResult<()> {
    if !is_valid_password(&input.password) {
        return Err(AppError::invalid_data(MSG_INVALID_PASSWORD));
    }
    if !is_valid_email(&input.email) {
        return Err(AppError::invalid_data(MSG_INVALID_EMAIL));
    }
    if !is_valid_cpf(&input.cpf) {
        return Err(AppError::invalid_data(MSG_INVALID_CPF));
    }
    Ok(())
}

/// Log the underlying failure and replace it with a database exception.
fn database_error(message: &'static str) -> impl FnOnce(AppError) -> AppError {
    move |err| {
        tracing::error!(error = ?err, "{}", message);
        AppError::database(message)
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create(&self, input: CreateUser) -> AppResult<UserResponse> {
        validate_new_user(&input)?;

        // Stored and compared in canonical form so formatting variants collide.
        let email = input.email.to_lowercase();
        let cpf = normalize_cpf(&input.cpf);

        self.ensure_available(UserField::Email, &email, MSG_EMAIL_TAKEN)
            .await?;
        self.ensure_available(UserField::Cpf, &cpf, MSG_CPF_TAKEN)
            .await?;

        let password = self
            .hash_password(&input.password)
            .map_err(database_error(MSG_CREATE_FAILED))?;

        let new_user = NewUser {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            email,
            cpf,
            password,
            phone: input.phone,
            birth_date: input.birth_date,
            cep: input.cep,
        };

        let user = self
            .users
            .create(new_user)
            .await
            .map_err(database_error(MSG_CREATE_FAILED))?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(UserResponse::from(user))
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        // Records go out as stored; hashes are not stripped here.
        self.users
            .find_many()
            .await
            .map_err(database_error(MSG_DATABASE_ERROR))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<UserResponse> {
        self.users
            .find_unique(id)
            .await
            .map_err(database_error(MSG_DATABASE_ERROR))?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::database(MSG_USER_NOT_FOUND))
    }

    async fn update(&self, input: UpdateUser) -> AppResult<UserResponse> {
        let id = input.id.clone();
        let mut changes = UserChanges::from(input);

        if let Some(plain_text) = changes.password.take() {
            let hashed = self
                .hash_password(&plain_text)
                .map_err(database_error(MSG_DATABASE_ERROR))?;
            changes.password = Some(hashed);
        }

        let user = self
            .users
            .update(&id, changes)
            .await
            .map_err(database_error(MSG_DATABASE_ERROR))?;

        tracing::info!(user_id = %user.id, "User updated");
        Ok(UserResponse::from(user))
    }

    async fn remove(&self, id: &str) -> AppResult<String> {
        self.users
            .delete(id)
            .await
            .map_err(database_error(MSG_USER_NOT_FOUND))?;

        tracing::info!(user_id = %id, "User deleted");
        Ok(MSG_USER_DELETED.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::DbErr;
    use tokio_test::{assert_err, assert_ok};

    use crate::domain::MockPasswordHasher;
    use crate::infra::MockUserRepository;

    const PLAIN: &str = "Abcdef1!";

    fn stored_user(id: &str, password: &str) -> User {
        User {
            id: id.to_string(),
            name: "Maria Silva".to_string(),
            email: "maria@gmail.com".to_string(),
            cpf: "52998224725".to_string(),
            password: password.to_string(),
            phone: None,
            birth_date: None,
            cep: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn valid_input() -> CreateUser {
        CreateUser {
            name: "Maria Silva".to_string(),
            email: "maria@gmail.com".to_string(),
            cpf: "52998224725".to_string(),
            password: PLAIN.to_string(),
            phone: Some("(11) 91234-5678".to_string()),
            birth_date: None,
            cep: Some("01310-100".to_string()),
        }
    }

    fn fake_hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .withf(|_, cost| *cost == PASSWORD_HASH_COST)
            .returning(|plain, _| Ok(format!("hashed:{}", plain)));
        hasher
    }

    fn storage_failure() -> AppError {
        AppError::Storage(DbErr::Custom("connection reset".to_string()))
    }

    fn service(repo: MockUserRepository, hasher: MockPasswordHasher) -> UserManager {
        UserManager::new(Arc::new(repo), Arc::new(hasher))
    }

    fn assert_invalid_data(result: AppResult<UserResponse>, expected: &str) {
        match result {
            Err(AppError::InvalidData(msg)) => assert_eq!(msg, expected),
            other => panic!("expected InvalidData, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_weak_password_makes_no_persistence_call() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_first_by().never();
        repo.expect_create().never();
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().never();

        let input = CreateUser {
            password: "abcdefgh".to_string(),
            ..valid_input()
        };
        let result = service(repo, hasher).create(input).await;

        assert_invalid_data(result, MSG_INVALID_PASSWORD);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_email_domain() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_first_by().never();
        repo.expect_create().never();

        let input = CreateUser {
            email: "maria@unknown.com".to_string(),
            ..valid_input()
        };
        let result = service(repo, MockPasswordHasher::new()).create(input).await;

        assert_invalid_data(result, MSG_INVALID_EMAIL);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_cpf_checksum() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_first_by().never();
        repo.expect_create().never();

        let input = CreateUser {
            cpf: "52998224726".to_string(),
            ..valid_input()
        };
        let result = service(repo, MockPasswordHasher::new()).create(input).await;

        assert_invalid_data(result, MSG_INVALID_CPF);
    }

    #[tokio::test]
    async fn test_create_duplicate_email_makes_no_insert() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_first_by()
            .withf(|field, value| *field == UserField::Email && value == "maria@gmail.com")
            .returning(|_, _| Ok(Some(stored_user("existing", "hash"))));
        repo.expect_create().never();

        let result = service(repo, MockPasswordHasher::new())
            .create(valid_input())
            .await;

        assert_invalid_data(result, MSG_EMAIL_TAKEN);
    }

    #[tokio::test]
    async fn test_create_duplicate_cpf_makes_no_insert() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_first_by()
            .withf(|field, _| *field == UserField::Email)
            .returning(|_, _| Ok(None));
        repo.expect_find_first_by()
            .withf(|field, value| *field == UserField::Cpf && value == "52998224725")
            .returning(|_, _| Ok(Some(stored_user("existing", "hash"))));
        repo.expect_create().never();

        let result = service(repo, MockPasswordHasher::new())
            .create(valid_input())
            .await;

        assert_invalid_data(result, MSG_CPF_TAKEN);
    }

    #[tokio::test]
    async fn test_create_success_hashes_and_strips_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_first_by().returning(|_, _| Ok(None));
        repo.expect_create()
            .times(1)
            .withf(|user| {
                user.password != PLAIN
                    && user.password == format!("hashed:{}", PLAIN)
                    && Uuid::parse_str(&user.id).is_ok()
            })
            .returning(|user| Ok(stored_user(&user.id, &user.password)));

        let result = service(repo, fake_hasher()).create(valid_input()).await;

        let created = assert_ok!(result);
        assert_eq!(created.email, "maria@gmail.com");
        let json = serde_json::to_value(&created).unwrap();
        assert!(json.get("password").is_none());
    }

    #[tokio::test]
    async fn test_create_looks_up_and_stores_canonical_cpf_and_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_first_by()
            .withf(|field, value| *field == UserField::Email && value == "maria@gmail.com")
            .times(1)
            .returning(|_, _| Ok(None));
        repo.expect_find_first_by()
            .withf(|field, value| *field == UserField::Cpf && value == "52998224725")
            .times(1)
            .returning(|_, _| Ok(None));
        repo.expect_create()
            .withf(|user| user.cpf == "52998224725" && user.email == "maria@gmail.com")
            .times(1)
            .returning(|user| {
                let mut stored = stored_user(&user.id, &user.password);
                stored.cpf = user.cpf;
                stored.email = user.email;
                Ok(stored)
            });

        let input = CreateUser {
            email: "Maria@Gmail.com".to_string(),
            cpf: "529.982.247-25".to_string(),
            ..valid_input()
        };
        let created = assert_ok!(service(repo, fake_hasher()).create(input).await);

        assert_eq!(created.cpf, "52998224725");
        assert_eq!(created.email, "maria@gmail.com");
    }

    #[tokio::test]
    async fn test_create_generates_distinct_ids() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_first_by().returning(|_, _| Ok(None));
        repo.expect_create()
            .returning(|user| Ok(stored_user(&user.id, &user.password)));
        let service = service(repo, fake_hasher());

        let first = service.create(valid_input()).await.unwrap();
        let second = service.create(valid_input()).await.unwrap();

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_create_insert_failure_is_database_exception() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_first_by().returning(|_, _| Ok(None));
        repo.expect_create().returning(|_| Err(storage_failure()));

        let result = service(repo, fake_hasher()).create(valid_input()).await;

        match assert_err!(result) {
            AppError::Database(msg) => assert_eq!(msg, MSG_CREATE_FAILED),
            other => panic!("expected Database, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_find_all_returns_raw_records() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_many()
            .returning(|| Ok(vec![stored_user("a", "hash-a"), stored_user("b", "hash-b")]));

        let users = service(repo, MockPasswordHasher::new())
            .find_all()
            .await
            .unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].password, "hash-a");
    }

    #[tokio::test]
    async fn test_find_all_failure_is_database_exception() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_many().returning(|| Err(storage_failure()));

        let result = service(repo, MockPasswordHasher::new()).find_all().await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_find_by_id_strips_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_unique()
            .withf(|id| id == "u1")
            .returning(|id| Ok(Some(stored_user(id, "secret-hash"))));

        let user = service(repo, MockPasswordHasher::new())
            .find_by_id("u1")
            .await
            .unwrap();

        assert_eq!(user.id, "u1");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("secret-hash"));
    }

    #[tokio::test]
    async fn test_find_by_id_missing_is_database_exception() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_unique().returning(|_| Ok(None));

        let result = service(repo, MockPasswordHasher::new())
            .find_by_id("missing")
            .await;

        match result {
            Err(AppError::Database(msg)) => assert_eq!(msg, MSG_USER_NOT_FOUND),
            other => panic!("expected Database, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_rehashes_new_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .times(1)
            .withf(|id, changes| {
                id == "u1"
                    && changes.password.as_deref() == Some("hashed:N3w!Passw0rd")
                    && changes.name.as_deref() == Some("Renamed")
            })
            .returning(|id, changes| {
                let mut user = stored_user(id, "old-hash");
                user.password = changes.password.unwrap_or_default();
                user.name = changes.name.unwrap_or_default();
                Ok(user)
            });

        let input = UpdateUser {
            id: "u1".to_string(),
            name: Some("Renamed".to_string()),
            password: Some("N3w!Passw0rd".to_string()),
            ..Default::default()
        };
        let updated = service(repo, fake_hasher()).update(input).await.unwrap();

        assert_eq!(updated.name, "Renamed");
        let json = serde_json::to_value(&updated).unwrap();
        assert!(json.get("password").is_none());
    }

    #[tokio::test]
    async fn test_update_without_password_skips_hashing() {
        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .withf(|_, changes| changes.password.is_none() && changes.cep.is_some())
            .returning(|id, _| Ok(stored_user(id, "old-hash")));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().never();

        let input = UpdateUser {
            id: "u1".to_string(),
            cep: Some("01310100".to_string()),
            ..Default::default()
        };

        assert!(service(repo, hasher).update(input).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_database_exception() {
        let mut repo = MockUserRepository::new();
        repo.expect_update().returning(|id, _| {
            Err(AppError::Storage(DbErr::RecordNotFound(id.to_string())))
        });

        let input = UpdateUser {
            id: "missing".to_string(),
            ..Default::default()
        };
        let result = service(repo, MockPasswordHasher::new()).update(input).await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_remove_returns_confirmation() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete()
            .withf(|id| id == "u1")
            .times(1)
            .returning(|_| Ok(()));

        let message = service(repo, MockPasswordHasher::new())
            .remove("u1")
            .await
            .unwrap();

        assert_eq!(message, MSG_USER_DELETED);
    }

    #[tokio::test]
    async fn test_remove_nonexistent_is_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().returning(|id| {
            Err(AppError::Storage(DbErr::RecordNotFound(id.to_string())))
        });

        let result = service(repo, MockPasswordHasher::new())
            .remove("missing")
            .await;

        match result {
            Err(AppError::Database(msg)) => assert_eq!(msg, MSG_USER_NOT_FOUND),
            other => panic!("expected Database, got {:?}", other),
        }
    }
}
