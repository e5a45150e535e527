//! User handlers.

use std::borrow::Cow;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{delete, get, patch, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::validation::{is_valid_cep, is_valid_date, is_valid_phone_number};
use crate::domain::{CreateUser, UpdateUser, User, UserResponse};
use crate::errors::AppResult;
use crate::types::MessageResponse;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Maria Silva")]
    pub name: String,
    #[schema(example = "maria@gmail.com")]
    pub email: String,
    #[schema(example = "529.982.247-25")]
    pub cpf: String,
    #[schema(example = "Str0ng!Pass", min_length = 8)]
    pub password: String,
    #[validate(custom(function = "validate_phone"))]
    #[schema(example = "+55 (11) 91234-5678")]
    pub phone: Option<String>,
    #[validate(custom(function = "validate_birth_date"))]
    #[schema(example = "12/31/1990")]
    pub birth_date: Option<String>,
    #[validate(custom(function = "validate_cep"))]
    #[schema(example = "01310-100")]
    pub cep: Option<String>,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            cpf: req.cpf,
            password: req.password,
            phone: req.phone,
            birth_date: req.birth_date,
            cep: req.cep,
        }
    }
}

/// Partial user update; only the fields present are changed
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "User id is required"))]
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub email: Option<String>,
    pub cpf: Option<String>,
    pub password: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(custom(function = "validate_birth_date"))]
    pub birth_date: Option<String>,
    #[validate(custom(function = "validate_cep"))]
    pub cep: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            id: req.id,
            name: req.name,
            email: req.email,
            cpf: req.cpf,
            password: req.password,
            phone: req.phone,
            birth_date: req.birth_date,
            cep: req.cep,
        }
    }
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if is_valid_phone_number(phone) {
        Ok(())
    } else {
        Err(rule_error("phone", "Invalid phone number"))
    }
}

fn validate_birth_date(date: &str) -> Result<(), ValidationError> {
    if is_valid_date(date) {
        Ok(())
    } else {
        Err(rule_error("birth_date", "Birth date must be MM/DD/YYYY"))
    }
}

fn validate_cep(cep: &str) -> Result<(), ValidationError> {
    if is_valid_cep(cep) {
        Ok(())
    } else {
        Err(rule_error("cep", "Invalid CEP"))
    }
}

/// User routes. Registration is public; everything else requires a bearer token.
pub fn user_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/all", get(find_all_users))
        .route("/find/:user_id", get(find_user_by_id))
        .route("/update", patch(update_user))
        .route("/delete/:user_id", delete(delete_user))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/create", post(create_user))
        .merge(protected)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/user/create",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid or already registered data"),
        (status = 500, description = "Database exception")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.user_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// List every stored user
#[utoipa::path(
    get,
    path = "/user/all",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Stored user records", body = Vec<User>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Database exception")
    )
)]
pub async fn find_all_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.user_service.find_all().await?;
    Ok(Json(users))
}

/// Fetch a user by id
#[utoipa::path(
    get,
    path = "/user/find/{user_id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Database exception, including unknown id")
    )
)]
pub async fn find_user_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.find_by_id(&user_id).await?;
    Ok(Json(user))
}

/// Partially update a user
#[utoipa::path(
    patch,
    path = "/user/update",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Database exception, including unknown id")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    tracing::info!(caller_id = %caller.id, target_id = %payload.id, "Update requested");
    let user = state.user_service.update(payload.into()).await?;
    Ok(Json(user))
}

/// Permanently delete a user
#[utoipa::path(
    delete,
    path = "/user/delete/{user_id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    tracing::info!(caller_id = %caller.id, target_id = %user_id, "Delete requested");
    let message = state.user_service.remove(&user_id).await?;
    Ok(Json(MessageResponse::new(message)))
}
