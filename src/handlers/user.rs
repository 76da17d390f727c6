use crate::error::{AppError, AppResult};
use crate::models::UserModel;
use crate::response::ApiResponse;
use crate::services::user::UserService;
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub login: String,
    /// Optional display name; defaults to the login when blank
    pub name: Option<String>,
    pub birthday: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    pub id: i32,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub login: String,
    /// Optional display name; defaults to the login when blank
    pub name: Option<String>,
    pub birthday: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub login: String,
    pub name: String,
    pub birthday: NaiveDate,
}

impl From<UserModel> for UserResponse {
    fn from(u: UserModel) -> Self {
        Self {
            id: u.id,
            email: u.email,
            login: u.login,
            name: u.name,
            birthday: u.birthday,
        }
    }
}

fn validate_login(login: &str) -> AppResult<()> {
    if login.chars().any(char::is_whitespace) {
        return Err(AppError::Validation(
            "Login must not contain whitespace".to_string(),
        ));
    }
    Ok(())
}

fn validate_birthday(birthday: NaiveDate) -> AppResult<()> {
    if birthday > chrono::Utc::now().date_naive() {
        return Err(AppError::Validation(
            "Birthday must not be in the future".to_string(),
        ));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "List all users", body = Vec<UserResponse>),
    ),
    tag = "users"
)]
pub async fn list_users(
    Extension(db): Extension<DatabaseConnection>,
) -> AppResult<impl IntoResponse> {
    let service = UserService::new(db);
    let users = service.list().await?;
    let response: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "users"
)]
pub async fn get_user(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = UserService::new(db);
    let user = service.get_by_id(id).await?;

    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 409, description = "Email or login already in use", body = AppError),
    ),
    tag = "users"
)]
pub async fn create_user(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    validate_login(&payload.login)?;
    validate_birthday(payload.birthday)?;

    let service = UserService::new(db);
    let user = service
        .create(
            &payload.email,
            &payload.login,
            payload.name.as_deref(),
            payload.birthday,
        )
        .await?;

    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 404, description = "User not found", body = AppError),
        (status = 409, description = "Email or login already in use", body = AppError),
    ),
    tag = "users"
)]
pub async fn update_user(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    validate_login(&payload.login)?;
    validate_birthday(payload.birthday)?;

    let service = UserService::new(db);
    let user = service
        .update(
            payload.id,
            &payload.email,
            &payload.login,
            payload.name.as_deref(),
            payload.birthday,
        )
        .await?;

    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = String),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "users"
)]
pub async fn delete_user(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = UserService::new(db);
    service.delete(id).await?;

    Ok(ApiResponse::ok("User deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_without_spaces_passes() {
        assert!(validate_login("anton42").is_ok());
    }

    #[test]
    fn login_with_spaces_fails() {
        assert!(validate_login("an ton").is_err());
        assert!(validate_login("anton\t").is_err());
    }

    #[test]
    fn past_birthday_passes() {
        let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        assert!(validate_birthday(date).is_ok());
    }

    #[test]
    fn future_birthday_fails() {
        let date = chrono::Utc::now().date_naive() + chrono::Days::new(1);
        assert!(validate_birthday(date).is_err());
    }
}
