use crate::error::{AppError, AppResult};
use crate::models::DirectorModel;
use crate::response::ApiResponse;
use crate::services::director::DirectorService;
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDirectorRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDirectorRequest {
    pub id: i32,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DirectorResponse {
    pub id: i32,
    pub name: String,
}

impl From<DirectorModel> for DirectorResponse {
    fn from(d: DirectorModel) -> Self {
        Self {
            id: d.id,
            name: d.name,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/directors",
    responses(
        (status = 200, description = "List all directors", body = Vec<DirectorResponse>),
    ),
    tag = "directors"
)]
pub async fn list_directors(
    Extension(db): Extension<DatabaseConnection>,
) -> AppResult<impl IntoResponse> {
    let service = DirectorService::new(db);
    let directors = service.list().await?;
    let response: Vec<DirectorResponse> = directors
        .into_iter()
        .map(DirectorResponse::from)
        .collect();

    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/directors/{id}",
    params(("id" = i32, Path, description = "Director ID")),
    responses(
        (status = 200, description = "Director details", body = DirectorResponse),
        (status = 404, description = "Director not found", body = AppError),
    ),
    tag = "directors"
)]
pub async fn get_director(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = DirectorService::new(db);
    let director = service.get_by_id(id).await?;

    Ok(ApiResponse::ok(DirectorResponse::from(director)))
}

#[utoipa::path(
    post,
    path = "/api/v1/directors",
    request_body = CreateDirectorRequest,
    responses(
        (status = 200, description = "Director created", body = DirectorResponse),
        (status = 400, description = "Validation error", body = AppError),
    ),
    tag = "directors"
)]
pub async fn create_director(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<CreateDirectorRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = DirectorService::new(db);
    let director = service.create(&payload.name).await?;

    Ok(ApiResponse::ok(DirectorResponse::from(director)))
}

#[utoipa::path(
    put,
    path = "/api/v1/directors",
    request_body = UpdateDirectorRequest,
    responses(
        (status = 200, description = "Director updated", body = DirectorResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 404, description = "Director not found", body = AppError),
    ),
    tag = "directors"
)]
pub async fn update_director(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<UpdateDirectorRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = DirectorService::new(db);
    let director = service.update(payload.id, &payload.name).await?;

    Ok(ApiResponse::ok(DirectorResponse::from(director)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/directors/{id}",
    params(("id" = i32, Path, description = "Director ID")),
    responses(
        (status = 200, description = "Director deleted", body = String),
        (status = 404, description = "Director not found", body = AppError),
    ),
    tag = "directors"
)]
pub async fn delete_director(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = DirectorService::new(db);
    service.delete(id).await?;

    Ok(ApiResponse::ok("Director deleted"))
}
