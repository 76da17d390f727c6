use crate::error::{AppError, AppResult};
use crate::models::MpaModel;
use crate::response::ApiResponse;
use crate::services::mpa::MpaService;
use axum::{extract::Path, response::IntoResponse, Extension};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct MpaResponse {
    pub id: i32,
    pub name: String,
}

impl From<MpaModel> for MpaResponse {
    fn from(m: MpaModel) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/mpa",
    responses(
        (status = 200, description = "List all MPA ratings", body = Vec<MpaResponse>),
    ),
    tag = "mpa"
)]
pub async fn list_mpa(Extension(db): Extension<DatabaseConnection>) -> AppResult<impl IntoResponse> {
    let service = MpaService::new(db);
    let ratings = service.list().await?;
    let response: Vec<MpaResponse> = ratings.into_iter().map(MpaResponse::from).collect();

    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/mpa/{id}",
    params(("id" = i32, Path, description = "MPA rating ID")),
    responses(
        (status = 200, description = "MPA rating details", body = MpaResponse),
        (status = 404, description = "MPA rating not found", body = AppError),
    ),
    tag = "mpa"
)]
pub async fn get_mpa(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = MpaService::new(db);
    let rating = service.get_by_id(id).await?;

    Ok(ApiResponse::ok(MpaResponse::from(rating)))
}
