use crate::error::{AppError, AppResult};
use crate::models::GenreModel;
use crate::response::ApiResponse;
use crate::services::genre::GenreService;
use axum::{extract::Path, response::IntoResponse, Extension};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct GenreResponse {
    pub id: i32,
    pub name: String,
}

impl From<GenreModel> for GenreResponse {
    fn from(g: GenreModel) -> Self {
        Self {
            id: g.id,
            name: g.name,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/genres",
    responses(
        (status = 200, description = "List all genres", body = Vec<GenreResponse>),
    ),
    tag = "genres"
)]
pub async fn list_genres(
    Extension(db): Extension<DatabaseConnection>,
) -> AppResult<impl IntoResponse> {
    let service = GenreService::new(db);
    let genres = service.list().await?;
    let response: Vec<GenreResponse> = genres.into_iter().map(GenreResponse::from).collect();

    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/genres/{id}",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre details", body = GenreResponse),
        (status = 404, description = "Genre not found", body = AppError),
    ),
    tag = "genres"
)]
pub async fn get_genre(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = GenreService::new(db);
    let genre = service.get_by_id(id).await?;

    Ok(ApiResponse::ok(GenreResponse::from(genre)))
}
