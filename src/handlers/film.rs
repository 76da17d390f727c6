use crate::error::{AppError, AppResult};
use crate::handlers::director::DirectorResponse;
use crate::handlers::genre::GenreResponse;
use crate::handlers::mpa::MpaResponse;
use crate::response::ApiResponse;
use crate::services::film::{FilmDetails, FilmService, DEFAULT_POPULAR_COUNT};
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Cinema has a birthday: nothing was screened before this date.
const EARLIEST_RELEASE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1895, 12, 28) {
    Some(d) => d,
    None => panic!("invalid earliest release date"),
};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct IdRef {
    pub id: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFilmRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub description: String,
    pub release_date: NaiveDate,
    /// Running time in minutes
    #[validate(range(min = 1))]
    pub duration: i32,
    pub mpa: IdRef,
    #[serde(default)]
    pub genres: Vec<IdRef>,
    #[serde(default)]
    pub directors: Vec<IdRef>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFilmRequest {
    pub id: i32,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub description: String,
    pub release_date: NaiveDate,
    /// Running time in minutes
    #[validate(range(min = 1))]
    pub duration: i32,
    pub mpa: IdRef,
    #[serde(default)]
    pub genres: Vec<IdRef>,
    #[serde(default)]
    pub directors: Vec<IdRef>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FilmResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub mpa: MpaResponse,
    pub genres: Vec<GenreResponse>,
    pub directors: Vec<DirectorResponse>,
}

impl From<FilmDetails> for FilmResponse {
    fn from(d: FilmDetails) -> Self {
        Self {
            id: d.film.id,
            name: d.film.name,
            description: d.film.description,
            release_date: d.film.release_date,
            duration: d.film.duration,
            mpa: MpaResponse::from(d.mpa),
            genres: d.genres.into_iter().map(GenreResponse::from).collect(),
            directors: d.directors.into_iter().map(DirectorResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PopularQuery {
    pub count: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommonQuery {
    pub user_id: i32,
    pub friend_id: i32,
}

fn validate_release_date(date: NaiveDate) -> AppResult<()> {
    if date < EARLIEST_RELEASE_DATE {
        return Err(AppError::Validation(format!(
            "Release date must not be before {EARLIEST_RELEASE_DATE}"
        )));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/v1/films",
    responses(
        (status = 200, description = "List all films", body = Vec<FilmResponse>),
    ),
    tag = "films"
)]
pub async fn list_films(
    Extension(db): Extension<DatabaseConnection>,
) -> AppResult<impl IntoResponse> {
    let service = FilmService::new(db);
    let films = service.list().await?;
    let response: Vec<FilmResponse> = films.into_iter().map(FilmResponse::from).collect();

    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/films/{id}",
    params(("id" = i32, Path, description = "Film ID")),
    responses(
        (status = 200, description = "Film details", body = FilmResponse),
        (status = 404, description = "Film not found", body = AppError),
    ),
    tag = "films"
)]
pub async fn get_film(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = FilmService::new(db);
    let film = service.get_by_id(id).await?;

    Ok(ApiResponse::ok(FilmResponse::from(film)))
}

#[utoipa::path(
    post,
    path = "/api/v1/films",
    request_body = CreateFilmRequest,
    responses(
        (status = 200, description = "Film created", body = FilmResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 404, description = "Referenced MPA/genre/director not found", body = AppError),
    ),
    tag = "films"
)]
pub async fn create_film(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<CreateFilmRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    validate_release_date(payload.release_date)?;

    let service = FilmService::new(db);
    let film = service
        .create(
            &payload.name,
            &payload.description,
            payload.release_date,
            payload.duration,
            payload.mpa.id,
            payload.genres.iter().map(|g| g.id).collect(),
            payload.directors.iter().map(|d| d.id).collect(),
        )
        .await?;

    Ok(ApiResponse::ok(FilmResponse::from(film)))
}

#[utoipa::path(
    put,
    path = "/api/v1/films",
    request_body = UpdateFilmRequest,
    responses(
        (status = 200, description = "Film updated", body = FilmResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 404, description = "Film not found", body = AppError),
    ),
    tag = "films"
)]
pub async fn update_film(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<UpdateFilmRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    validate_release_date(payload.release_date)?;

    let service = FilmService::new(db);
    let film = service
        .update(
            payload.id,
            &payload.name,
            &payload.description,
            payload.release_date,
            payload.duration,
            payload.mpa.id,
            payload.genres.iter().map(|g| g.id).collect(),
            payload.directors.iter().map(|d| d.id).collect(),
        )
        .await?;

    Ok(ApiResponse::ok(FilmResponse::from(film)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/films/{id}",
    params(("id" = i32, Path, description = "Film ID")),
    responses(
        (status = 200, description = "Film deleted", body = String),
        (status = 404, description = "Film not found", body = AppError),
    ),
    tag = "films"
)]
pub async fn delete_film(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = FilmService::new(db);
    service.delete(id).await?;

    Ok(ApiResponse::ok("Film deleted"))
}

#[utoipa::path(
    put,
    path = "/api/v1/films/{id}/like/{user_id}",
    params(
        ("id" = i32, Path, description = "Film ID"),
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Like recorded", body = String),
        (status = 404, description = "Film or user not found", body = AppError),
    ),
    tag = "films"
)]
pub async fn add_like(
    Extension(db): Extension<DatabaseConnection>,
    Path((id, user_id)): Path<(i32, i32)>,
) -> AppResult<impl IntoResponse> {
    let service = FilmService::new(db);
    service.add_like(id, user_id).await?;

    Ok(ApiResponse::ok("Like recorded"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/films/{id}/like/{user_id}",
    params(
        ("id" = i32, Path, description = "Film ID"),
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Like removed", body = String),
        (status = 404, description = "No such like", body = AppError),
    ),
    tag = "films"
)]
pub async fn remove_like(
    Extension(db): Extension<DatabaseConnection>,
    Path((id, user_id)): Path<(i32, i32)>,
) -> AppResult<impl IntoResponse> {
    let service = FilmService::new(db);
    service.remove_like(id, user_id).await?;

    Ok(ApiResponse::ok("Like removed"))
}

#[utoipa::path(
    get,
    path = "/api/v1/films/popular",
    params(("count" = Option<u64>, Query, description = "Maximum number of films (default 10)")),
    responses(
        (status = 200, description = "Most liked films", body = Vec<FilmResponse>),
    ),
    tag = "films"
)]
pub async fn popular_films(
    Extension(db): Extension<DatabaseConnection>,
    Query(query): Query<PopularQuery>,
) -> AppResult<impl IntoResponse> {
    let count = query.count.unwrap_or(DEFAULT_POPULAR_COUNT);

    let service = FilmService::new(db);
    let films = service.popular(count).await?;
    let response: Vec<FilmResponse> = films.into_iter().map(FilmResponse::from).collect();

    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/films/common",
    params(
        ("user_id" = i32, Query, description = "First user"),
        ("friend_id" = i32, Query, description = "Second user"),
    ),
    responses(
        (status = 200, description = "Films liked by both users", body = Vec<FilmResponse>),
    ),
    tag = "films"
)]
pub async fn common_films(
    Extension(db): Extension<DatabaseConnection>,
    Query(query): Query<CommonQuery>,
) -> AppResult<impl IntoResponse> {
    let service = FilmService::new(db);
    let films = service.common(query.user_id, query.friend_id).await?;
    let response: Vec<FilmResponse> = films.into_iter().map(FilmResponse::from).collect();

    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/recommendations",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Films liked by the closest taste neighbour", body = Vec<FilmResponse>),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "films"
)]
pub async fn get_recommendations(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = FilmService::new(db);
    let films = service.recommendations(id).await?;
    let response: Vec<FilmResponse> = films.into_iter().map(FilmResponse::from).collect();

    Ok(ApiResponse::ok(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_screening_date_is_allowed() {
        assert!(validate_release_date(EARLIEST_RELEASE_DATE).is_ok());
    }

    #[test]
    fn earlier_dates_are_rejected() {
        let date = NaiveDate::from_ymd_opt(1895, 12, 27).unwrap();
        assert!(validate_release_date(date).is_err());
    }

    #[test]
    fn modern_dates_are_allowed() {
        let date = NaiveDate::from_ymd_opt(2000, 5, 1).unwrap();
        assert!(validate_release_date(date).is_ok());
    }
}
