use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use crate::services::review::{ReviewService, ReviewWithUseful, DEFAULT_REVIEW_COUNT};
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1))]
    pub content: String,
    pub film_id: i32,
    pub user_id: i32,
    pub is_positive: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReviewRequest {
    pub id: i32,
    #[validate(length(min = 1))]
    pub content: String,
    pub is_positive: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: i32,
    pub content: String,
    pub user_id: i32,
    pub film_id: i32,
    pub is_positive: bool,
    /// Net helpfulness: positive marks minus negative marks.
    pub useful: i64,
}

impl From<ReviewWithUseful> for ReviewResponse {
    fn from(r: ReviewWithUseful) -> Self {
        Self {
            id: r.id,
            content: r.content,
            user_id: r.user_id,
            film_id: r.film_id,
            is_positive: r.is_positive,
            useful: r.useful,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkResponse {
    pub review_id: i32,
    pub user_id: i32,
    pub useful: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewListQuery {
    pub film_id: Option<i32>,
    pub count: Option<u64>,
}

#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 200, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 404, description = "Film or user not found", body = AppError),
    ),
    tag = "reviews"
)]
pub async fn create_review(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ReviewService::new(db);
    let review = service
        .create(
            &payload.content,
            payload.film_id,
            payload.user_id,
            payload.is_positive,
        )
        .await?;

    Ok(ApiResponse::ok(ReviewResponse::from(review)))
}

#[utoipa::path(
    put,
    path = "/api/v1/reviews",
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ReviewResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 404, description = "Review not found", body = AppError),
    ),
    tag = "reviews"
)]
pub async fn update_review(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<UpdateReviewRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ReviewService::new(db);
    let review = service
        .update(payload.id, &payload.content, payload.is_positive)
        .await?;

    Ok(ApiResponse::ok(ReviewResponse::from(review)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted", body = String),
        (status = 404, description = "Review not found", body = AppError),
    ),
    tag = "reviews"
)]
pub async fn delete_review(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = ReviewService::new(db);
    service.delete(id).await?;

    Ok(ApiResponse::ok("Review deleted"))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/{id}",
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review details", body = ReviewResponse),
        (status = 404, description = "Review not found", body = AppError),
    ),
    tag = "reviews"
)]
pub async fn get_review(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = ReviewService::new(db);
    let review = service.get_by_id(id).await?;

    Ok(ApiResponse::ok(ReviewResponse::from(review)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    params(
        ("film_id" = Option<i32>, Query, description = "Restrict to one film"),
        ("count" = Option<u64>, Query, description = "Maximum number of reviews (default 10)"),
    ),
    responses(
        (status = 200, description = "Reviews, most useful first", body = Vec<ReviewResponse>),
    ),
    tag = "reviews"
)]
pub async fn list_reviews(
    Extension(db): Extension<DatabaseConnection>,
    Query(query): Query<ReviewListQuery>,
) -> AppResult<impl IntoResponse> {
    let count = query.count.unwrap_or(DEFAULT_REVIEW_COUNT);

    let service = ReviewService::new(db);
    let reviews = service.list(query.film_id, count).await?;
    let response: Vec<ReviewResponse> = reviews.into_iter().map(ReviewResponse::from).collect();

    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}/like/{user_id}",
    params(
        ("id" = i32, Path, description = "Review ID"),
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Mark recorded", body = MarkResponse),
        (status = 404, description = "Review or user not found", body = AppError),
        (status = 409, description = "User already marked this review", body = AppError),
    ),
    tag = "reviews"
)]
pub async fn add_review_like(
    Extension(db): Extension<DatabaseConnection>,
    Path((id, user_id)): Path<(i32, i32)>,
) -> AppResult<impl IntoResponse> {
    mark_review(db, id, user_id, true).await
}

#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}/dislike/{user_id}",
    params(
        ("id" = i32, Path, description = "Review ID"),
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Mark recorded", body = MarkResponse),
        (status = 404, description = "Review or user not found", body = AppError),
        (status = 409, description = "User already marked this review", body = AppError),
    ),
    tag = "reviews"
)]
pub async fn add_review_dislike(
    Extension(db): Extension<DatabaseConnection>,
    Path((id, user_id)): Path<(i32, i32)>,
) -> AppResult<impl IntoResponse> {
    mark_review(db, id, user_id, false).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}/like/{user_id}",
    params(
        ("id" = i32, Path, description = "Review ID"),
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Mark removed", body = MarkResponse),
        (status = 404, description = "No such mark", body = AppError),
    ),
    tag = "reviews"
)]
pub async fn delete_review_like(
    Extension(db): Extension<DatabaseConnection>,
    Path((id, user_id)): Path<(i32, i32)>,
) -> AppResult<impl IntoResponse> {
    unmark_review(db, id, user_id).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}/dislike/{user_id}",
    params(
        ("id" = i32, Path, description = "Review ID"),
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Mark removed", body = MarkResponse),
        (status = 404, description = "No such mark", body = AppError),
    ),
    tag = "reviews"
)]
pub async fn delete_review_dislike(
    Extension(db): Extension<DatabaseConnection>,
    Path((id, user_id)): Path<(i32, i32)>,
) -> AppResult<impl IntoResponse> {
    unmark_review(db, id, user_id).await
}

async fn mark_review(
    db: DatabaseConnection,
    review_id: i32,
    user_id: i32,
    is_positive: bool,
) -> AppResult<ApiResponse<MarkResponse>> {
    let service = ReviewService::new(db);
    service.add_mark(review_id, user_id, is_positive).await?;
    let review = service.get_by_id(review_id).await?;

    Ok(ApiResponse::ok(MarkResponse {
        review_id,
        user_id,
        useful: review.useful,
    }))
}

// The polarity in the URL is accepted for interface symmetry but the mark is
// matched by the (review, user) pair alone.
async fn unmark_review(
    db: DatabaseConnection,
    review_id: i32,
    user_id: i32,
) -> AppResult<ApiResponse<MarkResponse>> {
    let service = ReviewService::new(db);
    service.delete_mark(review_id, user_id).await?;
    let review = service.get_by_id(review_id).await?;

    Ok(ApiResponse::ok(MarkResponse {
        review_id,
        user_id,
        useful: review.useful,
    }))
}
