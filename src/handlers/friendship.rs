use crate::error::{AppError, AppResult};
use crate::handlers::user::UserResponse;
use crate::response::ApiResponse;
use crate::services::friendship::FriendshipService;
use axum::{extract::Path, response::IntoResponse, Extension};
use sea_orm::DatabaseConnection;

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/friends/{friend_id}",
    params(
        ("id" = i32, Path, description = "User ID"),
        ("friend_id" = i32, Path, description = "Friend's user ID"),
    ),
    responses(
        (status = 200, description = "Friend added", body = String),
        (status = 400, description = "Validation error", body = AppError),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "friends"
)]
pub async fn add_friend(
    Extension(db): Extension<DatabaseConnection>,
    Path((id, friend_id)): Path<(i32, i32)>,
) -> AppResult<impl IntoResponse> {
    let service = FriendshipService::new(db);
    service.add(id, friend_id).await?;

    Ok(ApiResponse::ok("Friend added"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/friends/{friend_id}",
    params(
        ("id" = i32, Path, description = "User ID"),
        ("friend_id" = i32, Path, description = "Friend's user ID"),
    ),
    responses(
        (status = 200, description = "Friend removed", body = String),
        (status = 404, description = "No such friendship", body = AppError),
    ),
    tag = "friends"
)]
pub async fn remove_friend(
    Extension(db): Extension<DatabaseConnection>,
    Path((id, friend_id)): Path<(i32, i32)>,
) -> AppResult<impl IntoResponse> {
    let service = FriendshipService::new(db);
    service.remove(id, friend_id).await?;

    Ok(ApiResponse::ok("Friend removed"))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/friends",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user's friends", body = Vec<UserResponse>),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "friends"
)]
pub async fn list_friends(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = FriendshipService::new(db);
    let friends = service.friends(id).await?;
    let response: Vec<UserResponse> = friends.into_iter().map(UserResponse::from).collect();

    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/friends/common/{other_id}",
    params(
        ("id" = i32, Path, description = "User ID"),
        ("other_id" = i32, Path, description = "Other user's ID"),
    ),
    responses(
        (status = 200, description = "Friends both users share", body = Vec<UserResponse>),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "friends"
)]
pub async fn common_friends(
    Extension(db): Extension<DatabaseConnection>,
    Path((id, other_id)): Path<(i32, i32)>,
) -> AppResult<impl IntoResponse> {
    let service = FriendshipService::new(db);
    let friends = service.common_friends(id, other_id).await?;
    let response: Vec<UserResponse> = friends.into_iter().map(UserResponse::from).collect();

    Ok(ApiResponse::ok(response))
}
