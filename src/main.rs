mod config;
mod error;
mod handlers;
mod migration;
mod models;
mod response;
mod routes;
mod services;

use axum::{extract::Extension, response::IntoResponse, routing::get, Json, Router};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use serde_json::json;
use std::env;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        // Film routes
        crate::handlers::film::list_films,
        crate::handlers::film::get_film,
        crate::handlers::film::create_film,
        crate::handlers::film::update_film,
        crate::handlers::film::delete_film,
        crate::handlers::film::add_like,
        crate::handlers::film::remove_like,
        crate::handlers::film::popular_films,
        crate::handlers::film::common_films,
        crate::handlers::film::get_recommendations,
        // User routes
        crate::handlers::user::list_users,
        crate::handlers::user::get_user,
        crate::handlers::user::create_user,
        crate::handlers::user::update_user,
        crate::handlers::user::delete_user,
        // Friend routes
        crate::handlers::friendship::add_friend,
        crate::handlers::friendship::remove_friend,
        crate::handlers::friendship::list_friends,
        crate::handlers::friendship::common_friends,
        // Review routes
        crate::handlers::review::create_review,
        crate::handlers::review::update_review,
        crate::handlers::review::delete_review,
        crate::handlers::review::get_review,
        crate::handlers::review::list_reviews,
        crate::handlers::review::add_review_like,
        crate::handlers::review::add_review_dislike,
        crate::handlers::review::delete_review_like,
        crate::handlers::review::delete_review_dislike,
        // Dictionary routes
        crate::handlers::genre::list_genres,
        crate::handlers::genre::get_genre,
        crate::handlers::mpa::list_mpa,
        crate::handlers::mpa::get_mpa,
        // Director routes
        crate::handlers::director::list_directors,
        crate::handlers::director::get_director,
        crate::handlers::director::create_director,
        crate::handlers::director::update_director,
        crate::handlers::director::delete_director,
    ),
    components(
        schemas(
            crate::response::ApiResponse<serde_json::Value>,
            crate::error::AppError,
            // Film
            crate::handlers::film::FilmResponse,
            crate::handlers::film::CreateFilmRequest,
            crate::handlers::film::UpdateFilmRequest,
            crate::handlers::film::IdRef,
            crate::handlers::film::PopularQuery,
            crate::handlers::film::CommonQuery,
            // User
            crate::handlers::user::UserResponse,
            crate::handlers::user::CreateUserRequest,
            crate::handlers::user::UpdateUserRequest,
            // Review
            crate::handlers::review::ReviewResponse,
            crate::handlers::review::CreateReviewRequest,
            crate::handlers::review::UpdateReviewRequest,
            crate::handlers::review::ReviewListQuery,
            crate::handlers::review::MarkResponse,
            // Dictionaries
            crate::handlers::genre::GenreResponse,
            crate::handlers::mpa::MpaResponse,
            // Director
            crate::handlers::director::DirectorResponse,
            crate::handlers::director::CreateDirectorRequest,
            crate::handlers::director::UpdateDirectorRequest,
        )
    ),
    tags(
        (name = "films", description = "Film management operations"),
        (name = "users", description = "User management operations"),
        (name = "friends", description = "Friendship operations"),
        (name = "reviews", description = "Review and helpfulness mark operations"),
        (name = "genres", description = "Genre dictionary"),
        (name = "mpa", description = "MPA rating dictionary"),
        (name = "directors", description = "Director management operations"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filmorate=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Fail fast on missing configuration; the connection itself happens below.
    if env::var("DATABASE_URL").is_err() {
        return Err(anyhow::anyhow!(
            "DATABASE_URL environment variable must be set"
        ));
    }

    tracing::info!("Starting Filmorate API v{}...", env!("CARGO_PKG_VERSION"));

    let db = config::database::get_database().await?;
    tracing::info!("Database connected successfully");

    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let app = create_app().layer(Extension(db));

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

fn build_cors_layer() -> CorsLayer {
    use axum::http::{header, HeaderValue, Method};

    let origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins_str == "*" {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = origins_str
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

fn create_app() -> Router {
    Router::new()
        .route("/", get(health_check))
        .merge(routes::create_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Health check successful", body = serde_json::Value)
    )
)]
async fn health_check(Extension(db): Extension<DatabaseConnection>) -> impl IntoResponse {
    let db_ok = db
        .query_one(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT 1".to_string(),
        ))
        .await
        .is_ok();

    let status = if db_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "Filmorate API",
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_ok,
    }))
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received, gracefully shutting down...");
}
