use crate::config::rate_limit::{RateLimitConfig, RateLimitRule};
use crate::handlers;
use axum::{routing, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

pub fn create_routes() -> Router {
    Router::new().nest("/api/v1", api_routes())
}

fn api_routes() -> Router {
    let rate_limit_config = RateLimitConfig::from_env();

    let read = read_routes(&rate_limit_config);
    let write = write_routes(&rate_limit_config);

    read.merge(write)
}

/// Read routes: all public GETs.
fn read_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Films
        .route("/films", routing::get(handlers::film::list_films))
        .route("/films/popular", routing::get(handlers::film::popular_films))
        .route("/films/common", routing::get(handlers::film::common_films))
        .route("/films/{id}", routing::get(handlers::film::get_film))
        // Users
        .route("/users", routing::get(handlers::user::list_users))
        .route("/users/{id}", routing::get(handlers::user::get_user))
        .route(
            "/users/{id}/friends",
            routing::get(handlers::friendship::list_friends),
        )
        .route(
            "/users/{id}/friends/common/{other_id}",
            routing::get(handlers::friendship::common_friends),
        )
        .route(
            "/users/{id}/recommendations",
            routing::get(handlers::film::get_recommendations),
        )
        // Reviews
        .route("/reviews", routing::get(handlers::review::list_reviews))
        .route("/reviews/{id}", routing::get(handlers::review::get_review))
        // Dictionaries
        .route("/genres", routing::get(handlers::genre::list_genres))
        .route("/genres/{id}", routing::get(handlers::genre::get_genre))
        .route("/mpa", routing::get(handlers::mpa::list_mpa))
        .route("/mpa/{id}", routing::get(handlers::mpa::get_mpa))
        // Directors
        .route("/directors", routing::get(handlers::director::list_directors))
        .route(
            "/directors/{id}",
            routing::get(handlers::director::get_director),
        );

    with_optional_rate_limit(router, config.enabled, config.read)
}

/// Write routes: everything that mutates state.
fn write_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Films
        .route(
            "/films",
            routing::post(handlers::film::create_film).put(handlers::film::update_film),
        )
        .route("/films/{id}", routing::delete(handlers::film::delete_film))
        .route(
            "/films/{id}/like/{user_id}",
            routing::put(handlers::film::add_like).delete(handlers::film::remove_like),
        )
        // Users
        .route(
            "/users",
            routing::post(handlers::user::create_user).put(handlers::user::update_user),
        )
        .route("/users/{id}", routing::delete(handlers::user::delete_user))
        .route(
            "/users/{id}/friends/{friend_id}",
            routing::put(handlers::friendship::add_friend)
                .delete(handlers::friendship::remove_friend),
        )
        // Reviews
        .route(
            "/reviews",
            routing::post(handlers::review::create_review).put(handlers::review::update_review),
        )
        .route(
            "/reviews/{id}",
            routing::delete(handlers::review::delete_review),
        )
        .route(
            "/reviews/{id}/like/{user_id}",
            routing::put(handlers::review::add_review_like)
                .delete(handlers::review::delete_review_like),
        )
        .route(
            "/reviews/{id}/dislike/{user_id}",
            routing::put(handlers::review::add_review_dislike)
                .delete(handlers::review::delete_review_dislike),
        )
        // Directors
        .route(
            "/directors",
            routing::post(handlers::director::create_director)
                .put(handlers::director::update_director),
        )
        .route(
            "/directors/{id}",
            routing::delete(handlers::director::delete_director),
        );

    with_optional_rate_limit(router, config.enabled, config.write)
}

fn with_optional_rate_limit(router: Router, enabled: bool, rule: RateLimitRule) -> Router {
    if !enabled {
        return router;
    }

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
        .expect("Invalid rate limit configuration");

    router.layer(GovernorLayer::new(governor_conf))
}
