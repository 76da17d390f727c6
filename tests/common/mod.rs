#![allow(dead_code)]

use reqwest::Client;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Once,
};

static INIT: Once = Once::new();
static MIGRATIONS_RAN: AtomicBool = AtomicBool::new(false);
static USER_COUNTER: AtomicUsize = AtomicUsize::new(0);

// Tests in one binary share the database, and every spawn_app truncates it.
// The guard inside TestApp serializes them.
static DB_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

fn init_env() {
    INIT.call_once(|| {
        dotenv::dotenv().ok();
    });
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
    _guard: tokio::sync::MutexGuard<'static, ()>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.addr, path)
    }
}

/// Spawns the app against the configured database, or returns None (skipping
/// the test) when no database is configured.
pub async fn spawn_app() -> Option<TestApp> {
    init_env();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()?;

    let guard = DB_LOCK.lock().await;

    let db = sea_orm::Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    if !MIGRATIONS_RAN.swap(true, Ordering::SeqCst) {
        filmorate::migration::Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
    }

    cleanup_tables(&db).await;

    let app = axum::Router::new()
        .route("/", axum::routing::get(|| async { "ok" }))
        .merge(filmorate::routes::create_routes())
        .layer(axum::extract::Extension(db.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    let addr_str = format!("http://{}", addr);
    let client = Client::new();

    Some(TestApp {
        addr: addr_str,
        db,
        client,
        _guard: guard,
    })
}

async fn cleanup_tables(db: &DatabaseConnection) {
    // Dictionaries (genres, mpa_ratings) are seeded by migrations and stay.
    let tables = [
        "review_marks",
        "reviews",
        "film_likes",
        "friendships",
        "film_directors",
        "film_genres",
        "directors",
        "films",
        "users",
    ];

    for table in tables {
        let sql = format!("TRUNCATE TABLE {} RESTART IDENTITY CASCADE", table);
        let _ = db
            .execute(Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                sql,
            ))
            .await;
    }
}

/// Register a user and return its id.
pub async fn create_test_user(app: &TestApp, login_prefix: &str) -> i32 {
    let counter = USER_COUNTER.fetch_add(1, Ordering::SeqCst);
    let login = format!("{}_{}", login_prefix, counter);

    let resp = app
        .client
        .post(app.url("/users"))
        .json(&serde_json::json!({
            "email": format!("{}@test.com", login),
            "login": login,
            "name": "Test User",
            "birthday": "1990-01-01"
        }))
        .send()
        .await
        .expect("Failed to create user");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse user response");

    if !body["success"].as_bool().unwrap_or(false) {
        panic!(
            "Failed to create user '{}': status={}, body={}",
            login, status, body
        );
    }

    body["data"]["id"].as_i64().expect("Response missing id") as i32
}

/// Create a film with the first two seeded genres and return its id.
pub async fn create_test_film(app: &TestApp, name: &str) -> i32 {
    let resp = app
        .client
        .post(app.url("/films"))
        .json(&serde_json::json!({
            "name": name,
            "description": "A film made for testing",
            "release_date": "2000-05-01",
            "duration": 120,
            "mpa": { "id": 1 },
            "genres": [{ "id": 1 }, { "id": 2 }]
        }))
        .send()
        .await
        .expect("Failed to create film");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse film response");

    if !body["success"].as_bool().unwrap_or(false) {
        panic!(
            "Failed to create film '{}': status={}, body={}",
            name, status, body
        );
    }

    body["data"]["id"].as_i64().expect("Response missing id") as i32
}

/// Create a review and return its id.
pub async fn create_test_review(
    app: &TestApp,
    film_id: i32,
    user_id: i32,
    is_positive: bool,
    content: &str,
) -> i32 {
    let resp = app
        .client
        .post(app.url("/reviews"))
        .json(&serde_json::json!({
            "content": content,
            "film_id": film_id,
            "user_id": user_id,
            "is_positive": is_positive
        }))
        .send()
        .await
        .expect("Failed to create review");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse review response");

    if !body["success"].as_bool().unwrap_or(false) {
        panic!(
            "Failed to create review: status={}, body={}",
            status, body
        );
    }

    body["data"]["id"].as_i64().expect("Response missing id") as i32
}
