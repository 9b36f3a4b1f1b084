//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use coursehub_core::clock::Clock;
use coursehub_core::rng::DeterministicRng;
use coursehub_store::pg_category_repository::PgCategoryRepository;
use coursehub_test_support::{FixedClock, SequenceRng};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use coursehub_api::routes;
use coursehub_api::state::AppState;

/// Build the full app router with a real `PgCategoryRepository` and a
/// deterministic clock. The RNG always draws the first peer category.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_rng(pool, SequenceRng::new(vec![0; 16]))
}

/// Build the full app router with a custom `SequenceRng` for tests that need
/// a specific peer category to be drawn.
pub fn build_test_app_with_rng(pool: PgPool, rng: SequenceRng) -> Router {
    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(FixedClock::default());
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    let category_repository = Arc::new(PgCategoryRepository::new(pool));
    routes::app(AppState::new(clock, rng, category_repository))
}

/// Inserts a course directly (courses belong to another subsystem) and files
/// it under `category_id` at the next position.
pub async fn seed_course(pool: &PgPool, category_id: Uuid, name: &str, status: &str, sold: i64) {
    let course_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO courses (id, course_name, course_description, price, status, sold)
         VALUES ($1, $2, '', 2999, $3, $4)",
    )
    .bind(course_id)
    .bind(name)
    .bind(status)
    .bind(sold)
    .execute(pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO category_courses (category_id, course_id, position)
         SELECT $1::uuid, $2::uuid, COUNT(*)::int FROM category_courses WHERE category_id = $1::uuid",
    )
    .bind(category_id)
    .bind(course_id)
    .execute(pool)
    .await
    .unwrap();
}

async fn read_json(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    read_json(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    read_json(app, request).await
}

/// Create a category through the API and return its id.
pub async fn create_category(pool: &PgPool, name: &str) -> Uuid {
    let (status, json) = post_json(
        build_test_app(pool.clone()),
        "/api/v1/categories",
        &serde_json::json!({ "name": name, "description": format!("{name} courses") }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["data"]["id"].as_str().unwrap().parse().unwrap()
}
