//! Routes for the Catalog bounded context.

use axum::extract::State;
use axum::{Json, Router, routing::get, routing::post};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use coursehub_catalog::application::query_handlers::{CategoryPage, CategoryView};
use coursehub_catalog::application::{command_handlers, query_handlers};
use coursehub_catalog::domain::commands;
use coursehub_core::model::Category;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::routes::ApiResponse;
use crate::state::AppState;

/// Request body for POST /.
///
/// `name` is optional at the transport level so that a missing name is
/// answered with a validation error instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Category name.
    pub name: Option<String>,
    /// Optional description.
    pub description: Option<String>,
}

/// Request body for POST /page-details.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPageRequest {
    /// The category whose landing page is requested.
    pub category_id: Uuid,
}

/// POST /
#[instrument(skip(state, request))]
async fn create_category(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateCategoryRequest>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let command = commands::CreateCategory {
        correlation_id: Uuid::new_v4(),
        name: request.name,
        description: request.description,
    };

    info!(correlation_id = %command.correlation_id, "handling create_category command");

    let category = command_handlers::handle_create_category(
        &command,
        state.clock.as_ref(),
        &*state.category_repository,
    )
    .await?;

    Ok(Json(ApiResponse::with_message(
        "category created successfully",
        category,
    )))
}

/// GET /
#[instrument(skip(state))]
async fn show_all_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CategoryView>>>, ApiError> {
    let categories =
        query_handlers::show_all_categories(state.clock.as_ref(), &*state.category_repository)
            .await?;

    Ok(Json(ApiResponse::ok(categories)))
}

/// POST /page-details
#[instrument(skip(state, request), fields(category_id = %request.category_id))]
async fn category_page_details(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CategoryPageRequest>,
) -> Result<Json<ApiResponse<CategoryPage>>, ApiError> {
    page_details(&state, request.category_id).await
}

/// GET /{category_id}/page-details
#[instrument(skip(state))]
async fn category_page_details_by_path(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<CategoryPage>>, ApiError> {
    page_details(&state, category_id).await
}

async fn page_details(
    state: &AppState,
    category_id: Uuid,
) -> Result<Json<ApiResponse<CategoryPage>>, ApiError> {
    let page = query_handlers::category_page_details(
        category_id,
        &state.rng,
        &*state.category_repository,
    )
    .await?;

    let response = match page {
        empty @ CategoryPage::Empty { .. } => {
            ApiResponse::with_message("no courses found for the selected category", empty)
        }
        full @ CategoryPage::Full { .. } => ApiResponse::ok(full),
    };

    Ok(Json(response))
}

/// Returns the router for the catalog context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_category).get(show_all_categories))
        .route("/page-details", post(category_page_details))
        .route(
            "/{category_id}/page-details",
            get(category_page_details_by_path),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use coursehub_core::clock::Clock;
    use coursehub_core::model::CourseStatus;
    use coursehub_core::repository::CategoryRepository;
    use coursehub_core::rng::DeterministicRng;
    use coursehub_test_support::{
        FailingCategoryRepository, FixedClock, InMemoryCategoryRepository, MockRng, course,
    };
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    fn app_state_with(category_repository: Arc<dyn CategoryRepository>) -> AppState {
        let clock: Arc<dyn Clock + Send + Sync> = Arc::new(FixedClock::default());
        let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
        AppState::new(clock, rng, category_repository)
    }

    fn failing_app_state() -> AppState {
        app_state_with(Arc::new(FailingCategoryRepository))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    fn post(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_category_returns_200_with_category() {
        // Arrange
        let repo = Arc::new(InMemoryCategoryRepository::new());
        let app = router().with_state(app_state_with(repo.clone()));
        let body = serde_json::json!({ "name": "Python", "description": "Snakes and data" });

        // Act
        let (status, json) = send(app, post("/", &body)).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "category created successfully");
        assert_eq!(json["data"]["name"], "Python");
        assert_eq!(json["data"]["description"], "Snakes and data");
        assert_eq!(json["data"]["courses"], serde_json::json!([]));
        Uuid::parse_str(json["data"]["id"].as_str().unwrap()).unwrap();
        assert_eq!(repo.categories().len(), 1);
    }

    #[tokio::test]
    async fn test_create_category_returns_400_for_missing_name() {
        // Arrange
        let app = router().with_state(app_state_with(Arc::new(InMemoryCategoryRepository::new())));
        let body = serde_json::json!({ "description": "no name" });

        // Act
        let (status, json) = send(app, post("/", &body)).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_create_category_returns_500_when_repository_fails() {
        let app = router().with_state(failing_app_state());
        let body = serde_json::json!({ "name": "Python" });

        let (status, json) = send(app, post("/", &body)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "infrastructure_error");
    }

    #[tokio::test]
    async fn test_show_all_categories_includes_general() {
        // Arrange
        let repo = Arc::new(InMemoryCategoryRepository::new());
        let web = repo.add_category("Web");
        repo.add_course(web, course("HTML", CourseStatus::Draft, 0));
        let app = router().with_state(app_state_with(repo));

        // Act
        let (status, json) = send(app, get("/")).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert!(json.get("message").is_none());
        let data = json["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["courses"][0]["courseName"], "HTML");
        assert!(data.iter().any(|c| c["name"] == "General"));
    }

    #[tokio::test]
    async fn test_show_all_categories_returns_500_when_repository_fails() {
        let app = router().with_state(failing_app_state());

        let (status, json) = send(app, get("/")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_page_details_returns_full_page() {
        // Arrange
        let repo = Arc::new(InMemoryCategoryRepository::new());
        let selected = repo.add_category("Selected");
        repo.add_course(selected, course("Rust", CourseStatus::Published, 12));
        let peer = repo.add_category("Peer");
        repo.add_course(peer, course("Go", CourseStatus::Published, 30));
        let app = router().with_state(app_state_with(repo));
        let body = serde_json::json!({ "categoryId": selected });

        // Act
        let (status, json) = send(app, post("/page-details", &body)).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        let data = &json["data"];
        assert_eq!(data["selectedCategory"]["id"], selected.to_string());
        assert_eq!(data["differentCategory"]["id"], peer.to_string());
        let best = data["mostSellingCourses"].as_array().unwrap();
        assert_eq!(best.len(), 2);
        assert_eq!(best[0]["courseName"], "Go");
        assert_eq!(best[1]["courseName"], "Rust");
    }

    #[tokio::test]
    async fn test_page_details_reports_empty_category() {
        // Arrange
        let repo = Arc::new(InMemoryCategoryRepository::new());
        let selected = repo.add_category("Quiet");
        repo.add_category("Busy");
        let app = router().with_state(app_state_with(repo.clone()));

        // Act
        let (status, json) = send(app, get(&format!("/{selected}/page-details"))).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "no courses found for the selected category");
        assert_eq!(json["data"]["selectedCategory"]["id"], selected.to_string());
        assert!(json["data"].get("differentCategory").is_none());
        assert!(json["data"].get("mostSellingCourses").is_none());
        assert_eq!(repo.calls().list_except, 0);
    }

    #[tokio::test]
    async fn test_page_details_returns_404_for_unknown_category() {
        let app = router().with_state(app_state_with(Arc::new(InMemoryCategoryRepository::new())));
        let body = serde_json::json!({ "categoryId": Uuid::new_v4() });

        let (status, json) = send(app, post("/page-details", &body)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn test_page_details_returns_422_for_missing_category_id() {
        // Arrange
        let app = router().with_state(app_state_with(Arc::new(InMemoryCategoryRepository::new())));

        // Act
        let (status, json) = send(app, post("/page-details", &serde_json::json!({}))).await;

        // Assert
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "validation_error");
        assert!(json["message"].as_str().unwrap().contains("categoryId"));
    }

    #[tokio::test]
    async fn test_page_details_returns_422_for_non_uuid_category_id() {
        let app = router().with_state(app_state_with(Arc::new(InMemoryCategoryRepository::new())));
        let body = serde_json::json!({ "categoryId": "not-a-uuid" });

        let (status, json) = send(app, post("/page-details", &body)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_page_details_by_path_returns_400_for_non_uuid_id() {
        let app = router().with_state(app_state_with(Arc::new(InMemoryCategoryRepository::new())));

        let (status, json) = send(app, get("/not-a-uuid/page-details")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_create_category_returns_422_for_non_string_name() {
        // Arrange
        let repo = Arc::new(InMemoryCategoryRepository::new());
        let app = router().with_state(app_state_with(repo.clone()));

        // Act
        let (status, json) = send(app, post("/", &serde_json::json!({ "name": 5 }))).await;

        // Assert
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "validation_error");
        assert!(repo.categories().is_empty());
    }

    #[tokio::test]
    async fn test_create_category_returns_415_without_json_content_type() {
        let app = router().with_state(app_state_with(Arc::new(InMemoryCategoryRepository::new())));
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"name":"Python"}"#))
            .unwrap();

        let (status, json) = send(app, request).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_page_details_returns_500_when_repository_fails() {
        let app = router().with_state(failing_app_state());
        let body = serde_json::json!({ "categoryId": Uuid::new_v4() });

        let (status, json) = send(app, post("/page-details", &body)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "infrastructure_error");
    }
}
