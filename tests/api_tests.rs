use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use cinematch::{
    db::Catalog,
    error::{AppError, AppResult},
    models::{Movie, MovieTable, SimilarityMatrix},
    routes::{create_router, AppState},
    services::{
        posters::{NO_API_KEY_PLACEHOLDER, NO_IMAGE_PLACEHOLDER},
        providers::PosterProvider,
        PosterService, Recommender,
    },
};

/// Serves `/posters/{id}.jpg` for every movie except ID 3
struct StubPosterProvider {
    configured: bool,
}

#[async_trait::async_trait]
impl PosterProvider for StubPosterProvider {
    async fn fetch_poster(&self, movie_id: i64) -> AppResult<String> {
        if movie_id == 3 {
            return Err(AppError::PosterFetch("no poster_path".to_string()));
        }
        Ok(format!("https://image.test/posters/{}.jpg", movie_id))
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn catalog() -> Arc<Catalog> {
    catalog_with_titles(["A", "B", "C", "D"])
}

fn catalog_with_titles(titles: [&str; 4]) -> Arc<Catalog> {
    let movies = MovieTable::new(
        titles
            .iter()
            .zip(1..)
            .map(|(title, id)| Movie::new(id, *title))
            .collect(),
    );
    let similarity = SimilarityMatrix::from_rows(vec![
        vec![1.0, 0.9, 0.2, 0.5],
        vec![0.9, 1.0, 0.3, 0.4],
        vec![0.2, 0.3, 1.0, 0.6],
        vec![0.5, 0.4, 0.6, 1.0],
    ])
    .unwrap();

    Arc::new(Catalog::new(movies, similarity).unwrap())
}

fn create_test_server_with(configured: bool, default_k: usize) -> TestServer {
    create_test_server_for(catalog(), configured, default_k)
}

fn create_test_server_for(catalog: Arc<Catalog>, configured: bool, default_k: usize) -> TestServer {
    let state = Arc::new(AppState::new(
        Recommender::new(catalog, default_k),
        PosterService::new(Arc::new(StubPosterProvider { configured })),
    ));
    TestServer::new(create_router(state)).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(true, 2)
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["movies"], 4);
    assert!(body["loaded_at"].is_string());
}

#[tokio::test]
async fn test_index_page() {
    let server = create_test_server();
    let response = server.get("/").await;
    response.assert_status_ok();
    let page = response.text();
    assert!(page.contains("Find Movies Like This"));
    // The selector submits the exact catalog title, not the rendered option text
    assert!(page.contains("option.value = movie.title"));
}

#[tokio::test]
async fn test_list_movies_in_table_order() {
    let server = create_test_server();
    let response = server.get("/api/v1/movies").await;
    response.assert_status_ok();

    let movies: Vec<Value> = response.json();
    let titles: Vec<&str> = movies.iter().map(|m| m["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["A", "B", "C", "D"]);
    assert_eq!(movies[3]["movie_id"], 4);
}

#[tokio::test]
async fn test_recommend_get_uses_default_k() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "A")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["query"], "A");
    assert_eq!(
        body["recommendations"],
        json!([
            { "title": "B", "movie_id": 2, "poster_url": "https://image.test/posters/2.jpg" },
            { "title": "D", "movie_id": 4, "poster_url": "https://image.test/posters/4.jpg" }
        ])
    );
}

#[tokio::test]
async fn test_recommend_post_with_k() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "A", "k": 3 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let recs = body["recommendations"].as_array().unwrap();
    let titles: Vec<&str> = recs.iter().map(|r| r["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["B", "D", "C"]);
}

#[tokio::test]
async fn test_failed_poster_gets_placeholder_without_dropping_others() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "D", "k": 3 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0]["title"], "C");
    assert_eq!(recs[0]["poster_url"], NO_IMAGE_PLACEHOLDER);
    assert_eq!(recs[1]["poster_url"], "https://image.test/posters/1.jpg");
    assert_eq!(recs[2]["poster_url"], "https://image.test/posters/2.jpg");
}

#[tokio::test]
async fn test_missing_api_key_uses_placeholder() {
    let server = create_test_server_with(false, 5);
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "B")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 3);
    assert!(recs.iter().all(|r| r["poster_url"] == NO_API_KEY_PLACEHOLDER));
}

#[tokio::test]
async fn test_title_with_surrounding_whitespace_matches_exactly() {
    let titles = catalog_with_titles(["Avatar ", "Up", "Heat", "Big  Fish"]);
    let server = create_test_server_for(titles, true, 2);

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Avatar ")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["query"], "Avatar ");
    let titles: Vec<&str> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Up", "Big  Fish"]);

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Big  Fish")
        .await;
    response.assert_status_ok();

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Avatar")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_title_is_not_found() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Z")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Z"));
    assert!(body.get("recommendations").is_none());
}

#[tokio::test]
async fn test_negative_k_is_bad_request() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "A", "k": -1 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_k_zero_returns_empty_list() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "A", "k": 0 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["recommendations"], json!([]));
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let server = create_test_server();
    let first: Value = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "C")
        .await
        .json();
    let second: Value = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "C")
        .await
        .json();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let request_id = "5f8a7c1e-2b3d-4e6f-8a9b-0c1d2e3f4a5b";

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(request_id),
        )
        .await;

    assert_eq!(response.header("x-request-id"), request_id);
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let server = create_test_server();
    let response = server.get("/health").await;

    let header = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}
