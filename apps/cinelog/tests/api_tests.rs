//! Integration tests for the Cinelog HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use cinelog::api::{
    AppState, ErrorResponse, HealthResponse, MessageResponse, MovieResponse, StatisticsResponse,
    create_router,
};
use cinelog::cli::seed_sample_movies;
use cinelog::config::SecurityConfig;
use cinelog_core::{Catalog, MovieId};
use serde_json::json;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn open_security() -> SecurityConfig {
    SecurityConfig {
        api_key: None,
        rate_limit: 0,
        cors_origins: None,
    }
}

fn server_with(catalog: Catalog, security: &SecurityConfig) -> TestServer {
    let router = create_router(AppState::new(catalog), security);
    TestServer::new(router).unwrap()
}

/// Create a test server with an empty in-memory catalog.
fn create_test_server() -> TestServer {
    server_with(Catalog::new(), &open_security())
}

/// Create a test server seeded with the demo movies.
fn create_populated_test_server() -> TestServer {
    let mut catalog = Catalog::new();
    seed_sample_movies(&mut catalog).unwrap();
    server_with(catalog, &open_security())
}

async fn create_movie(server: &TestServer, title: &str) -> MovieResponse {
    let response = server
        .post("/movies")
        .json(&json!({
            "title": title,
            "year": 2001,
            "description": "Created in a test",
            "rating": 7.5,
            "tags": ["test"]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json()
}

async fn list(server: &TestServer, query: &str) -> Vec<MovieResponse> {
    let response = server.get(&format!("/movies{}", query)).await;
    response.assert_status_ok();
    response.json()
}

fn titles(movies: &[MovieResponse]) -> Vec<&str> {
    movies.iter().map(|m| m.title.as_str()).collect()
}

// =============================================================================
// INDEX / HEALTH
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_index_lists_routes() {
    let server = create_test_server();

    let response = server.get("/").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("<html>"));
    assert!(html.contains("GET /movies"));
    assert!(html.contains("DELETE /movies/{id}/tags/{tag}"));
    assert!(html.contains("GET /statistics"));
}

// =============================================================================
// MOVIE COLLECTION
// =============================================================================

#[tokio::test]
async fn test_list_empty_catalog() {
    let server = create_test_server();
    assert!(list(&server, "").await.is_empty());
}

#[tokio::test]
async fn test_create_movie() {
    let server = create_test_server();

    let movie = create_movie(&server, "  Amelie ").await;

    assert_eq!(movie.title, "Amelie");
    assert_eq!(movie.year, 2001);
    assert_eq!(movie.rating, Some(7.5));
    assert_eq!(movie.tags, ["test"]);
    assert!(MovieId::parse(&movie.id).is_ok());
    assert_eq!(list(&server, "").await, [movie]);
}

#[tokio::test]
async fn test_create_movie_without_optional_fields() {
    let server = create_test_server();

    let response = server
        .post("/movies")
        .json(&json!({"title": "Plain", "year": 1950, "description": ""}))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let movie: MovieResponse = response.json();
    assert_eq!(movie.rating, None);
    assert!(movie.tags.is_empty());
}

#[tokio::test]
async fn test_create_movie_validation_errors() {
    let server = create_test_server();

    for body in [
        json!({"title": "   ", "year": 2000, "description": "x"}),
        json!({"title": "Old", "year": 1800, "description": "x"}),
        json!({"title": "Bad", "year": 2000, "description": "x", "rating": 11}),
        json!({"title": "Missing year", "description": "x"}),
        json!({"title": "x".repeat(513), "year": 2000, "description": "x"}),
        json!({"title": "Tags", "year": 2000, "description": "x", "tags": ["t".repeat(129)]}),
    ] {
        let response = server.post("/movies").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{}", body);
        let error: ErrorResponse = response.json();
        assert!(!error.error.is_empty());
    }

    assert!(list(&server, "").await.is_empty());
}

#[tokio::test]
async fn test_create_movie_requires_json() {
    let server = create_test_server();

    let response = server.post("/movies").text("not json").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = response.json();
    assert!(error.error.starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let server = create_test_server();

    let response = server
        .post("/movies")
        .json(&json!({
            "title": "Long",
            "year": 2000,
            "description": "d".repeat(300 * 1024),
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let error: ErrorResponse = response.json();
    assert_eq!(error.error, "Request body too large");
    assert!(list(&server, "").await.is_empty());
}

// =============================================================================
// FILTERING
// =============================================================================

#[tokio::test]
async fn test_list_filters() {
    let server = create_populated_test_server();

    assert_eq!(titles(&list(&server, "?title=the").await), ["The Matrix", "The Godfather"]);
    assert_eq!(titles(&list(&server, "?year=2010").await), ["Inception"]);
    assert_eq!(
        titles(&list(&server, "?min_rating=8.9&max_rating=9.0").await),
        ["The Matrix", "Pulp Fiction"]
    );
    assert_eq!(
        titles(&list(&server, "?tags=crime,drama").await),
        ["The Godfather", "Pulp Fiction"]
    );
    assert_eq!(
        titles(&list(&server, "?tags=sci-fi&min_rating=8.9").await),
        ["The Matrix"]
    );
    assert_eq!(list(&server, "?year=&tags=").await.len(), 5);
}

#[tokio::test]
async fn test_list_rejects_bad_parameters() {
    let server = create_populated_test_server();

    for query in [
        "?year=abc",
        "?min_rating=high",
        "?min_rating=0",
        "?min_rating=9&max_rating=8",
    ] {
        let response = server.get(&format!("/movies{}", query)).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{}", query);
    }
}

// =============================================================================
// SINGLE MOVIE
// =============================================================================

#[tokio::test]
async fn test_get_movie() {
    let server = create_test_server();
    let movie = create_movie(&server, "Findable").await;

    let response = server.get(&format!("/movies/{}", movie.id)).await;

    response.assert_status_ok();
    assert_eq!(response.json::<MovieResponse>(), movie);
}

#[tokio::test]
async fn test_get_unknown_or_malformed_id() {
    let server = create_test_server();

    let response = server.get(&format!("/movies/{}", MovieId::generate())).await;
    response.assert_status_not_found();
    let error: ErrorResponse = response.json();
    assert!(error.error.contains("not found"));

    let response = server.get("/movies/not-an-id").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_rate_movie() {
    let server = create_test_server();
    let movie = create_movie(&server, "Rated").await;
    let path = format!("/movies/{}/rating", movie.id);

    let response = server.put(&path).json(&json!({"rating": 9.5})).await;
    response.assert_status_ok();
    let message: MessageResponse = response.json();
    assert_eq!(message.message, "Rating updated to 9.5");

    let stored: MovieResponse = server.get(&format!("/movies/{}", movie.id)).await.json();
    assert_eq!(stored.rating, Some(9.5));

    let response = server.put(&path).json(&json!({"rating": 0.5})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server.put(&path).json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .put(&format!("/movies/{}/rating", MovieId::generate()))
        .json(&json!({"rating": 5}))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_tag_and_untag_movie() {
    let server = create_test_server();
    let movie = create_movie(&server, "Tagged").await;

    let response = server
        .post(&format!("/movies/{}/tags", movie.id))
        .json(&json!({"tag": "classic"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<MessageResponse>().message, "Tag \"classic\" added");

    let response = server
        .delete(&format!("/movies/{}/tags/test", movie.id))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<MessageResponse>().message, "Tag \"test\" removed");

    let stored: MovieResponse = server.get(&format!("/movies/{}", movie.id)).await.json();
    assert_eq!(stored.tags, ["classic"]);

    let response = server
        .post(&format!("/movies/{}/tags", movie.id))
        .json(&json!({"tag": "  "}))
        .await;
    response.assert_status_ok();
    let stored: MovieResponse = server.get(&format!("/movies/{}", movie.id)).await.json();
    assert_eq!(stored.tags, ["classic"]);

    let ghost = MovieId::generate();
    server
        .post(&format!("/movies/{}/tags", ghost))
        .json(&json!({"tag": ""}))
        .await
        .assert_status_not_found();
    server
        .post(&format!("/movies/{}/tags", ghost))
        .json(&json!({"tag": "x"}))
        .await
        .assert_status_not_found();
    server
        .delete(&format!("/movies/{}/tags/x", ghost))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_movie() {
    let server = create_test_server();
    let movie = create_movie(&server, "Doomed").await;
    let path = format!("/movies/{}", movie.id);

    let response = server.delete(&path).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    server.get(&path).await.assert_status_not_found();
    server.delete(&path).await.assert_status_not_found();
}

// =============================================================================
// STATISTICS
// =============================================================================

#[tokio::test]
async fn test_statistics_empty() {
    let server = create_test_server();

    let response = server.get("/statistics").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_movies"], 0);
    assert_eq!(body["average_rating"], 0.0);
    assert_eq!(body["year_range"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_statistics_populated() {
    let server = create_populated_test_server();

    let stats: StatisticsResponse = server.get("/statistics").await.json();

    assert_eq!(stats.total_movies, 5);
    assert_eq!(stats.movies_with_ratings, 4);
    assert_eq!(stats.average_rating, 8.98);
    assert_eq!(stats.year_range, Some([1972, 2023]));
    assert_eq!(
        stats.unique_tags,
        ["action", "crime", "drama", "mystery", "sci-fi", "thriller"]
    );
}

// =============================================================================
// ERROR HANDLING TESTS
// =============================================================================

#[tokio::test]
async fn test_404_on_unknown_endpoint() {
    let server = create_test_server();

    let response = server.get("/unknown").await;

    response.assert_status_not_found();
    assert_eq!(response.json::<ErrorResponse>().error, "Resource not found");
}

#[tokio::test]
async fn test_method_not_allowed() {
    let server = create_test_server();

    // /statistics is GET only
    let response = server.post("/statistics").await;

    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.json::<ErrorResponse>().error, "Method not allowed");
}

// =============================================================================
// MIDDLEWARE TESTS
// =============================================================================

fn create_auth_test_server(api_key: &str) -> TestServer {
    let security = SecurityConfig {
        api_key: Some(api_key.to_string()),
        ..open_security()
    };
    server_with(Catalog::new(), &security)
}

#[tokio::test]
async fn test_auth_valid_bearer_token() {
    let api_key = "test-secret-key-12345";
    let server = create_auth_test_server(api_key);

    let response = server
        .get("/movies")
        .add_header(
            header::AUTHORIZATION,
            format!("Bearer {}", api_key).parse::<HeaderValue>().unwrap(),
        )
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_auth_valid_raw_token() {
    let api_key = "test-raw-key-67890";
    let server = create_auth_test_server(api_key);

    let response = server
        .get("/statistics")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("test-raw-key-67890"))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_auth_rejects_bad_or_missing_token() {
    let server = create_auth_test_server("right-key");

    let response = server
        .get("/movies")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer wrong-key"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<ErrorResponse>().error, "Unauthorized");

    let response = server.get("/movies").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server
        .get("/movies")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer "))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_health_endpoint_bypasses_auth() {
    let server = create_auth_test_server("secret");

    server.get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn test_rate_limit_exceeded() {
    let security = SecurityConfig {
        rate_limit: 1,
        ..open_security()
    };
    let server = server_with(Catalog::new(), &security);

    server.get("/health").await.assert_status_ok();
    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let security = SecurityConfig {
        cors_origins: Some("http://example.com".to_string()),
        ..open_security()
    };
    let server = server_with(Catalog::new(), &security);

    let response = server
        .get("/health")
        .add_header(header::ORIGIN, HeaderValue::from_static("http://example.com"))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        "http://example.com"
    );
}
