//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        CreateMovieRequest, ErrorResponse, HealthResponse, ListMoviesParams, MessageResponse,
        MovieResponse, RateRequest, StatisticsResponse, TagRequest,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use cinelog_core::{CatalogError, MovieId};

/// Error half of every handler result.
type ApiError = (StatusCode, Json<ErrorResponse>);

type ApiResult<T> = Result<T, ApiError>;

/// Map a catalog error to its HTTP status and JSON body.
fn api_error(err: CatalogError) -> ApiError {
    let status = match &err {
        CatalogError::MovieNotFound(_) => StatusCode::NOT_FOUND,
        e if e.is_validation() => StatusCode::BAD_REQUEST,
        _ => {
            tracing::error!(error = %err, "Catalog operation failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(format!("Internal server error: {}", err))),
            );
        }
    };
    (status, Json(ErrorResponse::new(err.to_string())))
}

/// Parse a path id. Ids that do not parse cannot exist, so they are 404.
fn parse_id(raw: &str) -> ApiResult<MovieId> {
    MovieId::parse(raw).map_err(|_| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!(
                "Movie with ID '{}' not found",
                raw
            ))),
        )
    })
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ErrorResponse::new("Request body too large")),
        );
    }
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(format!(
            "Invalid request body: {}",
            rejection.body_text()
        ))),
    )
}

// =============================================================================
// INDEX / HEALTH
// =============================================================================

const ROUTES: [(&str, &str); 10] = [
    ("GET /", "API documentation and route listing"),
    ("GET /health", "Health check"),
    (
        "GET /movies",
        "List movies; optional title, year, min_rating, max_rating, tags (comma separated)",
    ),
    (
        "POST /movies",
        "Create a movie from {title, year, description, rating?, tags?}",
    ),
    ("GET /movies/{id}", "Retrieve a movie by id"),
    ("PUT /movies/{id}/rating", "Set the rating from {rating}"),
    ("POST /movies/{id}/tags", "Add a tag from {tag}"),
    ("DELETE /movies/{id}/tags/{tag}", "Remove a tag"),
    ("DELETE /movies/{id}", "Delete a movie"),
    ("GET /statistics", "Catalog statistics"),
];

/// HTML page listing every route.
pub async fn index_handler() -> Html<String> {
    let mut rows = String::new();
    for (route, description) in ROUTES {
        rows.push_str(&format!(
            "      <tr><td><code>{}</code></td><td>{}</td></tr>\n",
            route, description
        ));
    }
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Cinelog API</title></head>\n<body>\n  \
         <h1>Cinelog API v{}</h1>\n  <table>\n      \
         <tr><th>Route</th><th>Description</th></tr>\n{}  </table>\n</body>\n</html>\n",
        env!("CARGO_PKG_VERSION"),
        rows
    ))
}

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// MOVIE COLLECTION
// =============================================================================

/// List movies, optionally filtered by query parameters.
pub async fn list_movies_handler(
    State(state): State<AppState>,
    Query(params): Query<ListMoviesParams>,
) -> ApiResult<Json<Vec<MovieResponse>>> {
    let filter = params.to_filter().map_err(api_error)?;
    let catalog = state.catalog.read().await;
    let movies = catalog.search(&filter).map_err(api_error)?;
    Ok(Json(movies.iter().map(MovieResponse::from).collect()))
}

/// Create a movie.
pub async fn create_movie_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateMovieRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MovieResponse>)> {
    let Json(request) = payload.map_err(bad_body)?;
    let input = request.to_new_movie().map_err(api_error)?;

    let mut catalog = state.catalog.write().await;
    let movie = catalog.add_movie(input).map_err(api_error)?;
    tracing::info!(id = %movie.id(), title = movie.title(), "Movie added");
    Ok((StatusCode::CREATED, Json(MovieResponse::from(&movie))))
}

// =============================================================================
// SINGLE MOVIE
// =============================================================================

/// Retrieve a movie by id.
pub async fn get_movie_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MovieResponse>> {
    let movie_id = parse_id(&id)?;
    let catalog = state.catalog.read().await;
    match catalog.get_movie(movie_id).map_err(api_error)? {
        Some(movie) => Ok(Json(MovieResponse::from(&movie))),
        None => Err(api_error(CatalogError::MovieNotFound(movie_id))),
    }
}

/// Set or replace a movie's rating.
pub async fn rate_movie_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<RateRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let movie_id = parse_id(&id)?;
    let Json(request) = payload.map_err(bad_body)?;

    let mut catalog = state.catalog.write().await;
    catalog
        .rate_movie(movie_id, request.rating)
        .map_err(api_error)?;
    Ok(Json(MessageResponse::new(format!(
        "Rating updated to {}",
        request.rating
    ))))
}

/// Add a tag to a movie.
pub async fn add_tag_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TagRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let movie_id = parse_id(&id)?;
    let Json(request) = payload.map_err(bad_body)?;
    let tag = request.validated_tag().map_err(api_error)?;

    let mut catalog = state.catalog.write().await;
    catalog.tag_movie(movie_id, tag).map_err(api_error)?;
    Ok(Json(MessageResponse::new(format!("Tag \"{}\" added", tag))))
}

/// Remove a tag from a movie.
pub async fn remove_tag_handler(
    State(state): State<AppState>,
    Path((id, tag)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    let movie_id = parse_id(&id)?;

    let mut catalog = state.catalog.write().await;
    catalog.untag_movie(movie_id, &tag).map_err(api_error)?;
    Ok(Json(MessageResponse::new(format!("Tag \"{}\" removed", tag))))
}

/// Delete a movie.
pub async fn delete_movie_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let movie_id = parse_id(&id)?;

    let mut catalog = state.catalog.write().await;
    let movie = catalog.delete_movie(movie_id).map_err(api_error)?;
    tracing::info!(id = %movie_id, title = movie.title(), "Movie deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// STATISTICS
// =============================================================================

/// Aggregate catalog statistics.
pub async fn statistics_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<StatisticsResponse>> {
    let catalog = state.catalog.read().await;
    let stats = catalog.statistics().map_err(api_error)?;
    Ok(Json(StatisticsResponse::from(stats)))
}

// =============================================================================
// FALLBACKS
// =============================================================================

/// Unknown route.
pub async fn not_found_handler() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Resource not found")),
    )
}

/// Known route, unsupported method.
pub async fn method_not_allowed_handler() -> ApiError {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed")),
    )
}

// =============================================================================
// TESTS
// =============================================================================
