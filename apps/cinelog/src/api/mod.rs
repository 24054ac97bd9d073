//! # Cinelog HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /` - Route listing (HTML)
//! - `GET /health` - Health check
//! - `GET /movies` - List movies, optionally filtered
//! - `POST /movies` - Create a movie
//! - `GET /movies/{id}` - Retrieve a movie
//! - `PUT /movies/{id}/rating` - Rate a movie
//! - `POST /movies/{id}/tags` - Tag a movie
//! - `DELETE /movies/{id}/tags/{tag}` - Untag a movie
//! - `DELETE /movies/{id}` - Delete a movie
//! - `GET /statistics` - Catalog statistics
//!
//! ## Security Configuration
//!
//! Taken from `SecurityConfig` (`[security]` or the matching environment
//! variables):
//! - `cors_origins` / `CINELOG_CORS_ORIGINS`: comma separated origins, or "*" for all (default: localhost only)
//! - `rate_limit` / `CINELOG_RATE_LIMIT`: requests per second (default: 100, 0 to disable)
//! - `api_key` / `CINELOG_API_KEY`: if set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use types::{
    CreateMovieRequest, ErrorResponse, HealthResponse, ListMoviesParams, MessageResponse,
    MovieResponse, RateRequest, StatisticsResponse, TagRequest,
};

use crate::config::SecurityConfig;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use cinelog_core::{Catalog, CatalogError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum accepted request body.
const MAX_BODY_BYTES: usize = 256 * 1024;

const CORS_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the catalog.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<RwLock<Catalog>>,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer.
///
/// - `Some("*")`: allows all origins (development only)
/// - `None`: localhost only
/// - otherwise: the comma separated list of allowed origins
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins.map(str::trim) {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: Allowing origin: {}", origin);
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                        None
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                restricted_cors(allowed_origins)
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse().ok())
    .collect();
    restricted_cors(origins)
}

fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(CORS_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting - if enabled
/// 5. Authentication - if an API key is configured
pub fn create_router(state: AppState, security: &SecurityConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::index_handler))
        .route("/health", get(handlers::health_handler))
        .route(
            "/movies",
            get(handlers::list_movies_handler).post(handlers::create_movie_handler),
        )
        .route(
            "/movies/{id}",
            get(handlers::get_movie_handler).delete(handlers::delete_movie_handler),
        )
        .route("/movies/{id}/rating", put(handlers::rate_movie_handler))
        .route("/movies/{id}/tags", post(handlers::add_tag_handler))
        .route(
            "/movies/{id}/tags/{tag}",
            delete(handlers::remove_tag_handler),
        )
        .route("/statistics", get(handlers::statistics_handler))
        .fallback(handlers::not_found_handler)
        .method_not_allowed_fallback(handlers::method_not_allowed_handler);

    // Authentication (innermost - runs last on request)
    match auth::ApiKey::from_config(security.api_key.as_deref()) {
        Some(key) => {
            tracing::info!("API key authentication enabled");
            router = router.layer(axum_middleware::from_fn_with_state(
                key,
                auth::api_key_auth_middleware,
            ));
        }
        None => {
            tracing::warn!(
                "API key authentication DISABLED - all endpoints are publicly accessible! \
                 Set CINELOG_API_KEY to enable authentication."
            );
        }
    }

    if security.rate_limit > 0 {
        tracing::info!(
            "Rate limiting enabled: {} requests/second",
            security.rate_limit
        );
        router = router.layer(axum_middleware::from_fn_with_state(
            middleware::create_rate_limiter(security.rate_limit),
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(security.cors_origins.as_deref()))
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl-C.
pub async fn run_server(
    addr: &str,
    catalog: Catalog,
    security: &SecurityConfig,
) -> Result<(), CatalogError> {
    let router = create_router(AppState::new(catalog), security);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CatalogError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Cinelog HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CatalogError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server");
}
