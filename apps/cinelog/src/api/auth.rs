//! # Authentication Module
//!
//! Simple API key authentication for the Cinelog HTTP API.
//!
//! ## Configuration
//!
//! The key comes from `[security] api_key` or `CINELOG_API_KEY`. When set,
//! all requests except `/health` require it.
//!
//! ## Usage
//!
//! Send the API key in the Authorization header:
//! ```text
//! Authorization: Bearer <your-api-key>
//! ```

use super::types::ErrorResponse;
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// The configured API key shared by the middleware.
#[derive(Clone)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    /// Build from configuration. Empty keys disable authentication.
    pub fn from_config(key: Option<&str>) -> Option<Self> {
        key.filter(|k| !k.is_empty()).map(|k| Self(Arc::from(k)))
    }

    /// Constant-time comparison against a provided key.
    ///
    /// Both keys are padded to the same length so `ct_eq` always runs over
    /// the same number of bytes.
    fn matches(&self, provided: &str) -> bool {
        let provided_bytes = provided.as_bytes();
        let expected_bytes = self.0.as_bytes();

        let max_len = provided_bytes.len().max(expected_bytes.len());
        let mut padded_provided = vec![0u8; max_len];
        let mut padded_expected = vec![0u8; max_len];
        padded_provided[..provided_bytes.len()].copy_from_slice(provided_bytes);
        padded_expected[..expected_bytes.len()].copy_from_slice(expected_bytes);

        let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
        bytes_match && provided_bytes.len() == expected_bytes.len()
    }
}

fn unauthorized() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new("Unauthorized")),
    )
}

/// API key authentication middleware.
///
/// - `/health` is always allowed (for load balancer health checks)
/// - All other endpoints require `Authorization: Bearer <key>`
pub async fn api_key_auth_middleware(
    State(expected): State<ApiKey>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    if request.uri().path() == "/health" {
        return Ok(next.run(request).await);
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(header_value) => {
            // Support both "Bearer <key>" and raw "<key>" formats
            let provided = header_value.strip_prefix("Bearer ").unwrap_or(header_value);
            if expected.matches(provided) {
                Ok(next.run(request).await)
            } else {
                tracing::warn!(
                    event = "auth_failure",
                    reason = "invalid_api_key",
                    "Authentication failed: invalid API key"
                );
                Err(unauthorized())
            }
        }
        None => {
            tracing::warn!(
                event = "auth_failure",
                reason = "missing_authorization_header",
                "Missing Authorization header"
            );
            Err(unauthorized())
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
