//! # Core Type Definitions
//!
//! This module contains the value types shared by every layer of the catalog:
//! - Movie identity (`MovieId`)
//! - Bounded numeric values (`Rating`)
//! - Error types (`CatalogError`)
//!
//! Values of these types are valid by construction. Anything that reaches the
//! repository has already passed the checks below.

use crate::primitives::{MAX_RATING, MIN_RATING};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

// =============================================================================
// MOVIE IDENTIFIER
// =============================================================================

/// Opaque unique identifier of a cataloged movie.
///
/// Generated once when the movie is created and never changed afterwards.
/// The textual form is the hyphenated UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(Uuid);

impl MovieId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its textual form.
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| CatalogError::InvalidId(s.to_string()))
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for MovieId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for MovieId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

// =============================================================================
// RATING
// =============================================================================

/// A movie rating on the closed scale `[1.0, 10.0]`.
///
/// NaN and infinities are rejected, so a `Rating` always compares totally.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Rating(f64);

impl Rating {
    /// Create a rating, validating the scale bounds.
    pub fn new(value: f64) -> Result<Self, CatalogError> {
        if !value.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(CatalogError::InvalidRating(value));
        }
        Ok(Self(value))
    }

    /// Get the raw rating value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Rating {
    type Error = CatalogError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Cinelog catalog.
///
/// - No silent failures
/// - Use `Result<T, CatalogError>` for fallible operations
/// - The catalog should never panic; all errors must be recoverable
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The movie title is empty or whitespace-only.
    #[error("Movie title cannot be empty or whitespace-only")]
    InvalidTitle,

    /// The production year is outside the accepted window.
    #[error("Movie year {year} must be between {min} and {max}")]
    InvalidYear { year: i32, min: i32, max: i32 },

    /// The rating is outside the rating scale.
    #[error("Movie rating {0} must be between 1.0 and 10.0")]
    InvalidRating(f64),

    /// A search filter is malformed (bound out of range, min above max).
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A string could not be parsed as a movie identifier.
    #[error("Invalid movie ID: {0}")]
    InvalidId(String),

    /// The requested movie does not exist in the catalog.
    #[error("Movie with ID '{0}' not found")]
    MovieNotFound(MovieId),

    /// Input rejected at the API or CLI boundary.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl CatalogError {
    /// Whether this error was caused by the caller's input rather than by
    /// storage. Adapters map these to "bad request" style responses.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidTitle
                | Self::InvalidYear { .. }
                | Self::InvalidRating(_)
                | Self::InvalidFilter(_)
                | Self::InvalidId(_)
                | Self::InvalidInput(_)
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_accepts_scale_bounds() {
        assert_eq!(Rating::new(1.0).expect("min").value(), 1.0);
        assert_eq!(Rating::new(10.0).expect("max").value(), 10.0);
        assert_eq!(Rating::new(7.5).expect("mid").value(), 7.5);
    }

    #[test]
    fn rating_rejects_out_of_scale() {
        assert!(matches!(
            Rating::new(0.99),
            Err(CatalogError::InvalidRating(_))
        ));
        assert!(matches!(
            Rating::new(10.01),
            Err(CatalogError::InvalidRating(_))
        ));
        assert!(Rating::new(-3.0).is_err());
    }

    #[test]
    fn rating_rejects_non_finite() {
        assert!(Rating::new(f64::NAN).is_err());
        assert!(Rating::new(f64::INFINITY).is_err());
    }

    #[test]
    fn rating_deserialize_validates() {
        let ok: Rating = serde_json::from_str("8.5").expect("valid");
        assert_eq!(ok.value(), 8.5);
        assert!(serde_json::from_str::<Rating>("11.0").is_err());
    }

    #[test]
    fn movie_id_display_parse() {
        let id = MovieId::generate();
        let parsed = MovieId::parse(&id.to_string()).expect("parse");
        assert_eq!(id, parsed);
    }

    #[test]
    fn movie_id_parse_rejects_garbage() {
        let err = MovieId::parse("not-a-movie").expect_err("garbage");
        assert!(matches!(err, CatalogError::InvalidId(ref s) if s == "not-a-movie"));
    }

    #[test]
    fn movie_ids_are_unique() {
        assert_ne!(MovieId::generate(), MovieId::generate());
    }

    #[test]
    fn validation_errors_are_classified() {
        assert!(CatalogError::InvalidTitle.is_validation());
        assert!(CatalogError::InvalidRating(0.0).is_validation());
        assert!(!CatalogError::MovieNotFound(MovieId::generate()).is_validation());
        assert!(!CatalogError::IoError("disk".to_string()).is_validation());
    }
}
