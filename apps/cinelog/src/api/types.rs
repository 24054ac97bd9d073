//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use cinelog_core::{
    CatalogError, CatalogStatistics, Movie, MovieFilter, NewMovie, Rating,
    primitives::{MAX_DESCRIPTION_LENGTH, MAX_TAG_LENGTH, MAX_TAGS_PER_REQUEST, MAX_TITLE_LENGTH},
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERROR / MESSAGE RESPONSES
// =============================================================================

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// Confirmation body for update endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

// =============================================================================
// MOVIE RESPONSE
// =============================================================================

/// JSON form of a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieResponse {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub description: String,
    pub rating: Option<f64>,
    pub tags: Vec<String>,
}

impl From<&Movie> for MovieResponse {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id().to_string(),
            title: movie.title().to_string(),
            year: movie.year(),
            description: movie.description().to_string(),
            rating: movie.rating().map(Rating::value),
            tags: movie.tags().to_vec(),
        }
    }
}

// =============================================================================
// CREATE MOVIE REQUEST
// =============================================================================

/// Body of `POST /movies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub year: i32,
    pub description: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateMovieRequest {
    /// Convert to a `NewMovie`, enforcing the API size limits.
    ///
    /// Entity rules (blank title, year window, rating scale) are checked by
    /// the catalog; this only rejects oversized payloads.
    pub fn to_new_movie(&self) -> Result<NewMovie, CatalogError> {
        check_length("Title", &self.title, MAX_TITLE_LENGTH)?;
        check_length("Description", &self.description, MAX_DESCRIPTION_LENGTH)?;
        check_tags(&self.tags)?;

        let mut input = NewMovie::new(&self.title, self.year, &self.description)
            .with_tags(self.tags.iter().map(String::as_str));
        input.rating = self.rating;
        Ok(input)
    }
}

// =============================================================================
// UPDATE REQUESTS
// =============================================================================

/// Body of `PUT /movies/{id}/rating`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRequest {
    pub rating: f64,
}

/// Body of `POST /movies/{id}/tags`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRequest {
    pub tag: String,
}

impl TagRequest {
    /// The trimmed tag, rejecting oversized values.
    ///
    /// A blank tag passes through; adding it leaves the movie unchanged.
    pub fn validated_tag(&self) -> Result<&str, CatalogError> {
        let tag = self.tag.trim();
        check_length("Tag", tag, MAX_TAG_LENGTH)?;
        Ok(tag)
    }
}

// =============================================================================
// LIST QUERY PARAMETERS
// =============================================================================

/// Query string of `GET /movies`.
///
/// Values are kept as strings so that empty parameters (`?year=`) mean
/// "not set" and malformed numbers produce a readable 400.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListMoviesParams {
    pub title: Option<String>,
    pub year: Option<String>,
    pub min_rating: Option<String>,
    pub max_rating: Option<String>,
    /// Comma separated list of required tags.
    pub tags: Option<String>,
}

impl ListMoviesParams {
    /// Parse the parameters into a `MovieFilter`.
    pub fn to_filter(&self) -> Result<MovieFilter, CatalogError> {
        if let Some(title) = &self.title {
            check_length("Title", title, MAX_TITLE_LENGTH)?;
        }
        let year = parse_param::<i32>("year", self.year.as_deref())?;
        let min_rating = parse_param::<f64>("min_rating", self.min_rating.as_deref())?;
        let max_rating = parse_param::<f64>("max_rating", self.max_rating.as_deref())?;

        let tags: Vec<String> = self
            .tags
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        check_tags(&tags)?;

        MovieFilter::new(self.title.as_deref(), year, min_rating, max_rating, &tags)
    }
}

fn parse_param<T: std::str::FromStr>(
    name: &str,
    raw: Option<&str>,
) -> Result<Option<T>, CatalogError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            CatalogError::InvalidFilter(format!("Invalid {} value '{}'", name, value))
        }),
    }
}

// =============================================================================
// STATISTICS RESPONSE
// =============================================================================

/// JSON form of the catalog statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub total_movies: usize,
    pub movies_with_ratings: usize,
    pub average_rating: f64,
    pub unique_tags: Vec<String>,
    /// `[min_year, max_year]`, `null` for an empty catalog.
    pub year_range: Option<[i32; 2]>,
}

impl From<CatalogStatistics> for StatisticsResponse {
    fn from(stats: CatalogStatistics) -> Self {
        Self {
            total_movies: stats.total_movies,
            movies_with_ratings: stats.movies_with_ratings,
            average_rating: stats.average_rating,
            unique_tags: stats.unique_tags.into_iter().collect(),
            year_range: stats.year_range.map(|(min, max)| [min, max]),
        }
    }
}

// =============================================================================
// BOUNDARY LIMITS
// =============================================================================

fn check_length(field: &str, value: &str, max: usize) -> Result<(), CatalogError> {
    if value.len() > max {
        return Err(CatalogError::InvalidInput(format!(
            "{} length {} exceeds maximum {} bytes",
            field,
            value.len(),
            max
        )));
    }
    Ok(())
}

fn check_tags(tags: &[String]) -> Result<(), CatalogError> {
    if tags.len() > MAX_TAGS_PER_REQUEST {
        return Err(CatalogError::InvalidInput(format!(
            "Too many tags: {} (maximum {})",
            tags.len(),
            MAX_TAGS_PER_REQUEST
        )));
    }
    for tag in tags {
        check_length("Tag", tag, MAX_TAG_LENGTH)?;
    }
    Ok(())
}
