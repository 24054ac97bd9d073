//! # Movie Entity
//!
//! The sole domain entity of the catalog.
//!
//! A `Movie` enforces its own invariants at every mutation:
//! - the title is trimmed and never empty
//! - the year lies in `[MIN_YEAR, current year + FUTURE_YEAR_WINDOW]`
//! - the rating, when present, lies on the 1.0 - 10.0 scale
//! - tags are trimmed, non-blank and unique (first-seen order kept)
//!
//! `MovieRecord` is the plain serializable form used by storage backends and
//! catalog export. Turning a record back into a `Movie` re-runs validation.

use crate::primitives::{MIN_YEAR, max_year};
use crate::{CatalogError, MovieId, Rating};
use serde::{Deserialize, Serialize};

// =============================================================================
// NEW MOVIE INPUT
// =============================================================================

/// Unvalidated input for creating a movie.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub rating: Option<f64>,
    pub tags: Vec<String>,
}

impl NewMovie {
    /// Create input with the required fields only.
    #[must_use]
    pub fn new(title: impl Into<String>, year: i32, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year,
            description: description.into(),
            rating: None,
            tags: Vec::new(),
        }
    }

    /// Attach an initial rating.
    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Attach initial tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

// =============================================================================
// MOVIE
// =============================================================================

/// A cataloged movie.
///
/// Fields are private so that every instance satisfies the entity rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    id: MovieId,
    title: String,
    year: i32,
    description: String,
    rating: Option<Rating>,
    tags: Vec<String>,
}

impl Movie {
    /// Create a new movie with a freshly generated identifier.
    pub fn new(input: NewMovie) -> Result<Self, CatalogError> {
        Self::build(MovieId::generate(), input)
    }

    /// Rebuild a movie from its stored form, keeping the stored identifier.
    ///
    /// Title, year and rating are validated again; tags are normalized.
    pub fn restore(record: MovieRecord) -> Result<Self, CatalogError> {
        let MovieRecord {
            id,
            title,
            year,
            description,
            rating,
            tags,
        } = record;
        Self::build(
            id,
            NewMovie {
                title,
                year,
                description,
                rating,
                tags,
            },
        )
    }

    fn build(id: MovieId, input: NewMovie) -> Result<Self, CatalogError> {
        let title = validate_title(&input.title)?;
        let year = validate_year(input.year)?;
        let rating = input.rating.map(Rating::new).transpose()?;

        let mut movie = Self {
            id,
            title,
            year,
            description: input.description,
            rating,
            tags: Vec::with_capacity(input.tags.len()),
        };
        for tag in &input.tags {
            movie.add_tag(tag);
        }
        Ok(movie)
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn id(&self) -> MovieId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The rating, `None` if the movie is unrated.
    #[must_use]
    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    /// Tags in the order they were first added.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    // =========================================================================
    // BEHAVIOR
    // =========================================================================

    /// Set or replace the rating.
    ///
    /// On error the previous rating is kept.
    pub fn rate(&mut self, rating: f64) -> Result<(), CatalogError> {
        self.rating = Some(Rating::new(rating)?);
        Ok(())
    }

    /// Add a tag. Returns `true` if the tag set changed.
    ///
    /// Blank tags and tags already present are ignored.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Remove a tag. Returns `true` if the tag set changed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    /// Check whether the movie carries a tag (exact match).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Check whether the movie carries every tag in `required`.
    #[must_use]
    pub fn has_all_tags(&self, required: &[String]) -> bool {
        required.iter().all(|tag| self.has_tag(tag))
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

fn validate_title(title: &str) -> Result<String, CatalogError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidTitle);
    }
    Ok(trimmed.to_string())
}

fn validate_year(year: i32) -> Result<i32, CatalogError> {
    let max = max_year();
    if !(MIN_YEAR..=max).contains(&year) {
        return Err(CatalogError::InvalidYear {
            year,
            min: MIN_YEAR,
            max,
        });
    }
    Ok(year)
}

// =============================================================================
// SERIALIZABLE FORM
// =============================================================================

/// Plain serializable representation of a movie.
///
/// Used for storage and for JSON export/import. Not guaranteed valid until
/// passed through `Movie::restore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<&Movie> for MovieRecord {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            year: movie.year,
            description: movie.description.clone(),
            rating: movie.rating.map(Rating::value),
            tags: movie.tags.clone(),
        }
    }
}

impl TryFrom<MovieRecord> for Movie {
    type Error = CatalogError;

    fn try_from(record: MovieRecord) -> Result<Self, Self::Error> {
        Self::restore(record)
    }
}

// =============================================================================
// TESTS
// =============================================================================
