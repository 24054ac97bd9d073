//! # Movie Filter
//!
//! A set of optional predicates conjoined to narrow a linear scan of stored
//! movies:
//! - title: case-insensitive substring
//! - year: exact equality
//! - rating range: inclusive bounds; unrated movies never match
//! - tags: the movie must carry every requested tag
//!
//! A filter is validated when it is built, so a `MovieFilter` value always has
//! bounds on the rating scale with `min <= max`.

use crate::primitives::{MAX_RATING, MIN_RATING};
use crate::{CatalogError, Movie, Rating};

/// Validated multi-criteria movie filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieFilter {
    /// Lowercased title fragment.
    title: Option<String>,
    year: Option<i32>,
    rating_min: Option<f64>,
    rating_max: Option<f64>,
    tags: Vec<String>,
}

impl MovieFilter {
    /// Build a filter from optional criteria.
    ///
    /// A blank title means "no title predicate". Tags are trimmed and
    /// deduplicated; blank tags are dropped.
    pub fn new(
        title: Option<&str>,
        year: Option<i32>,
        rating_min: Option<f64>,
        rating_max: Option<f64>,
        tags: &[String],
    ) -> Result<Self, CatalogError> {
        let rating_min = rating_min
            .map(|v| validate_bound(v, "Minimum"))
            .transpose()?;
        let rating_max = rating_max
            .map(|v| validate_bound(v, "Maximum"))
            .transpose()?;

        if let (Some(min), Some(max)) = (rating_min, rating_max)
            && min > max
        {
            return Err(CatalogError::InvalidFilter(format!(
                "Minimum rating {} cannot exceed maximum rating {}",
                min, max
            )));
        }

        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);

        Ok(Self {
            title,
            year,
            rating_min,
            rating_max,
            tags: normalize_tags(tags),
        })
    }

    /// A filter that matches every movie.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Filter on a case-insensitive title fragment.
    #[must_use]
    pub fn by_title(title: &str) -> Self {
        let trimmed = title.trim();
        Self {
            title: (!trimmed.is_empty()).then(|| trimmed.to_lowercase()),
            ..Self::default()
        }
    }

    /// Filter on an exact production year.
    #[must_use]
    pub fn by_year(year: i32) -> Self {
        Self {
            year: Some(year),
            ..Self::default()
        }
    }

    /// Filter on an inclusive rating range.
    pub fn by_rating_range(min: Option<f64>, max: Option<f64>) -> Result<Self, CatalogError> {
        Self::new(None, None, min, max, &[])
    }

    /// Filter on movies carrying all of `tags`.
    #[must_use]
    pub fn by_tags(tags: &[String]) -> Self {
        Self {
            tags: normalize_tags(tags),
            ..Self::default()
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The lowercased title fragment, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    #[must_use]
    pub fn rating_min(&self) -> Option<f64> {
        self.rating_min
    }

    #[must_use]
    pub fn rating_max(&self) -> Option<f64> {
        self.rating_max
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// True when no predicate is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.year.is_none()
            && self.rating_min.is_none()
            && self.rating_max.is_none()
            && self.tags.is_empty()
    }

    // =========================================================================
    // MATCHING
    // =========================================================================

    /// Check a movie against every predicate.
    #[must_use]
    pub fn matches(&self, movie: &Movie) -> bool {
        if let Some(fragment) = &self.title
            && !movie.title().to_lowercase().contains(fragment.as_str())
        {
            return false;
        }

        if let Some(year) = self.year
            && movie.year() != year
        {
            return false;
        }

        if self.rating_min.is_some() || self.rating_max.is_some() {
            let Some(rating) = movie.rating().map(Rating::value) else {
                return false;
            };
            if self.rating_min.is_some_and(|min| rating < min) {
                return false;
            }
            if self.rating_max.is_some_and(|max| rating > max) {
                return false;
            }
        }

        movie.has_all_tags(&self.tags)
    }

    /// Keep the movies that match, preserving their order.
    #[must_use]
    pub fn apply(&self, movies: Vec<Movie>) -> Vec<Movie> {
        movies.into_iter().filter(|m| self.matches(m)).collect()
    }
}

fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !normalized.iter().any(|t| t == tag) {
            normalized.push(tag.to_string());
        }
    }
    normalized
}

fn validate_bound(value: f64, which: &str) -> Result<f64, CatalogError> {
    if !value.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(CatalogError::InvalidFilter(format!(
            "{} rating {} must be between {} and {}",
            which, value, MIN_RATING, MAX_RATING
        )));
    }
    Ok(value)
}

// =============================================================================
// TESTS
// =============================================================================
