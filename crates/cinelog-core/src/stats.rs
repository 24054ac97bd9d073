//! # Catalog Statistics
//!
//! Aggregate figures computed in a single pass over the catalog.

use crate::{Movie, Rating};
use std::collections::BTreeSet;

/// Summary of the whole catalog.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogStatistics {
    /// Number of stored movies.
    pub total_movies: usize,
    /// Number of movies that carry a rating.
    pub movies_with_ratings: usize,
    /// Mean rating rounded to two decimals, `0.0` if nothing is rated.
    pub average_rating: f64,
    /// Every tag used in the catalog, sorted.
    pub unique_tags: BTreeSet<String>,
    /// Earliest and latest production year, `None` for an empty catalog.
    pub year_range: Option<(i32, i32)>,
}

impl CatalogStatistics {
    /// Compute statistics from a list of movies.
    #[must_use]
    pub fn from_movies<'a, I>(movies: I) -> Self
    where
        I: IntoIterator<Item = &'a Movie>,
    {
        let mut stats = Self::default();
        let mut rating_sum = 0.0_f64;

        for movie in movies {
            stats.total_movies += 1;

            if let Some(rating) = movie.rating().map(Rating::value) {
                stats.movies_with_ratings += 1;
                rating_sum += rating;
            }

            stats.unique_tags.extend(movie.tags().iter().cloned());

            let year = movie.year();
            stats.year_range = Some(match stats.year_range {
                Some((min, max)) => (min.min(year), max.max(year)),
                None => (year, year),
            });
        }

        if stats.movies_with_ratings > 0 {
            let mean = rating_sum / stats.movies_with_ratings as f64;
            stats.average_rating = (mean * 100.0).round() / 100.0;
        }

        stats
    }
}

// =============================================================================
// TESTS
// =============================================================================
