//! # Catalog Primitives
//!
//! Hardcoded bounds for the Cinelog catalog.
//!
//! These constants are compiled into the binary and are immutable at runtime.
//! The entity rules (year window, rating scale) live here next to the input
//! limits enforced at the API and CLI boundary.

use chrono::Datelike;

/// Year of the first motion pictures. Earlier years are rejected.
pub const MIN_YEAR: i32 = 1888;

/// How many years past the current year a movie may be dated.
///
/// Allows cataloging announced productions.
pub const FUTURE_YEAR_WINDOW: i32 = 10;

/// Lowest value on the rating scale (inclusive).
pub const MIN_RATING: f64 = 1.0;

/// Highest value on the rating scale (inclusive).
pub const MAX_RATING: f64 = 10.0;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for a movie title, in bytes.
pub const MAX_TITLE_LENGTH: usize = 512;

/// Maximum length for a movie description (64KB).
pub const MAX_DESCRIPTION_LENGTH: usize = 65536;

/// Maximum length for a single tag, in bytes.
pub const MAX_TAG_LENGTH: usize = 128;

/// Maximum number of tags accepted in a single request.
pub const MAX_TAGS_PER_REQUEST: usize = 100;

/// Maximum number of movies in a single import batch.
pub const MAX_IMPORT_BATCH: usize = 100_000;

/// Latest acceptable production year, relative to the local clock.
#[must_use]
pub fn max_year() -> i32 {
    chrono::Local::now().year().saturating_add(FUTURE_YEAR_WINDOW)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_scale_is_one_to_ten() {
        assert_eq!(MIN_RATING, 1.0);
        assert_eq!(MAX_RATING, 10.0);
    }

    #[test]
    fn max_year_is_ahead_of_now() {
        let now = chrono::Local::now().year();
        assert_eq!(max_year(), now + FUTURE_YEAR_WINDOW);
        assert!(max_year() > MIN_YEAR);
    }
}
