//! # Movie Repository
//!
//! The storage seam of the catalog.
//!
//! All fallible operations return `Result<T, CatalogError>` so that the
//! in-memory and the disk-backed stores can be used uniformly.

use crate::{CatalogError, Movie, MovieFilter, MovieId};

// =============================================================================
// MOVIEREPOSITORY TRAIT
// =============================================================================

/// The MovieRepository trait defines the catalog storage operations.
///
/// Implementations return movies in insertion order. Saving a movie whose id
/// is already stored replaces it in place.
pub trait MovieRepository {
    /// Insert a new movie or replace the stored movie with the same id.
    fn save(&mut self, movie: &Movie) -> Result<(), CatalogError>;

    /// Lookup a movie by its id.
    fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, CatalogError>;

    /// Get every stored movie in insertion order.
    fn find_all(&self) -> Result<Vec<Movie>, CatalogError>;

    /// Get the movies matching a filter, in insertion order.
    ///
    /// The default implementation is a linear scan over `find_all`.
    fn find_by_filter(&self, filter: &MovieFilter) -> Result<Vec<Movie>, CatalogError> {
        let movies = self.find_all()?;
        if filter.is_empty() {
            return Ok(movies);
        }
        Ok(filter.apply(movies))
    }

    /// Remove a movie. Returns the removed movie, `None` if it was absent.
    fn delete(&mut self, id: MovieId) -> Result<Option<Movie>, CatalogError>;

    /// Get the number of stored movies.
    fn count(&self) -> Result<usize, CatalogError>;
}
