//! # Catalog
//!
//! The application surface of the core: command and query operations over a
//! storage backend.
//!
//! ## Storage Backends
//!
//! A catalog runs on one of two backends:
//! - `InMemory`: `InMemoryMovieRepository` (fast, volatile)
//! - `Persistent`: `RedbMovieRepository` (disk-backed, ACID)
//!
//! Every command loads the movie, applies the entity operation (which
//! validates) and saves it back. Nothing is written when validation fails.

use crate::movie::MovieRecord;
use crate::primitives::MAX_IMPORT_BATCH;
use crate::repository::MovieRepository;
use crate::stats::CatalogStatistics;
use crate::storage::{InMemoryMovieRepository, RedbMovieRepository};
use crate::{CatalogError, Movie, MovieFilter, MovieId, NewMovie};
use std::path::Path;

/// Storage backend for a Catalog.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory store (fast, volatile).
    InMemory(InMemoryMovieRepository),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbMovieRepository),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(InMemoryMovieRepository::new())
    }
}

impl MovieRepository for StorageBackend {
    fn save(&mut self, movie: &Movie) -> Result<(), CatalogError> {
        match self {
            Self::InMemory(repo) => repo.save(movie),
            Self::Persistent(repo) => repo.save(movie),
        }
    }

    fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, CatalogError> {
        match self {
            Self::InMemory(repo) => repo.find_by_id(id),
            Self::Persistent(repo) => repo.find_by_id(id),
        }
    }

    fn find_all(&self) -> Result<Vec<Movie>, CatalogError> {
        match self {
            Self::InMemory(repo) => repo.find_all(),
            Self::Persistent(repo) => repo.find_all(),
        }
    }

    fn find_by_filter(&self, filter: &MovieFilter) -> Result<Vec<Movie>, CatalogError> {
        match self {
            Self::InMemory(repo) => repo.find_by_filter(filter),
            Self::Persistent(repo) => repo.find_by_filter(filter),
        }
    }

    fn delete(&mut self, id: MovieId) -> Result<Option<Movie>, CatalogError> {
        match self {
            Self::InMemory(repo) => repo.delete(id),
            Self::Persistent(repo) => repo.delete(id),
        }
    }

    fn count(&self) -> Result<usize, CatalogError> {
        match self {
            Self::InMemory(repo) => repo.count(),
            Self::Persistent(repo) => repo.count(),
        }
    }
}

/// The movie catalog.
///
/// Catalog does NOT implement Clone: the redb handle cannot be shared.
#[derive(Debug, Default)]
pub struct Catalog {
    backend: StorageBackend,
}

impl Catalog {
    /// Create a new empty catalog with in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog backed by a redb database at `path`.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Ok(Self {
            backend: StorageBackend::Persistent(RedbMovieRepository::open(path)?),
        })
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Persistent(_))
    }

    /// Compact the database file. In-memory catalogs have nothing to
    /// reclaim and return `false`.
    pub fn compact(&mut self) -> Result<bool, CatalogError> {
        match &mut self.backend {
            StorageBackend::InMemory(_) => Ok(false),
            StorageBackend::Persistent(repo) => repo.compact(),
        }
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Validate and store a new movie.
    pub fn add_movie(&mut self, input: NewMovie) -> Result<Movie, CatalogError> {
        let movie = Movie::new(input)?;
        self.backend.save(&movie)?;
        Ok(movie)
    }

    /// Set or replace the rating of a movie.
    pub fn rate_movie(&mut self, id: MovieId, rating: f64) -> Result<Movie, CatalogError> {
        self.update(id, |movie| movie.rate(rating))
    }

    /// Add a tag to a movie. Blank or already present tags leave it unchanged.
    pub fn tag_movie(&mut self, id: MovieId, tag: &str) -> Result<Movie, CatalogError> {
        self.update(id, |movie| {
            movie.add_tag(tag);
            Ok(())
        })
    }

    /// Remove a tag from a movie. Missing tags leave it unchanged.
    pub fn untag_movie(&mut self, id: MovieId, tag: &str) -> Result<Movie, CatalogError> {
        self.update(id, |movie| {
            movie.remove_tag(tag);
            Ok(())
        })
    }

    /// Delete a movie, returning it.
    pub fn delete_movie(&mut self, id: MovieId) -> Result<Movie, CatalogError> {
        self.backend
            .delete(id)?
            .ok_or(CatalogError::MovieNotFound(id))
    }

    /// Import movie records, keeping their ids.
    ///
    /// Every record is validated before anything is written, so a bad record
    /// leaves the catalog untouched. Existing movies with the same id are
    /// replaced.
    pub fn import_records(&mut self, records: Vec<MovieRecord>) -> Result<usize, CatalogError> {
        if records.len() > MAX_IMPORT_BATCH {
            return Err(CatalogError::InvalidInput(format!(
                "Import of {} movies exceeds maximum {}",
                records.len(),
                MAX_IMPORT_BATCH
            )));
        }

        let movies = records
            .into_iter()
            .map(Movie::restore)
            .collect::<Result<Vec<_>, _>>()?;
        for movie in &movies {
            self.backend.save(movie)?;
        }
        Ok(movies.len())
    }

    fn update<F>(&mut self, id: MovieId, apply: F) -> Result<Movie, CatalogError>
    where
        F: FnOnce(&mut Movie) -> Result<(), CatalogError>,
    {
        let mut movie = self
            .backend
            .find_by_id(id)?
            .ok_or(CatalogError::MovieNotFound(id))?;
        apply(&mut movie)?;
        self.backend.save(&movie)?;
        Ok(movie)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Every movie in insertion order.
    pub fn all_movies(&self) -> Result<Vec<Movie>, CatalogError> {
        self.backend.find_all()
    }

    /// Lookup a single movie.
    pub fn get_movie(&self, id: MovieId) -> Result<Option<Movie>, CatalogError> {
        self.backend.find_by_id(id)
    }

    /// Movies whose title contains `text`, ignoring case.
    pub fn search_by_title(&self, text: &str) -> Result<Vec<Movie>, CatalogError> {
        self.backend.find_by_filter(&MovieFilter::by_title(text))
    }

    /// Movies released in `year`.
    pub fn movies_by_year(&self, year: i32) -> Result<Vec<Movie>, CatalogError> {
        self.backend.find_by_filter(&MovieFilter::by_year(year))
    }

    /// Rated movies within an inclusive rating range.
    pub fn movies_by_rating_range(
        &self,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<Vec<Movie>, CatalogError> {
        self.backend
            .find_by_filter(&MovieFilter::by_rating_range(min, max)?)
    }

    /// Movies carrying every tag in `tags`.
    pub fn movies_by_tags(&self, tags: &[String]) -> Result<Vec<Movie>, CatalogError> {
        self.backend.find_by_filter(&MovieFilter::by_tags(tags))
    }

    /// Movies matching an arbitrary filter.
    pub fn search(&self, filter: &MovieFilter) -> Result<Vec<Movie>, CatalogError> {
        self.backend.find_by_filter(filter)
    }

    /// Number of stored movies.
    pub fn movie_count(&self) -> Result<usize, CatalogError> {
        self.backend.count()
    }

    /// Aggregate statistics over the whole catalog.
    pub fn statistics(&self) -> Result<CatalogStatistics, CatalogError> {
        let movies = self.backend.find_all()?;
        Ok(CatalogStatistics::from_movies(&movies))
    }

    /// Every movie in its serializable form, in insertion order.
    pub fn export_records(&self) -> Result<Vec<MovieRecord>, CatalogError> {
        Ok(self
            .backend
            .find_all()?
            .iter()
            .map(MovieRecord::from)
            .collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rating;

    fn seeded() -> (Catalog, Movie) {
        let mut catalog = Catalog::new();
        let matrix = catalog
            .add_movie(
                NewMovie::new("The Matrix", 1999, "Simulation")
                    .with_rating(9.0)
                    .with_tags(["sci-fi", "action"]),
            )
            .expect("add");
        catalog
            .add_movie(NewMovie::new("Unrated Movie", 2023, "Not rated yet").with_tags(["mystery"]))
            .expect("add");
        (catalog, matrix)
    }

    #[test]
    fn add_movie_stores_it() {
        let (catalog, matrix) = seeded();
        assert_eq!(catalog.movie_count().expect("count"), 2);
        assert_eq!(catalog.get_movie(matrix.id()).expect("get"), Some(matrix));
    }

    #[test]
    fn add_invalid_movie_stores_nothing() {
        let mut catalog = Catalog::new();
        assert!(catalog.add_movie(NewMovie::new("", 2000, "")).is_err());
        assert_eq!(catalog.movie_count().expect("count"), 0);
    }

    #[test]
    fn rate_movie_updates_store() {
        let (mut catalog, matrix) = seeded();
        let rated = catalog.rate_movie(matrix.id(), 7.5).expect("rate");
        assert_eq!(rated.rating().map(Rating::value), Some(7.5));

        let stored = catalog.get_movie(matrix.id()).expect("get").expect("exists");
        assert_eq!(stored.rating().map(Rating::value), Some(7.5));
    }

    #[test]
    fn invalid_rate_leaves_store_untouched() {
        let (mut catalog, matrix) = seeded();
        assert!(matches!(
            catalog.rate_movie(matrix.id(), 12.0),
            Err(CatalogError::InvalidRating(_))
        ));
        let stored = catalog.get_movie(matrix.id()).expect("get").expect("exists");
        assert_eq!(stored.rating().map(Rating::value), Some(9.0));
    }

    #[test]
    fn unknown_movie_is_not_found() {
        let (mut catalog, _) = seeded();
        let ghost = MovieId::generate();
        assert!(matches!(
            catalog.rate_movie(ghost, 5.0),
            Err(CatalogError::MovieNotFound(id)) if id == ghost
        ));
        assert!(matches!(
            catalog.tag_movie(ghost, "x"),
            Err(CatalogError::MovieNotFound(_))
        ));
        assert!(matches!(
            catalog.untag_movie(ghost, "x"),
            Err(CatalogError::MovieNotFound(_))
        ));
        assert!(matches!(
            catalog.delete_movie(ghost),
            Err(CatalogError::MovieNotFound(_))
        ));
    }

    #[test]
    fn tag_and_untag() {
        let (mut catalog, matrix) = seeded();
        let tagged = catalog.tag_movie(matrix.id(), " classic ").expect("tag");
        assert_eq!(tagged.tags(), ["sci-fi", "action", "classic"]);

        let untagged = catalog.untag_movie(matrix.id(), "action").expect("untag");
        assert_eq!(untagged.tags(), ["sci-fi", "classic"]);

        let unchanged = catalog.untag_movie(matrix.id(), "horror").expect("untag");
        assert_eq!(unchanged.tags(), ["sci-fi", "classic"]);
    }

    #[test]
    fn delete_movie_removes_it() {
        let (mut catalog, matrix) = seeded();
        let deleted = catalog.delete_movie(matrix.id()).expect("delete");
        assert_eq!(deleted.title(), "The Matrix");
        assert_eq!(catalog.movie_count().expect("count"), 1);
        assert!(catalog.get_movie(matrix.id()).expect("get").is_none());
    }

    #[test]
    fn query_helpers() {
        let (catalog, _) = seeded();
        assert_eq!(catalog.search_by_title("matrix").expect("title").len(), 1);
        assert_eq!(catalog.movies_by_year(2023).expect("year").len(), 1);
        assert_eq!(
            catalog
                .movies_by_rating_range(Some(8.0), None)
                .expect("rating")
                .len(),
            1
        );
        assert_eq!(
            catalog
                .movies_by_tags(&["mystery".to_string()])
                .expect("tags")
                .len(),
            1
        );
        assert!(catalog.movies_by_rating_range(Some(9.0), Some(2.0)).is_err());
        assert_eq!(catalog.search(&MovieFilter::any()).expect("all").len(), 2);
    }

    #[test]
    fn statistics_over_catalog() {
        let (catalog, _) = seeded();
        let stats = catalog.statistics().expect("stats");
        assert_eq!(stats.total_movies, 2);
        assert_eq!(stats.movies_with_ratings, 1);
        assert_eq!(stats.average_rating, 9.0);
        assert_eq!(stats.year_range, Some((1999, 2023)));
    }

    #[test]
    fn export_then_import_into_fresh_catalog() {
        let (catalog, matrix) = seeded();
        let records = catalog.export_records().expect("export");

        let mut fresh = Catalog::new();
        assert_eq!(fresh.import_records(records).expect("import"), 2);
        assert_eq!(fresh.get_movie(matrix.id()).expect("get"), Some(matrix));
    }

    #[test]
    fn import_is_all_or_nothing() {
        let (catalog, _) = seeded();
        let mut records = catalog.export_records().expect("export");
        records[1].year = 1700;

        let mut fresh = Catalog::new();
        assert!(fresh.import_records(records).is_err());
        assert_eq!(fresh.movie_count().expect("count"), 0);
    }
}
