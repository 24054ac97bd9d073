//! # In-Memory Movie Storage
//!
//! The default, volatile catalog store.
//!
//! Movies are kept in a `BTreeMap` keyed by an insertion sequence number, with
//! a reverse index from `MovieId` to sequence. Iterating the primary map
//! therefore yields movies in insertion order.

use crate::repository::MovieRepository;
use crate::{CatalogError, Movie, MovieId};
use std::collections::BTreeMap;

/// Volatile movie store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMovieRepository {
    /// Movie storage: sequence -> Movie
    movies: BTreeMap<u64, Movie>,

    /// Reverse lookup: MovieId -> sequence
    id_index: BTreeMap<MovieId, u64>,

    /// Next available sequence number
    next_seq: u64,
}

impl InMemoryMovieRepository {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MovieRepository for InMemoryMovieRepository {
    fn save(&mut self, movie: &Movie) -> Result<(), CatalogError> {
        let seq = match self.id_index.get(&movie.id()) {
            Some(&seq) => seq,
            None => {
                let seq = self.next_seq;
                self.next_seq = self.next_seq.saturating_add(1);
                self.id_index.insert(movie.id(), seq);
                seq
            }
        };
        self.movies.insert(seq, movie.clone());
        Ok(())
    }

    fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, CatalogError> {
        Ok(self
            .id_index
            .get(&id)
            .and_then(|seq| self.movies.get(seq))
            .cloned())
    }

    fn find_all(&self) -> Result<Vec<Movie>, CatalogError> {
        Ok(self.movies.values().cloned().collect())
    }

    fn delete(&mut self, id: MovieId) -> Result<Option<Movie>, CatalogError> {
        Ok(self
            .id_index
            .remove(&id)
            .and_then(|seq| self.movies.remove(&seq)))
    }

    fn count(&self) -> Result<usize, CatalogError> {
        Ok(self.movies.len())
    }
}

// =============================================================================
// TESTS
// =============================================================================
