//! # redb-backed Movie Storage
//!
//! A disk-backed catalog store using the redb embedded database.
//!
//! redb provides:
//! - ACID transactions
//! - Crash safety (copy-on-write B-trees)
//! - Zero configuration
//!
//! ## Layout
//!
//! Movies are stored under their insertion sequence number so that iterating
//! the `movies` table yields insertion order. Values are postcard-encoded
//! `MovieRecord`s and are validated again when read back.

use crate::movie::MovieRecord;
use crate::repository::MovieRepository;
use crate::{CatalogError, Movie, MovieId};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::collections::BTreeMap;
use std::path::Path;

/// Table for movies: sequence(u64) -> serialized MovieRecord bytes
const MOVIES: TableDefinition<u64, &[u8]> = TableDefinition::new("movies");

/// Table for the id index: MovieId bytes -> sequence(u64)
const ID_INDEX: TableDefinition<&[u8], u64> = TableDefinition::new("id_index");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

const NEXT_SEQ_KEY: &str = "next_seq";

fn io_err(e: impl std::fmt::Display) -> CatalogError {
    CatalogError::IoError(e.to_string())
}

fn encode(movie: &Movie) -> Result<Vec<u8>, CatalogError> {
    postcard::to_allocvec(&MovieRecord::from(movie))
        .map_err(|e| CatalogError::SerializationError(e.to_string()))
}

fn decode(bytes: &[u8]) -> Result<Movie, CatalogError> {
    let record: MovieRecord = postcard::from_bytes(bytes)
        .map_err(|e| CatalogError::SerializationError(e.to_string()))?;
    Movie::restore(record)
        .map_err(|e| CatalogError::SerializationError(format!("Stored movie is invalid: {}", e)))
}

/// A disk-backed movie store using redb.
///
/// Keeps the id -> sequence index cached in memory for fast lookups.
pub struct RedbMovieRepository {
    /// The redb database handle.
    db: Database,
    /// In-memory cache of id -> sequence mapping.
    id_cache: BTreeMap<MovieId, u64>,
    /// Next available sequence number.
    next_seq: u64,
}

impl std::fmt::Debug for RedbMovieRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbMovieRepository")
            .field("id_cache_size", &self.id_cache.len())
            .field("next_seq", &self.next_seq)
            .finish_non_exhaustive()
    }
}

impl RedbMovieRepository {
    /// Open or create a catalog database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(io_err)?;
            let _ = write_txn.open_table(MOVIES).map_err(io_err)?;
            let _ = write_txn.open_table(ID_INDEX).map_err(io_err)?;
            let _ = write_txn.open_table(METADATA).map_err(io_err)?;
            write_txn.commit().map_err(io_err)?;
        }

        let read_txn = db.begin_read().map_err(io_err)?;

        let next_seq = {
            let table = read_txn.open_table(METADATA).map_err(io_err)?;
            table
                .get(NEXT_SEQ_KEY)
                .map_err(io_err)?
                .map(|v| v.value())
                .unwrap_or(0)
        };

        let id_cache = {
            let table = read_txn.open_table(ID_INDEX).map_err(io_err)?;
            let mut cache = BTreeMap::new();
            for entry in table.iter().map_err(io_err)? {
                let (key, value) = entry.map_err(io_err)?;
                let uuid = uuid::Uuid::from_slice(key.value())
                    .map_err(|e| CatalogError::SerializationError(e.to_string()))?;
                cache.insert(MovieId::from(uuid), value.value());
            }
            cache
        };

        Ok(Self {
            db,
            id_cache,
            next_seq,
        })
    }

    /// Compact the database file.
    pub fn compact(&mut self) -> Result<bool, CatalogError> {
        self.db.compact().map_err(io_err)
    }
}

// =============================================================================
// MOVIEREPOSITORY TRAIT IMPLEMENTATION
// =============================================================================

impl MovieRepository for RedbMovieRepository {
    fn save(&mut self, movie: &Movie) -> Result<(), CatalogError> {
        let (seq, is_new) = match self.id_cache.get(&movie.id()) {
            Some(&seq) => (seq, false),
            None => (self.next_seq, true),
        };
        let next_seq = if is_new {
            self.next_seq.saturating_add(1)
        } else {
            self.next_seq
        };

        let bytes = encode(movie)?;
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut movies = write_txn.open_table(MOVIES).map_err(io_err)?;
            movies.insert(seq, bytes.as_slice()).map_err(io_err)?;
        }
        if is_new {
            let mut index = write_txn.open_table(ID_INDEX).map_err(io_err)?;
            index
                .insert(movie.id().as_uuid().as_bytes().as_slice(), seq)
                .map_err(io_err)?;
            let mut meta = write_txn.open_table(METADATA).map_err(io_err)?;
            meta.insert(NEXT_SEQ_KEY, next_seq).map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;

        // Update in-memory state only after successful commit.
        self.id_cache.insert(movie.id(), seq);
        self.next_seq = next_seq;
        Ok(())
    }

    fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, CatalogError> {
        let Some(&seq) = self.id_cache.get(&id) else {
            return Ok(None);
        };

        let read_txn = self.db.begin_read().map_err(io_err)?;
        let movies = read_txn.open_table(MOVIES).map_err(io_err)?;
        match movies.get(seq).map_err(io_err)? {
            Some(data) => decode(data.value()).map(Some),
            None => Ok(None),
        }
    }

    fn find_all(&self) -> Result<Vec<Movie>, CatalogError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let movies = read_txn.open_table(MOVIES).map_err(io_err)?;

        let mut result = Vec::new();
        for entry in movies.iter().map_err(io_err)? {
            let (_, value) = entry.map_err(io_err)?;
            result.push(decode(value.value())?);
        }
        Ok(result)
    }

    fn delete(&mut self, id: MovieId) -> Result<Option<Movie>, CatalogError> {
        let Some(&seq) = self.id_cache.get(&id) else {
            return Ok(None);
        };

        let write_txn = self.db.begin_write().map_err(io_err)?;
        let removed = {
            let mut movies = write_txn.open_table(MOVIES).map_err(io_err)?;
            let guard = movies.remove(seq).map_err(io_err)?;
            guard.map(|data| decode(data.value())).transpose()?
        };
        {
            let mut index = write_txn.open_table(ID_INDEX).map_err(io_err)?;
            index
                .remove(id.as_uuid().as_bytes().as_slice())
                .map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;

        self.id_cache.remove(&id);
        Ok(removed)
    }

    fn count(&self) -> Result<usize, CatalogError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let movies = read_txn.open_table(MOVIES).map_err(io_err)?;
        let count = movies.len().map_err(io_err)?;
        Ok(count as usize)
    }
}
