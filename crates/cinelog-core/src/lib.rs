//! # cinelog-core
//!
//! The movie catalog engine for Cinelog - THE CATALOG.
//!
//! This crate holds every rule of the personal movie catalog:
//! - the `Movie` entity and its validation (title, year window, rating scale,
//!   unique tags)
//! - `MovieFilter`, the multi-criteria predicate set used for searches
//! - the `MovieRepository` storage seam with in-memory and redb backends
//! - `Catalog`, the command and query operations used by the CLI and the API
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust)
//! - No logging: errors are returned, adapters decide how to report them
//! - Results come back in insertion order

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod filter;
pub mod movie;
pub mod primitives;
pub mod repository;
pub mod stats;
pub mod storage;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{CatalogError, MovieId, Rating};

// =============================================================================
// RE-EXPORTS: Catalog Engine
// =============================================================================

pub use catalog::{Catalog, StorageBackend};
pub use filter::MovieFilter;
pub use movie::{Movie, MovieRecord, NewMovie};
pub use repository::MovieRepository;
pub use stats::CatalogStatistics;
pub use storage::{InMemoryMovieRepository, RedbMovieRepository};
