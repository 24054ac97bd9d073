//! # Storage Backends
//!
//! Implementations of `MovieRepository`:
//! - `InMemoryMovieRepository`: volatile, the default
//! - `RedbMovieRepository`: disk-backed ACID storage

mod memory;
mod redb_store;

pub use memory::InMemoryMovieRepository;
pub use redb_store::RedbMovieRepository;
