//! # Cinelog CLI Module
//!
//! This module implements the CLI interface for Cinelog.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `add` - Add a movie
//! - `list` - List movies, optionally filtered
//! - `search` - Search movies by title
//! - `show` - Show one movie
//! - `rate` / `tag` / `untag` - Update a movie
//! - `delete` - Delete a movie
//! - `stats` - Show catalog statistics (the default)
//! - `export` / `import` - JSON export and import
//! - `demo` - Seed sample movies and open an interactive shell

mod commands;
mod demo;

use crate::config::{Backend, CinelogConfig, StorageConfig, resolve_config_path};
use clap::{Parser, Subcommand};
use cinelog_core::{Catalog, CatalogError};
use std::path::PathBuf;

pub use commands::*;
pub use demo::{SAMPLE_MOVIES, run_repl, seed_sample_movies, split_words};

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Cinelog - personal movie catalog
///
/// Keep track of the movies you have seen: ratings, tags and notes.
#[derive(Parser, Debug)]
#[command(name = "cinelog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file (or CINELOG_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the redb database
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Storage backend
    #[arg(short = 'B', long, global = true, value_enum)]
    pub backend: Option<Backend>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Add a new movie to the catalog
    Add {
        /// Movie title
        title: String,

        /// Release year
        year: i32,

        /// Movie description or synopsis
        description: String,

        /// Movie rating (1.0-10.0)
        #[arg(long)]
        rating: Option<f64>,

        /// Movie tags
        #[arg(long, num_args = 0..)]
        tags: Vec<String>,
    },

    /// List movies in the catalog
    List {
        /// Filter by release year
        #[arg(long)]
        year: Option<i32>,

        /// Minimum rating filter
        #[arg(long)]
        min_rating: Option<f64>,

        /// Maximum rating filter
        #[arg(long)]
        max_rating: Option<f64>,

        /// Filter by tags (must have all)
        #[arg(long, num_args = 0..)]
        tags: Vec<String>,
    },

    /// Search movies by title
    Search {
        /// Title search term
        title: String,
    },

    /// Show a single movie
    Show {
        /// Movie ID
        id: String,
    },

    /// Rate a movie
    Rate {
        /// Movie ID to rate
        id: String,

        /// Rating (1.0-10.0)
        rating: f64,
    },

    /// Add a tag to a movie
    Tag {
        /// Movie ID to tag
        id: String,

        /// Tag to add
        tag: String,
    },

    /// Remove a tag from a movie
    Untag {
        /// Movie ID to untag
        id: String,

        /// Tag to remove
        tag: String,
    },

    /// Delete a movie from the catalog
    Delete {
        /// Movie ID to delete
        id: String,
    },

    /// Show catalog statistics
    Stats,

    /// Export the catalog as JSON
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import movies from a JSON export
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Seed sample movies and open an interactive shell
    Demo,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

impl Cli {
    /// Resolve the layered configuration: file, environment, then flags.
    pub fn resolve_config(&self) -> Result<CinelogConfig, CatalogError> {
        let path = resolve_config_path(self.config.clone());
        let mut config = CinelogConfig::load(path.as_deref())?;

        if let Some(backend) = self.backend {
            config.storage.backend = backend;
        }
        if let Some(database) = &self.database {
            config.storage.database = database.clone();
        }
        if let Some(Commands::Server { host, port }) = &self.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }
        Ok(config)
    }
}

/// Open the catalog described by the storage configuration.
pub fn open_catalog(storage: &StorageConfig) -> Result<Catalog, CatalogError> {
    match storage.backend {
        Backend::Memory => Ok(Catalog::new()),
        Backend::Redb => {
            tracing::debug!("Opening redb catalog at {}", storage.database.display());
            Catalog::with_redb(&storage.database)
        }
    }
}

/// Report a failed command to the user.
///
/// Caller mistakes (unknown ids, invalid values) go to stderr as a plain
/// message; storage failures are logged as errors.
pub fn report_error(err: &CatalogError) {
    if err.is_validation() || matches!(err, CatalogError::MovieNotFound(_)) {
        eprintln!("✗ {}", err);
    } else {
        tracing::error!("Error: {}", err);
    }
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CatalogError> {
    let config = cli.resolve_config()?;
    if cli.verbose {
        tracing::info!(
            backend = %config.storage.backend,
            database = %config.storage.database.display(),
            "Configuration resolved"
        );
    }

    let mut catalog = open_catalog(&config.storage)?;

    match cli.command {
        Some(Commands::Server { .. }) => {
            crate::api::run_server(&config.server.addr(), catalog, &config.security).await
        }
        Some(Commands::Demo) => {
            let stdin = std::io::stdin();
            run_repl(
                &mut catalog,
                stdin.lock(),
                std::io::stdout(),
                cli.json_mode,
            )
        }
        Some(command) => {
            let output = run_command(&mut catalog, command, cli.json_mode)?;
            println!("{}", output);
            Ok(())
        }
        None => {
            // No subcommand - show statistics by default
            println!("{}", cmd_stats(&catalog, cli.json_mode)?);
            Ok(())
        }
    }
}
