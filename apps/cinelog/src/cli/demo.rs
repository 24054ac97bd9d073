//! # Demo Shell
//!
//! `cinelog demo` seeds a handful of well-known movies and opens an
//! interactive prompt that accepts the regular subcommands.

use super::{Commands, run_command};
use clap::Parser;
use cinelog_core::{Catalog, CatalogError, NewMovie};
use std::io::{BufRead, Write};

/// Title, year, description, rating, tags.
type Sample = (&'static str, i32, &'static str, Option<f64>, &'static [&'static str]);

/// Movies seeded by the demo.
pub const SAMPLE_MOVIES: [Sample; 5] = [
    (
        "The Matrix",
        1999,
        "A computer programmer discovers reality is a simulation",
        Some(9.0),
        &["sci-fi", "action"],
    ),
    (
        "Inception",
        2010,
        "Dreams within dreams heist movie",
        Some(8.8),
        &["sci-fi", "thriller"],
    ),
    (
        "The Godfather",
        1972,
        "The aging patriarch transfers control to his son",
        Some(9.2),
        &["drama", "crime"],
    ),
    (
        "Pulp Fiction",
        1994,
        "Interconnected criminal stories in Los Angeles",
        Some(8.9),
        &["crime", "drama"],
    ),
    (
        "Unrated Movie",
        2023,
        "A movie without a rating yet",
        None,
        &["mystery"],
    ),
];

const EXIT_WORDS: [&str; 3] = ["exit", "quit", "q"];

/// One line typed at the demo prompt.
#[derive(Parser, Debug)]
#[command(name = "cinelog", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Commands,
}

/// Add the sample movies to `catalog`.
pub fn seed_sample_movies(catalog: &mut Catalog) -> Result<usize, CatalogError> {
    for (title, year, description, rating, tags) in SAMPLE_MOVIES {
        let mut input = NewMovie::new(title, year, description).with_tags(tags.iter().copied());
        input.rating = rating;
        catalog.add_movie(input)?;
    }
    Ok(SAMPLE_MOVIES.len())
}

/// Split a command line into words.
///
/// Single and double quotes group words; a backslash escapes the next
/// character outside single quotes.
pub fn split_words(line: &str) -> Result<Vec<String>, CatalogError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => {
                let escaped = chars.next().ok_or_else(|| {
                    CatalogError::InvalidInput("Trailing backslash".to_string())
                })?;
                current.push(escaped);
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(CatalogError::InvalidInput("Unterminated quote".to_string()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Seed the sample movies and run the interactive prompt until an exit
/// word or end of input. A persistent catalog that already holds movies is
/// used as-is.
pub fn run_repl<R, W>(
    catalog: &mut Catalog,
    input: R,
    mut out: W,
    json_mode: bool,
) -> Result<(), CatalogError>
where
    R: BufRead,
    W: Write,
{
    let io = |e: std::io::Error| CatalogError::IoError(e.to_string());

    let existing = catalog.movie_count()?;
    if catalog.is_persistent() && existing > 0 {
        tracing::info!("Demo reusing {} stored movies", existing);
        writeln!(out, "Demo catalog ready with {} stored movies.", existing).map_err(io)?;
    } else {
        let seeded = seed_sample_movies(catalog)?;
        tracing::info!("Demo catalog seeded with {} movies", seeded);
        writeln!(out, "Demo catalog ready with {} sample movies.", seeded).map_err(io)?;
    }
    writeln!(
        out,
        "Type a command (list, search <title>, add <title> <year> <desc>, stats, help)."
    )
    .map_err(io)?;
    writeln!(out, "Leave with 'exit', 'quit', 'q' or Ctrl-D.\n").map_err(io)?;

    let mut lines = input.lines();
    loop {
        write!(out, "cinelog> ").map_err(io)?;
        out.flush().map_err(io)?;

        let Some(line) = lines.next() else {
            writeln!(out).map_err(io)?;
            break;
        };
        let line = line.map_err(io)?;
        let line = line.trim();

        if EXIT_WORDS.contains(&line.to_ascii_lowercase().as_str()) {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let reply = match split_words(line) {
            Err(e) => format!("✗ {}", e),
            Ok(words) => match ShellLine::try_parse_from(words) {
                Err(e) => e.render().to_string(),
                Ok(ShellLine {
                    command: Commands::Server { .. } | Commands::Demo,
                }) => "✗ This command is not available in the demo shell".to_string(),
                Ok(ShellLine { command }) => match run_command(catalog, command, json_mode) {
                    Ok(text) => text,
                    Err(e) => format!("✗ {}", e),
                },
            },
        };
        writeln!(out, "{}\n", reply.trim_end()).map_err(io)?;
    }

    writeln!(out, "Demo session ended.").map_err(io)?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
