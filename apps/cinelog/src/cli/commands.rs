//! # CLI Command Implementations
//!
//! Every command runs against an open `Catalog` and returns the text to
//! print, so the one-shot CLI and the demo shell share them.

use super::Commands;
use crate::api::StatisticsResponse;
use cinelog_core::{
    Catalog, CatalogError, Movie, MovieFilter, MovieId, MovieRecord, NewMovie, Rating,
};
use serde::Serialize;
use std::path::Path;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CatalogError> {
    serde_json::to_string_pretty(value).map_err(|e| CatalogError::SerializationError(e.to_string()))
}

fn record_json(movie: &Movie) -> Result<String, CatalogError> {
    to_json(&MovieRecord::from(movie))
}

fn list_json(movies: &[Movie]) -> Result<String, CatalogError> {
    let records: Vec<MovieRecord> = movies.iter().map(MovieRecord::from).collect();
    to_json(&records)
}

fn format_rating(rating: Option<Rating>) -> String {
    match rating {
        Some(r) => format!("{:?}/10", r.value()),
        None => "Unrated".to_string(),
    }
}

/// Three-line summary used by `list`, `search` and `show`.
fn movie_summary(movie: &Movie) -> String {
    let tags = if movie.tags().is_empty() {
        String::new()
    } else {
        format!(" [{}]", movie.tags().join(", "))
    };
    format!(
        "  • {} ({}) - {}{}\n    ID: {}\n    {}",
        movie.title(),
        movie.year(),
        format_rating(movie.rating()),
        tags,
        movie.id(),
        movie.description()
    )
}

/// Run a catalog command. `server` and `demo` are handled by the caller.
pub fn run_command(
    catalog: &mut Catalog,
    command: Commands,
    json_mode: bool,
) -> Result<String, CatalogError> {
    match command {
        Commands::Add {
            title,
            year,
            description,
            rating,
            tags,
        } => {
            let mut input = NewMovie::new(title, year, description).with_tags(tags);
            input.rating = rating;
            cmd_add(catalog, input, json_mode)
        }
        Commands::List {
            year,
            min_rating,
            max_rating,
            tags,
        } => cmd_list(catalog, year, min_rating, max_rating, &tags, json_mode),
        Commands::Search { title } => cmd_search(catalog, &title, json_mode),
        Commands::Show { id } => cmd_show(catalog, &id, json_mode),
        Commands::Rate { id, rating } => cmd_rate(catalog, &id, rating, json_mode),
        Commands::Tag { id, tag } => cmd_tag(catalog, &id, &tag, json_mode),
        Commands::Untag { id, tag } => cmd_untag(catalog, &id, &tag, json_mode),
        Commands::Delete { id } => cmd_delete(catalog, &id, json_mode),
        Commands::Stats => cmd_stats(catalog, json_mode),
        Commands::Export { output } => cmd_export(catalog, &output, json_mode),
        Commands::Import { input } => cmd_import(catalog, &input, json_mode),
        Commands::Server { .. } | Commands::Demo => Err(CatalogError::InvalidInput(
            "This command is not available here".to_string(),
        )),
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Add a movie.
pub fn cmd_add(
    catalog: &mut Catalog,
    input: NewMovie,
    json_mode: bool,
) -> Result<String, CatalogError> {
    let movie = catalog.add_movie(input)?;
    tracing::debug!(id = %movie.id(), "Movie added");

    if json_mode {
        return record_json(&movie);
    }

    let mut lines = vec![
        format!("✓ Added movie: {} ({})", movie.title(), movie.year()),
        format!("  ID: {}", movie.id()),
    ];
    if movie.rating().is_some() {
        lines.push(format!("  Rating: {}", format_rating(movie.rating())));
    }
    if !movie.tags().is_empty() {
        lines.push(format!("  Tags: {}", movie.tags().join(", ")));
    }
    Ok(lines.join("\n"))
}

/// List movies matching optional criteria.
pub fn cmd_list(
    catalog: &Catalog,
    year: Option<i32>,
    min_rating: Option<f64>,
    max_rating: Option<f64>,
    tags: &[String],
    json_mode: bool,
) -> Result<String, CatalogError> {
    let filter = MovieFilter::new(None, year, min_rating, max_rating, tags)?;
    let movies = catalog.search(&filter)?;

    if json_mode {
        return list_json(&movies);
    }
    if movies.is_empty() {
        return Ok("No movies found matching the criteria.".to_string());
    }

    let mut lines = vec![format!("Found {} movie(s):", movies.len())];
    lines.extend(movies.iter().map(movie_summary));
    Ok(lines.join("\n"))
}

/// Search movies by title substring.
pub fn cmd_search(catalog: &Catalog, title: &str, json_mode: bool) -> Result<String, CatalogError> {
    let movies = catalog.search_by_title(title)?;

    if json_mode {
        return list_json(&movies);
    }
    if movies.is_empty() {
        return Ok(format!("No movies found matching title: {}", title));
    }

    let mut lines = vec![format!(
        "Found {} movie(s) matching '{}':",
        movies.len(),
        title
    )];
    lines.extend(movies.iter().map(movie_summary));
    Ok(lines.join("\n"))
}

/// Show a single movie.
pub fn cmd_show(catalog: &Catalog, id: &str, json_mode: bool) -> Result<String, CatalogError> {
    let movie_id = MovieId::parse(id)?;
    let movie = catalog
        .get_movie(movie_id)?
        .ok_or(CatalogError::MovieNotFound(movie_id))?;

    if json_mode {
        return record_json(&movie);
    }
    Ok(movie_summary(&movie))
}

/// Rate a movie.
pub fn cmd_rate(
    catalog: &mut Catalog,
    id: &str,
    rating: f64,
    json_mode: bool,
) -> Result<String, CatalogError> {
    let movie = catalog.rate_movie(MovieId::parse(id)?, rating)?;

    if json_mode {
        return record_json(&movie);
    }
    Ok(format!(
        "✓ Rated '{}': {}",
        movie.title(),
        format_rating(movie.rating())
    ))
}

/// Add a tag to a movie.
pub fn cmd_tag(
    catalog: &mut Catalog,
    id: &str,
    tag: &str,
    json_mode: bool,
) -> Result<String, CatalogError> {
    let movie = catalog.tag_movie(MovieId::parse(id)?, tag)?;

    if json_mode {
        return record_json(&movie);
    }
    Ok(format!("✓ Added tag '{}' to '{}'", tag.trim(), movie.title()))
}

/// Remove a tag from a movie.
pub fn cmd_untag(
    catalog: &mut Catalog,
    id: &str,
    tag: &str,
    json_mode: bool,
) -> Result<String, CatalogError> {
    let movie = catalog.untag_movie(MovieId::parse(id)?, tag)?;

    if json_mode {
        return record_json(&movie);
    }
    Ok(format!(
        "✓ Removed tag '{}' from '{}'",
        tag.trim(),
        movie.title()
    ))
}

/// Delete a movie.
pub fn cmd_delete(catalog: &mut Catalog, id: &str, json_mode: bool) -> Result<String, CatalogError> {
    let movie = catalog.delete_movie(MovieId::parse(id)?)?;

    if json_mode {
        return record_json(&movie);
    }
    Ok(format!(
        "✓ Deleted movie: {} ({})",
        movie.title(),
        movie.year()
    ))
}

/// Show catalog statistics.
pub fn cmd_stats(catalog: &Catalog, json_mode: bool) -> Result<String, CatalogError> {
    let stats = catalog.statistics()?;

    if json_mode {
        return to_json(&StatisticsResponse::from(stats));
    }

    let mut lines = vec![
        "=== Movie Catalog Statistics ===".to_string(),
        format!("Total movies: {}", stats.total_movies),
        format!("Movies with ratings: {}", stats.movies_with_ratings),
    ];
    if stats.movies_with_ratings > 0 {
        lines.push(format!("Average rating: {:?}/10", stats.average_rating));
    }
    if let Some((min, max)) = stats.year_range {
        lines.push(format!("Year range: {} - {}", min, max));
    }
    if !stats.unique_tags.is_empty() {
        let tags: Vec<&str> = stats.unique_tags.iter().map(String::as_str).collect();
        lines.push(format!(
            "Unique tags ({}): {}",
            tags.len(),
            tags.join(", ")
        ));
    }
    Ok(lines.join("\n"))
}

/// Export every movie to a JSON file.
pub fn cmd_export(catalog: &Catalog, output: &Path, json_mode: bool) -> Result<String, CatalogError> {
    let records = catalog.export_records()?;
    let json = to_json(&records)?;
    std::fs::write(output, json).map_err(|e| {
        CatalogError::IoError(format!("Cannot write {}: {}", output.display(), e))
    })?;
    tracing::info!("Exported {} movies to {}", records.len(), output.display());

    if json_mode {
        return to_json(&serde_json::json!({
            "exported": records.len(),
            "path": output.display().to_string(),
        }));
    }
    Ok(format!(
        "✓ Exported {} movie(s) to {}",
        records.len(),
        output.display()
    ))
}

/// Import movies from a JSON export.
///
/// The import is all-or-nothing: one invalid record rejects the file.
pub fn cmd_import(
    catalog: &mut Catalog,
    input: &Path,
    json_mode: bool,
) -> Result<String, CatalogError> {
    let text = std::fs::read_to_string(input).map_err(|e| {
        CatalogError::IoError(format!("Cannot read {}: {}", input.display(), e))
    })?;
    let records: Vec<MovieRecord> = serde_json::from_str(&text).map_err(|e| {
        CatalogError::InvalidInput(format!("{} is not a movie export: {}", input.display(), e))
    })?;
    let imported = catalog.import_records(records)?;
    tracing::info!("Imported {} movies from {}", imported, input.display());

    if catalog.is_persistent() && catalog.compact()? {
        tracing::debug!("Database compacted after import");
    }

    if json_mode {
        return to_json(&serde_json::json!({
            "imported": imported,
            "path": input.display().to_string(),
        }));
    }
    Ok(format!(
        "✓ Imported {} movie(s) from {}",
        imported,
        input.display()
    ))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with_matrix() -> (Catalog, Movie) {
        let mut catalog = Catalog::new();
        let movie = catalog
            .add_movie(
                NewMovie::new("The Matrix", 1999, "Simulation")
                    .with_rating(9.0)
                    .with_tags(["sci-fi", "action"]),
            )
            .expect("add");
        (catalog, movie)
    }

    #[test]
    fn add_output() {
        let mut catalog = Catalog::new();
        let out = cmd_add(
            &mut catalog,
            NewMovie::new("Heat", 1995, "Crime").with_rating(8.3).with_tags(["crime"]),
            false,
        )
        .expect("add");

        assert!(out.starts_with("✓ Added movie: Heat (1995)\n  ID: "));
        assert!(out.contains("  Rating: 8.3/10"));
        assert!(out.ends_with("  Tags: crime"));
    }

    #[test]
    fn list_output() {
        let (catalog, movie) = catalog_with_matrix();
        let out = cmd_list(&catalog, None, None, None, &[], false).expect("list");
        assert_eq!(
            out,
            format!(
                "Found 1 movie(s):\n  • The Matrix (1999) - 9.0/10 [sci-fi, action]\n    ID: {}\n    Simulation",
                movie.id()
            )
        );

        let none = cmd_list(&catalog, Some(2000), None, None, &[], false).expect("list");
        assert_eq!(none, "No movies found matching the criteria.");
    }

    #[test]
    fn list_rejects_inverted_range() {
        let (catalog, _) = catalog_with_matrix();
        let result = cmd_list(&catalog, None, Some(9.0), Some(3.0), &[], false);
        assert!(matches!(result, Err(CatalogError::InvalidFilter(_))));
    }

    #[test]
    fn search_output() {
        let (catalog, _) = catalog_with_matrix();
        let out = cmd_search(&catalog, "matrix", false).expect("search");
        assert!(out.starts_with("Found 1 movie(s) matching 'matrix':"));
        assert_eq!(
            cmd_search(&catalog, "alien", false).expect("search"),
            "No movies found matching title: alien"
        );
    }

    #[test]
    fn update_commands() {
        let (mut catalog, movie) = catalog_with_matrix();
        let id = movie.id().to_string();

        assert_eq!(
            cmd_rate(&mut catalog, &id, 7.0, false).expect("rate"),
            "✓ Rated 'The Matrix': 7.0/10"
        );
        assert_eq!(
            cmd_tag(&mut catalog, &id, "classic", false).expect("tag"),
            "✓ Added tag 'classic' to 'The Matrix'"
        );
        assert_eq!(
            cmd_untag(&mut catalog, &id, "action", false).expect("untag"),
            "✓ Removed tag 'action' from 'The Matrix'"
        );
        assert_eq!(
            cmd_delete(&mut catalog, &id, false).expect("delete"),
            "✓ Deleted movie: The Matrix (1999)"
        );
    }

    #[test]
    fn unknown_id_is_not_found() {
        let (mut catalog, _) = catalog_with_matrix();
        let ghost = MovieId::generate().to_string();
        let err = cmd_rate(&mut catalog, &ghost, 5.0, false).expect_err("missing");
        assert_eq!(err.to_string(), format!("Movie with ID '{}' not found", ghost));

        assert!(matches!(
            cmd_show(&catalog, "nope", false),
            Err(CatalogError::InvalidId(_))
        ));
    }

    #[test]
    fn stats_output() {
        let (catalog, _) = catalog_with_matrix();
        assert_eq!(
            cmd_stats(&catalog, false).expect("stats"),
            "=== Movie Catalog Statistics ===\nTotal movies: 1\nMovies with ratings: 1\n\
             Average rating: 9.0/10\nYear range: 1999 - 1999\nUnique tags (2): action, sci-fi"
        );

        let empty = cmd_stats(&Catalog::new(), false).expect("stats");
        assert_eq!(
            empty,
            "=== Movie Catalog Statistics ===\nTotal movies: 0\nMovies with ratings: 0"
        );
    }

    #[test]
    fn json_mode_outputs_records() {
        let (catalog, movie) = catalog_with_matrix();
        let out = cmd_show(&catalog, &movie.id().to_string(), true).expect("show");
        let record: MovieRecord = serde_json::from_str(&out).expect("json");
        assert_eq!(record, MovieRecord::from(&movie));

        let stats: serde_json::Value =
            serde_json::from_str(&cmd_stats(&catalog, true).expect("stats")).expect("json");
        assert_eq!(stats["year_range"], serde_json::json!([1999, 1999]));
    }

    #[test]
    fn export_then_import() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("movies.json");
        let (catalog, movie) = catalog_with_matrix();

        assert_eq!(
            cmd_export(&catalog, &path, false).expect("export"),
            format!("✓ Exported 1 movie(s) to {}", path.display())
        );

        let mut fresh = Catalog::new();
        cmd_import(&mut fresh, &path, false).expect("import");
        assert_eq!(fresh.get_movie(movie.id()).expect("get"), Some(movie));
    }

    #[test]
    fn import_into_redb_catalog_persists() {
        let dir = tempfile::tempdir().expect("temp dir");
        let export = dir.path().join("movies.json");
        let database = dir.path().join("movies.db");
        let (catalog, movie) = catalog_with_matrix();
        cmd_export(&catalog, &export, false).expect("export");

        {
            let mut persistent = Catalog::with_redb(&database).expect("open");
            cmd_import(&mut persistent, &export, false).expect("import");
        }

        let reopened = Catalog::with_redb(&database).expect("reopen");
        assert_eq!(reopened.get_movie(movie.id()).expect("get"), Some(movie));
    }

    #[test]
    fn import_rejects_garbage() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"not\": \"a list\"}").expect("write");

        let mut catalog = Catalog::new();
        assert!(matches!(
            cmd_import(&mut catalog, &path, false),
            Err(CatalogError::InvalidInput(_))
        ));
    }
}
