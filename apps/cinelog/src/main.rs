//! # Cinelog - Personal Movie Catalog
//!
//! The main binary for Cinelog.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for catalog operations
//! - An interactive demo shell
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  apps/cinelog (THE BINARY)               │
//! │                                                          │
//! │   ┌─────────────┐   ┌─────────────┐   ┌──────────────┐   │
//! │   │    CLI      │   │  HTTP API   │   │    Config    │   │
//! │   │   (clap)    │   │   (axum)    │   │ (toml + env) │   │
//! │   └──────┬──────┘   └──────┬──────┘   └──────┬───────┘   │
//! │          └─────────────────┼─────────────────┘           │
//! │                            ▼                             │
//! │                   ┌────────────────┐                     │
//! │                   │  cinelog-core  │                     │
//! │                   │ (THE CATALOG)  │                     │
//! │                   └────────────────┘                     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! cinelog server --host 0.0.0.0 --port 8080
//!
//! # CLI operations against a database file
//! cinelog -B redb add "The Matrix" 1999 "Simulation" --rating 9 --tags sci-fi action
//! cinelog -B redb list --min-rating 8
//!
//! # Try it out with sample data
//! cinelog demo
//! ```

use cinelog::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // CINELOG_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("CINELOG_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cinelog=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && matches!(cli.command, Some(cli::Commands::Server { .. })) {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        cli::report_error(&e);
        std::process::exit(1);
    }
}

/// Print the Cinelog startup banner.
fn print_banner() {
    println!(
        r#"
   ██████╗██╗███╗   ██╗███████╗██╗      ██████╗  ██████╗
  ██╔════╝██║████╗  ██║██╔════╝██║     ██╔═══██╗██╔════╝
  ██║     ██║██╔██╗ ██║█████╗  ██║     ██║   ██║██║  ███╗
  ██║     ██║██║╚██╗██║██╔══╝  ██║     ██║   ██║██║   ██║
  ╚██████╗██║██║ ╚████║███████╗███████╗╚██████╔╝╚██████╔╝
   ╚═════╝╚═╝╚═╝  ╚═══╝╚══════╝╚══════╝ ╚═════╝  ╚═════╝

  Personal Movie Catalog v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
