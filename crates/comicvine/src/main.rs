//! ComicVine CLI binary.
//!
//! This binary provides command-line access to the ComicVine API:
//! - Full-text search
//! - Issue and volume lookups by id

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, run_command};

    // Load .env so API_KEY can live next to the project
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let otel = cli.otel;
    if otel {
        comicvine::init_telemetry()?;
    } else {
        let log_level = if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let result = run_command(cli).await;

    if otel {
        comicvine::shutdown_telemetry();
    }

    Ok(result?)
}
