//! CLI command definitions.

use clap::{Parser, Subcommand};

/// ComicVine - query the ComicVine comics database
#[derive(Parser, Debug)]
#[command(name = "comicvine")]
#[command(about = "Query the ComicVine comics database", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// API key (falls back to API_KEY, then configuration and COMICVINE_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Disable the response cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Export spans through OpenTelemetry (stdout exporter, honors RUST_LOG)
    #[arg(long, global = true)]
    pub otel: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Full-text search
    Search {
        /// Search terms
        query: String,

        /// Resource types to search, comma separated (e.g. "issue,volume")
        #[arg(long)]
        resources: Option<String>,

        /// Sort order, e.g. "name:asc"
        #[arg(long)]
        sort: Option<String>,

        /// Maximum number of results
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Fetch one issue
    Issue {
        /// Issue id
        id: u64,

        /// Fields to return, comma separated
        #[arg(long)]
        field_list: Option<String>,
    },

    /// Fetch one volume
    Volume {
        /// Volume id
        id: u64,

        /// Fields to return, comma separated
        #[arg(long)]
        field_list: Option<String>,
    },
}
