//! Command execution.

use super::{Cli, Commands};
use comicvine::{ApiResponse, ClientConfig, ComicVine, ComicVineResult};
use serde_json::{Map, Value, json};
use tracing::{debug, info};

/// Load configuration, apply command-line overrides and run the command.
pub async fn run_command(cli: Cli) -> ComicVineResult<()> {
    let mut config = ClientConfig::load()?;

    if let Some(token) = cli.token.clone().or_else(|| std::env::var("API_KEY").ok()) {
        config = config.with_token(token);
    }
    if cli.no_cache {
        let cache = config.cache().clone().with_enabled(false);
        config = config.with_cache(cache);
    }
    debug!(?config, "Resolved configuration");

    let client = ComicVine::with_config(config)?;

    let response = match cli.command {
        Commands::Search {
            query,
            resources,
            sort,
            limit,
        } => {
            let mut data = Map::new();
            data.insert("query".to_string(), Value::String(query));
            insert_opt(&mut data, "resources", resources);
            insert_opt(&mut data, "sort", sort);
            if let Some(limit) = limit {
                data.insert("limit".to_string(), json!(limit));
            }
            client.search().search_comic(Value::Object(data)).await?
        }
        Commands::Issue { id, field_list } => {
            let mut data = Map::new();
            data.insert("id".to_string(), json!(id));
            insert_opt(&mut data, "field_list", field_list);
            client.issue().find(Value::Object(data)).await?
        }
        Commands::Volume { id, field_list } => {
            let mut data = Map::new();
            data.insert("id".to_string(), json!(id));
            insert_opt(&mut data, "field_list", field_list);
            client.volume().find(Value::Object(data)).await?
        }
    };

    print_response(&response)
}

fn insert_opt(data: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        data.insert(key.to_string(), Value::String(value));
    }
}

fn print_response(response: &ApiResponse) -> ComicVineResult<()> {
    info!(
        from_cache = response.from_cache(),
        latency_ms = response.latency_ms(),
        "Request completed"
    );
    let rendered = serde_json::to_string_pretty(response.payload())
        .map_err(|e| comicvine::JsonError::new(format!("Failed to render response: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}
