use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use riftwatch::api::{ApiClient, ChampionListQuery, Lookup, Region};
use riftwatch::config::RiftwatchConfig;

/// Query the game statistics API while staying within rate limits.
#[derive(Debug, Parser)]
#[command(name = "riftwatch", version, about)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, env = "RIFTWATCH_CONFIG")]
    config: Option<String>,

    /// Region to query, overriding the configuration
    #[arg(short, long)]
    region: Option<Region>,

    /// API key, overriding the configuration
    #[arg(long, env = "RIFTWATCH_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Look up players by name
    Summoner {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Look up a finished match
    Match {
        id: u64,
        /// Include the match timeline
        #[arg(long)]
        timeline: bool,
    },
    /// Look up the game a player is currently in
    CurrentGame { summoner_id: u64 },
    /// List champions from static data
    Champions {
        #[arg(long)]
        champ_data: Option<String>,
        #[arg(long)]
        locale: Option<String>,
    },
    /// Show the cached realm metadata
    Realm,
    /// Print the icon URL of a champion
    ChampionIcon { key: String },
    /// Print the URL of a profile icon
    ProfileIcon { id: u32 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => RiftwatchConfig::from_file(path)?,
        None => RiftwatchConfig::from_env()?,
    };
    if let Some(region) = cli.region {
        config.client.region = region;
    }
    if let Some(api_key) = cli.api_key {
        config.client.api_key = api_key;
    }
    if config.client.api_key.is_empty() {
        anyhow::bail!("an API key is required (--api-key or RIFTWATCH_API_KEY)");
    }
    info!(
        region = %config.client.region,
        tiers = config.rate_limits.len(),
        "Configuration loaded"
    );

    let mut client = ApiClient::from_config(&config).await?;

    let output = match cli.command {
        Command::Summoner { names } => {
            client.wait_for_capacity().await;
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            client.lookup_players_by_name(&names).await?
        }
        Command::Match { id, timeline } => {
            client.wait_for_capacity().await;
            found_or_null(client.lookup_match(id, timeline).await?)
        }
        Command::CurrentGame { summoner_id } => {
            client.wait_for_capacity().await;
            found_or_null(client.lookup_current_game(summoner_id).await?)
        }
        Command::Champions { champ_data, locale } => {
            let query = ChampionListQuery {
                champ_data,
                locale,
                ..ChampionListQuery::default()
            };
            client.lookup_champion_list(&query).await?
        }
        Command::Realm => match client.realm() {
            Some(realm) => serde_json::to_value(realm)?,
            None => anyhow::bail!("realm metadata is unavailable"),
        },
        Command::ChampionIcon { key } => icon_url(client.champion_icon_url(&key))?,
        Command::ProfileIcon { id } => icon_url(client.profile_icon_url(id))?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Initialize tracing from `RUST_LOG`, defaulting to `info`.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn found_or_null(lookup: Lookup<Value>) -> Value {
    lookup.found().unwrap_or(Value::Null)
}

fn icon_url(url: Option<String>) -> anyhow::Result<Value> {
    url.map(Value::String)
        .ok_or_else(|| anyhow::anyhow!("realm metadata is unavailable"))
}
