//! larder - admin console for recipes and influencers
//!
//! Browse, search and edit the recipe catalog from the terminal:
//! - Influencer records (`influencers` subcommand)
//! - Recipes, created and edited through the validating form (`recipes`)
//! - Table setup for a plain Postgres database (`db init`)
//! - Configuration file management (`config`)

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use larder_core::config::load_dotenv;
use larder_core::LarderConfig;
use tracing::debug;

mod commands;
mod tracing_setup;

use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "larder",
    author,
    version,
    about = "Admin console for recipe and influencer records",
    long_about = "Manage the recipe catalog and its influencers against a Supabase/PostgREST \
                  endpoint or a plain PostgreSQL database."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file to use instead of ~/.larder/config.toml
    #[arg(long, global = true, value_name = "PATH", env = "LARDER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List, search and edit influencers
    Influencers(commands::influencers::InfluencerArgs),
    /// List, search and edit recipes
    Recipes(commands::recipes::RecipeArgs),
    /// Database maintenance (Postgres backend)
    Db(commands::db::DbArgs),
    /// Manage larder configuration (init, show, path)
    Config(commands::config::ConfigArgs),
}

/// Load config and start logging with its level.
fn load(path: &Path, debug: bool) -> Result<LarderConfig> {
    let config = LarderConfig::load_from(path)?;
    init_tracing(&TracingConfig {
        debug,
        level: config.log.level.clone(),
    })
    .ok();
    debug!("Using config {}", path.display());
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(LarderConfig::config_path);

    match cli.command {
        Commands::Influencers(args) => {
            let config = load(&config_path, cli.debug)?;
            commands::run_influencers(args, &config).await?
        }
        Commands::Recipes(args) => {
            let config = load(&config_path, cli.debug)?;
            commands::run_recipes(args, &config).await?
        }
        Commands::Db(args) => {
            let config = load(&config_path, cli.debug)?;
            commands::run_db(args, &config).await?
        }
        Commands::Config(args) => {
            init_tracing(&TracingConfig {
                debug: cli.debug,
                level: None,
            })
            .ok();
            commands::run_config(args, &config_path)?
        }
    }
    Ok(())
}
