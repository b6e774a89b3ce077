//! `larder db` - database maintenance

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use larder_core::{Backend, LarderConfig};
use larder_db::{schema, PgClient};

#[derive(Parser, Debug)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Create the influencers and recipes tables if they are missing
    Init,
}

pub async fn run_db(args: DbArgs, config: &LarderConfig) -> Result<()> {
    match args.command {
        DbCommand::Init => run_init(config).await,
    }
}

async fn run_init(config: &LarderConfig) -> Result<()> {
    if config.database.backend != Backend::Postgres {
        bail!(
            "`db init` needs the postgres backend (set database.backend = \"postgres\" or \
             LARDER_BACKEND=postgres); REST projects manage their schema on the service side"
        );
    }
    config.validate()?;

    let client = PgClient::connect(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to Postgres")?;
    schema::init(client.pool())
        .await
        .context("Failed to create tables")?;

    println!("✅ Tables ready");
    Ok(())
}
