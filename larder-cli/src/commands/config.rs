//! `larder config` - configuration file management

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use larder_core::LarderConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a starter config file
    Init(InitArgs),
    /// Show the effective config (file plus environment), API key masked
    Show,
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs, path: &Path) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args, path),
        ConfigCommands::Show => run_show(path),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Starter config: REST backend reading its endpoint from the environment.
fn starter_config() -> LarderConfig {
    let mut config = LarderConfig::default();
    config.database.url = "${SUPABASE_URL}".to_string();
    config.database.api_key = Some("${SUPABASE_KEY}".to_string());
    config
}

fn run_init(args: InitArgs, path: &Path) -> Result<()> {
    if path.exists() && !args.force {
        bail!(
            "Config already exists at {}\n\nUse --force to overwrite",
            path.display()
        );
    }

    starter_config().save_to(path)?;

    println!("✅ Created config at: {}", path.display());
    println!("\nNext steps:");
    println!("  1. Set SUPABASE_URL and SUPABASE_KEY (or edit the file)");
    println!("  2. Run: larder influencers list");
    Ok(())
}

fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

fn run_show(path: &Path) -> Result<()> {
    let mut config = LarderConfig::load_from(path)?;
    if let Some(key) = config.database.api_key.as_deref() {
        config.database.api_key = Some(mask(key));
    }

    let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config")?;
    println!("# {}", path.display());
    print!("{}", toml_str);
    Ok(())
}
