//! Command implementations for the larder CLI

pub mod config;
pub mod db;
pub mod influencers;
pub mod recipes;

use std::io::{self, Read};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use larder_core::LarderConfig;
use larder_db::DataClient;
use serde::Serialize;

pub use config::run_config;
pub use db::run_db;
pub use influencers::run_influencers;
pub use recipes::run_recipes;

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (for piping to jq)
    Json,
    /// IDs only
    Quiet,
}

/// Pick the effective format; `--json` wins over `--output`.
pub fn output_format(output: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag {
        OutputFormat::Json
    } else {
        output
    }
}

/// Open the database client described by the config.
pub async fn connect(config: &LarderConfig) -> Result<Arc<dyn DataClient>> {
    config.validate()?;
    larder_db::connect(&config.database)
        .await
        .context("Failed to open database client")
}

/// Parse a JSON argument; `-` reads it from stdin.
pub fn read_json<T: serde::de::DeserializeOwned>(arg: &str) -> Result<T> {
    let text = if arg == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read JSON from stdin")?;
        buf
    } else {
        arg.to_owned()
    };
    serde_json::from_str(&text).context("Invalid JSON data")
}

/// Print records in the chosen format.
pub fn print_records<T, F, G>(records: &[T], format: OutputFormat, id: F, line: G) -> Result<()>
where
    T: Serialize,
    F: Fn(&T) -> &str,
    G: Fn(&T) -> String,
{
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Quiet => {
            for record in records {
                println!("{}", id(record));
            }
        }
        OutputFormat::Human => {
            if records.is_empty() {
                println!("(no results)");
            }
            for record in records {
                println!("{}", line(record));
            }
        }
    }
    Ok(())
}

/// Print one record; human format is pretty JSON.
pub fn print_record<T: Serialize>(record: &T, id: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Quiet => println!("{}", id),
        OutputFormat::Json | OutputFormat::Human => {
            println!("{}", serde_json::to_string_pretty(record)?)
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_overrides_output() {
        assert_eq!(output_format(OutputFormat::Quiet, true), OutputFormat::Json);
        assert_eq!(output_format(OutputFormat::Quiet, false), OutputFormat::Quiet);
    }

    #[test]
    fn read_json_reports_bad_input() {
        let err = read_json::<serde_json::Value>("{not json").unwrap_err();
        assert!(err.to_string().contains("Invalid JSON data"));
    }
}
