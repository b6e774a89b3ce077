use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// `${VAR}` references inside config values
static VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("invalid variable regex")
});

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the larder admin tools
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LarderConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Which kind of database endpoint `database.url` points at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// PostgREST / Supabase REST endpoint
    #[default]
    Rest,
    /// PostgreSQL connection string
    Postgres,
}

impl std::str::FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rest" | "supabase" => Ok(Self::Rest),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => anyhow::bail!("unknown database backend '{}' (expected rest or postgres)", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: Backend,
    pub url: String,
    /// API key sent as `apikey` and bearer token (REST backend only)
    pub api_key: Option<String>,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Rest,
            url: String::new(),
            api_key: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: Option<String>,
}

impl LarderConfig {
    /// Load config from ~/.larder/config.toml, then apply environment
    /// overrides. A missing file is not an error; defaults are used.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path, then apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .context(format!("Failed to read config file: {:?}", path))?;
            debug!("Loaded config from {}", path.display());
            Self::from_toml_str(&content)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file (invalid TOML)")
    }

    /// Config directory: ~/.larder
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".larder")
    }

    /// Config file path: ~/.larder/config.toml
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Apply `LARDER_*` / `SUPABASE_*` / `DATABASE_URL` overrides and expand
    /// `${VAR}` references, reading variables through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("LARDER_BACKEND") {
            self.database.backend = backend.parse()?;
        }

        let url_var = match self.database.backend {
            Backend::Rest => "SUPABASE_URL",
            Backend::Postgres => "DATABASE_URL",
        };
        if let Some(url) = lookup(url_var) {
            self.database.url = url;
        }
        if let Some(key) = lookup("SUPABASE_KEY") {
            self.database.api_key = Some(key);
        }
        if let Some(timeout) = lookup("LARDER_TIMEOUT_SECS") {
            self.database.timeout_secs = timeout
                .parse()
                .context(format!("LARDER_TIMEOUT_SECS must be a number, got '{}'", timeout))?;
        }

        self.database.url = expand_vars(&self.database.url, &lookup);
        if let Some(ref key) = self.database.api_key {
            self.database.api_key = Some(expand_vars(key, &lookup));
        }

        Ok(())
    }

    /// Check the settings needed to open a database client are present.
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            let hint = match self.database.backend {
                Backend::Rest => "set database.url or SUPABASE_URL",
                Backend::Postgres => "set database.url or DATABASE_URL",
            };
            anyhow::bail!("No database URL configured ({})", hint);
        }

        if self.database.backend == Backend::Rest
            && self.database.api_key.as_deref().map_or(true, str::is_empty)
        {
            anyhow::bail!("REST backend requires an API key (set database.api_key or SUPABASE_KEY)");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be at least 1");
        }

        Ok(())
    }

    /// Save config to the given path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create config directory: {:?}", parent))?;
        }

        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        fs::write(path, toml_str).context(format!("Failed to write config file: {:?}", path))?;

        info!("Wrote config to {}", path.display());
        Ok(())
    }
}

/// Expand `${VAR}` references; unknown variables expand to the empty string.
fn expand_vars<F>(value: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    VAR_RE
        .replace_all(value, |caps: &regex::Captures<'_>| {
            lookup(&caps[1]).unwrap_or_default()
        })
        .into_owned()
}

/// Load environment variables from .env files.
///
/// The current directory wins over ~/.larder/.env; neither overwrites
/// variables already set in the environment.
pub fn load_dotenv() {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path.display().to_string());
    }

    let env_file = LarderConfig::config_dir().join(".env");
    if env_file.exists() {
        match dotenvy::from_path(&env_file) {
            Ok(()) => loaded_from.push(env_file.display().to_string()),
            Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found (current dir or ~/.larder)");
    } else {
        debug!("Loaded environment from: {}", loaded_from.join(", "));
    }
}
