//! larder-db: database clients and entity services
//!
//! The services never talk to a process-wide client: every service is built
//! from an explicit [`DataClient`] handle, so the REST client, the Postgres
//! client and the in-memory double are interchangeable.

pub mod client;
pub mod memory;
pub mod postgres;
pub mod rest;
pub mod schema;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use larder_core::{Backend, DatabaseConfig};

pub use client::{ClientError, DataClient, Filter, Operation, OperationKind, Query};
pub use memory::MemoryClient;
pub use postgres::PgClient;
pub use rest::RestClient;
pub use services::{DbError, EntityService, InfluencerService, RecipeService};

/// Open the client described by `config`.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn DataClient>, ClientError> {
    match config.backend {
        Backend::Rest => {
            let api_key = config.api_key.as_deref().unwrap_or_default();
            let client = RestClient::new(
                &config.url,
                api_key,
                Duration::from_secs(config.timeout_secs),
            )?;
            tracing::debug!(url = %config.url, "Using REST database client");
            Ok(Arc::new(client))
        }
        Backend::Postgres => {
            let client = PgClient::connect(&config.url, config.max_connections).await?;
            tracing::debug!("Using Postgres database client");
            Ok(Arc::new(client))
        }
    }
}
