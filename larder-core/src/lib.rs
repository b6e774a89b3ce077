//! larder-core: records, storage mapping and configuration
//!
//! Holds everything that does no I/O against the database:
//! the application-facing record shapes, the storage-row mirrors and the
//! pure mapping between them, plus the TOML/env configuration layer shared
//! by the services and the CLI.

pub mod config;
pub mod mapper;
pub mod models;

pub use config::{Backend, DatabaseConfig, LarderConfig};
pub use mapper::{DbInfluencer, DbRecipe, Entity, Row};
pub use models::{
    Influencer, InfluencerPatch, Ingredient, NewInfluencer, NewRecipe, Recipe, RecipePatch,
    SocialMedia, ValidationError,
};
