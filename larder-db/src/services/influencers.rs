//! Influencer service

use larder_core::Influencer;

use super::EntityService;

/// CRUD + search over `influencers`; search covers `name` and `bio`.
pub type InfluencerService = EntityService<Influencer>;
