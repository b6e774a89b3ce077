//! Application-facing records
//!
//! These are the shapes the admin surface works with. Storage rows live in
//! [`crate::mapper`] and never leak past the service boundary.

pub mod influencer;
pub mod recipe;
pub mod validation;

pub use influencer::{Influencer, InfluencerPatch, NewInfluencer, SocialMedia};
pub use recipe::{Ingredient, NewRecipe, Recipe, RecipePatch};
pub use validation::ValidationError;
