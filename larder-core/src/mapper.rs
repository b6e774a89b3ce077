//! Record mapper: storage rows <-> application records
//!
//! Storage uses snake_case columns, and any column but the ids may be null
//! in a hosted project. `to_domain` is total: null text and collections
//! become empty, null counts become zero, other values pass through
//! unchanged. The reverse direction produces column maps, either
//! complete (insert) or holding exactly the fields being changed (patch).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::models::{
    Influencer, InfluencerPatch, Ingredient, NewInfluencer, NewRecipe, Recipe, RecipePatch,
    SocialMedia,
};

/// A storage row: column name -> JSON value
pub type Row = Map<String, Value>;

/// Storage mirror of the `influencers` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbInfluencer {
    pub id: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub bio: Option<String>,
    pub social_media: Option<SocialMedia>,
    pub specialties: Option<Vec<String>>,
    pub followers: Option<u64>,
    pub recipes_count: Option<u64>,
}

/// Storage mirror of the `recipes` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbRecipe {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub calories: Option<u32>,
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub instructions: Option<Vec<String>>,
    pub influencer_id: String,
}

/// A record type stored in one table.
///
/// Ties the application shape to its storage row, insert shape and patch
/// shape so a single service implementation can serve every table.
pub trait Entity: Sized + Send {
    /// Table name
    const TABLE: &'static str;
    /// Singular noun used in messages ("influencer")
    const NOUN: &'static str;
    /// Text columns `search` matches against
    const SEARCH_COLUMNS: &'static [&'static str];

    type Stored: DeserializeOwned;
    type New: Send + Sync;
    type Patch: Send + Sync;

    fn id(&self) -> &str;
    fn to_domain(row: Self::Stored) -> Self;
    fn insert_columns(new: &Self::New) -> Row;
    fn patch_columns(patch: &Self::Patch) -> Row;
}

fn set<T: Serialize>(row: &mut Row, column: &str, value: Option<&T>) {
    if let Some(value) = value {
        row.insert(column.to_owned(), json!(value));
    }
}

impl From<DbInfluencer> for Influencer {
    fn from(row: DbInfluencer) -> Self {
        Self {
            id: row.id,
            name: row.name.unwrap_or_default(),
            avatar: row.avatar_url.unwrap_or_default(),
            cover_image: row.cover_image_url.unwrap_or_default(),
            bio: row.bio.unwrap_or_default(),
            social_media: row.social_media.unwrap_or_default(),
            specialties: row.specialties.unwrap_or_default(),
            followers: row.followers.unwrap_or_default(),
            recipes_count: row.recipes_count.unwrap_or_default(),
        }
    }
}

impl Entity for Influencer {
    const TABLE: &'static str = "influencers";
    const NOUN: &'static str = "influencer";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "bio"];

    type Stored = DbInfluencer;
    type New = NewInfluencer;
    type Patch = InfluencerPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_domain(row: DbInfluencer) -> Self {
        row.into()
    }

    fn insert_columns(new: &NewInfluencer) -> Row {
        let mut row = Row::new();
        set(&mut row, "name", Some(&new.name));
        set(&mut row, "avatar_url", Some(&new.avatar));
        set(&mut row, "cover_image_url", Some(&new.cover_image));
        set(&mut row, "bio", Some(&new.bio));
        set(&mut row, "social_media", Some(&new.social_media));
        set(&mut row, "specialties", Some(&new.specialties));
        set(&mut row, "followers", Some(&new.followers));
        set(&mut row, "recipes_count", Some(&new.recipes_count));
        row
    }

    fn patch_columns(patch: &InfluencerPatch) -> Row {
        let mut row = Row::new();
        set(&mut row, "name", patch.name.as_ref());
        set(&mut row, "avatar_url", patch.avatar.as_ref());
        set(&mut row, "cover_image_url", patch.cover_image.as_ref());
        set(&mut row, "bio", patch.bio.as_ref());
        set(&mut row, "social_media", patch.social_media.as_ref());
        set(&mut row, "specialties", patch.specialties.as_ref());
        set(&mut row, "followers", patch.followers.as_ref());
        set(&mut row, "recipes_count", patch.recipes_count.as_ref());
        row
    }
}

impl From<DbRecipe> for Recipe {
    fn from(row: DbRecipe) -> Self {
        Self {
            id: row.id,
            title: row.title.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            image: row.image_url.unwrap_or_default(),
            prep_time: row.prep_time.unwrap_or_default(),
            cook_time: row.cook_time.unwrap_or_default(),
            servings: row.servings.unwrap_or_default(),
            calories: row.calories.unwrap_or_default(),
            tags: row.tags.unwrap_or_default(),
            ingredients: row.ingredients.unwrap_or_default(),
            instructions: row.instructions.unwrap_or_default(),
            influencer_id: row.influencer_id,
        }
    }
}

impl Entity for Recipe {
    const TABLE: &'static str = "recipes";
    const NOUN: &'static str = "recipe";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "description"];

    type Stored = DbRecipe;
    type New = NewRecipe;
    type Patch = RecipePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_domain(row: DbRecipe) -> Self {
        row.into()
    }

    fn insert_columns(new: &NewRecipe) -> Row {
        let mut row = Row::new();
        set(&mut row, "title", Some(&new.title));
        set(&mut row, "description", Some(&new.description));
        set(&mut row, "image_url", Some(&new.image));
        set(&mut row, "prep_time", Some(&new.prep_time));
        set(&mut row, "cook_time", Some(&new.cook_time));
        set(&mut row, "servings", Some(&new.servings));
        set(&mut row, "calories", Some(&new.calories));
        set(&mut row, "tags", Some(&new.tags));
        set(&mut row, "ingredients", Some(&new.ingredients));
        set(&mut row, "instructions", Some(&new.instructions));
        set(&mut row, "influencer_id", Some(&new.influencer_id));
        row
    }

    fn patch_columns(patch: &RecipePatch) -> Row {
        let mut row = Row::new();
        set(&mut row, "title", patch.title.as_ref());
        set(&mut row, "description", patch.description.as_ref());
        set(&mut row, "image_url", patch.image.as_ref());
        set(&mut row, "prep_time", patch.prep_time.as_ref());
        set(&mut row, "cook_time", patch.cook_time.as_ref());
        set(&mut row, "servings", patch.servings.as_ref());
        set(&mut row, "calories", patch.calories.as_ref());
        set(&mut row, "tags", patch.tags.as_ref());
        set(&mut row, "ingredients", patch.ingredients.as_ref());
        set(&mut row, "instructions", patch.instructions.as_ref());
        set(&mut row, "influencer_id", patch.influencer_id.as_ref());
        row
    }
}
