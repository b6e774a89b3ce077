//! Recipe records

use serde::{Deserialize, Serialize};

/// One ingredient line. Amount and unit stay free text ("1 1/2", "pinch").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub unit: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            unit: unit.into(),
        }
    }
}

/// Recipe as the admin surface sees it. Times are minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub prep_time: u32,
    pub cook_time: u32,
    pub servings: u32,
    pub calories: u32,
    pub tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub influencer_id: String,
}

/// Everything needed to create a recipe; the id is assigned by storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub image: String,
    pub prep_time: u32,
    pub cook_time: u32,
    pub servings: u32,
    pub calories: u32,
    pub tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub influencer_id: String,
}

/// Fields to change on an existing recipe. `None` means "leave alone".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub calories: Option<u32>,
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub instructions: Option<Vec<String>>,
    pub influencer_id: Option<String>,
}

impl RecipePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<NewRecipe> for RecipePatch {
    /// A patch that overwrites every field, used when a whole form is saved
    /// over an existing recipe.
    fn from(recipe: NewRecipe) -> Self {
        Self {
            title: Some(recipe.title),
            description: Some(recipe.description),
            image: Some(recipe.image),
            prep_time: Some(recipe.prep_time),
            cook_time: Some(recipe.cook_time),
            servings: Some(recipe.servings),
            calories: Some(recipe.calories),
            tags: Some(recipe.tags),
            ingredients: Some(recipe.ingredients),
            instructions: Some(recipe.instructions),
            influencer_id: Some(recipe.influencer_id),
        }
    }
}
