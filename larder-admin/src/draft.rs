//! Editable recipe draft
//!
//! Scalar fields are held as the text the user typed. Numbers and tags are
//! parsed only when the draft is turned back into a record, and parsing
//! failures come back as field-level errors instead of bogus values.

use std::fmt;
use std::str::FromStr;

use larder_core::{Ingredient, NewRecipe, Recipe, ValidationError};

/// A text field of the draft, addressable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Title,
    Description,
    Image,
    PrepTime,
    CookTime,
    Servings,
    Calories,
    Tags,
    InfluencerId,
}

impl DraftField {
    pub const ALL: [DraftField; 9] = [
        Self::Title,
        Self::Description,
        Self::Image,
        Self::PrepTime,
        Self::CookTime,
        Self::Servings,
        Self::Calories,
        Self::Tags,
        Self::InfluencerId,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Image => "image",
            Self::PrepTime => "prepTime",
            Self::CookTime => "cookTime",
            Self::Servings => "servings",
            Self::Calories => "calories",
            Self::Tags => "tags",
            Self::InfluencerId => "influencerId",
        }
    }
}

impl FromStr for DraftField {
    type Err = ValidationError;

    /// Accepts the camelCase form names and their snake_case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('_', "").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.name().to_ascii_lowercase() == normalized)
            .ok_or_else(|| ValidationError::UnknownField { name: s.to_owned() })
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field errors collected while converting a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftErrors(pub Vec<ValidationError>);

impl DraftErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn for_field(&self, field: DraftField) -> Option<&ValidationError> {
        self.0.iter().find(|err| err.field() == field.name())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DraftErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for DraftErrors {}

/// The form's working copy of a recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub image: String,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: String,
    pub calories: String,
    pub tags: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub influencer_id: String,
    /// Tags of the recipe the draft was loaded from
    loaded_tags: Vec<String>,
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            image: String::new(),
            prep_time: "0".to_string(),
            cook_time: "0".to_string(),
            servings: "4".to_string(),
            calories: "0".to_string(),
            tags: String::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            influencer_id: String::new(),
            loaded_tags: Vec::new(),
        }
    }
}

impl From<&Recipe> for RecipeDraft {
    fn from(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            image: recipe.image.clone(),
            prep_time: recipe.prep_time.to_string(),
            cook_time: recipe.cook_time.to_string(),
            servings: recipe.servings.to_string(),
            calories: recipe.calories.to_string(),
            tags: join_tags(&recipe.tags),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            influencer_id: recipe.influencer_id.clone(),
            loaded_tags: recipe.tags.clone(),
        }
    }
}

impl RecipeDraft {
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.title,
            DraftField::Description => &self.description,
            DraftField::Image => &self.image,
            DraftField::PrepTime => &self.prep_time,
            DraftField::CookTime => &self.cook_time,
            DraftField::Servings => &self.servings,
            DraftField::Calories => &self.calories,
            DraftField::Tags => &self.tags,
            DraftField::InfluencerId => &self.influencer_id,
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let slot = match field {
            DraftField::Title => &mut self.title,
            DraftField::Description => &mut self.description,
            DraftField::Image => &mut self.image,
            DraftField::PrepTime => &mut self.prep_time,
            DraftField::CookTime => &mut self.cook_time,
            DraftField::Servings => &mut self.servings,
            DraftField::Calories => &mut self.calories,
            DraftField::Tags => &mut self.tags,
            DraftField::InfluencerId => &mut self.influencer_id,
        };
        *slot = value.into();
    }

    /// Update one field by its form name.
    pub fn set_by_name(&mut self, name: &str, value: impl Into<String>) -> Result<(), ValidationError> {
        let field: DraftField = name.parse()?;
        self.set(field, value);
        Ok(())
    }

    /// Tags from the text field. Untouched text gives back the loaded tags
    /// exactly, even ones that contain a comma.
    fn parsed_tags(&self) -> Vec<String> {
        if self.tags == join_tags(&self.loaded_tags) {
            self.loaded_tags.clone()
        } else {
            split_tags(&self.tags)
        }
    }

    /// Convert to the typed insert shape, or every field error found.
    pub fn to_new_recipe(&self) -> Result<NewRecipe, DraftErrors> {
        let mut errors = Vec::new();
        let mut count = |field: DraftField| match parse_count(field.name(), self.get(field)) {
            Ok(n) => n,
            Err(err) => {
                errors.push(err);
                0
            }
        };

        let prep_time = count(DraftField::PrepTime);
        let cook_time = count(DraftField::CookTime);
        let servings = count(DraftField::Servings);
        let calories = count(DraftField::Calories);

        if self.influencer_id.trim().is_empty() {
            errors.push(ValidationError::Empty {
                field: DraftField::InfluencerId.name(),
            });
        }

        if !errors.is_empty() {
            return Err(DraftErrors(errors));
        }

        Ok(NewRecipe {
            title: self.title.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            prep_time,
            cook_time,
            servings,
            calories,
            tags: self.parsed_tags(),
            ingredients: self.ingredients.clone(),
            instructions: self.instructions.clone(),
            influencer_id: self.influencer_id.trim().to_owned(),
        })
    }
}

/// Tags as shown in the form: `"a, b"`.
///
/// A tag containing a comma is not recoverable from this text alone; the
/// draft keeps the loaded tags for the untouched case.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Comma-separated text back to tags, trimmed, empty entries dropped.
pub fn split_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Largest count the `INTEGER` columns hold.
const MAX_COUNT: u32 = i32::MAX as u32;

fn parse_count(field: &'static str, text: &str) -> Result<u32, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    let value = trimmed.to_owned();
    match trimmed.parse::<i128>() {
        Ok(n) if n < 0 => Err(ValidationError::Negative { field, value }),
        Ok(n) => u32::try_from(n)
            .ok()
            .filter(|n| *n <= MAX_COUNT)
            .ok_or(ValidationError::OutOfRange { field, value }),
        Err(_) if trimmed.bytes().all(|b| b.is_ascii_digit()) => {
            Err(ValidationError::OutOfRange { field, value })
        }
        Err(_) => Err(ValidationError::NotANumber { field, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe() -> Recipe {
        Recipe {
            id: "r1".into(),
            title: "Pancakes".into(),
            description: "Fluffy".into(),
            image: "p.jpg".into(),
            prep_time: 5,
            cook_time: 15,
            servings: 2,
            calories: 350,
            tags: vec!["a".into(), "b".into()],
            ingredients: vec![Ingredient::new("flour", "200", "g")],
            instructions: vec!["Mix".into(), "Fry".into()],
            influencer_id: "inf-1".into(),
        }
    }

    #[test]
    fn defaults() {
        let draft = RecipeDraft::default();
        assert_eq!(draft.prep_time, "0");
        assert_eq!(draft.cook_time, "0");
        assert_eq!(draft.servings, "4");
        assert_eq!(draft.calories, "0");
        assert!(draft.tags.is_empty());
        assert!(draft.ingredients.is_empty());
    }

    #[test]
    fn from_recipe_renders_display_strings() {
        let draft = RecipeDraft::from(&recipe());
        assert_eq!(draft.tags, "a, b");
        assert_eq!(draft.prep_time, "5");
        assert_eq!(draft.calories, "350");
        assert_eq!(draft.influencer_id, "inf-1");
    }

    #[test]
    fn unchanged_draft_round_trips() {
        let original = recipe();
        let rebuilt = RecipeDraft::from(&original).to_new_recipe().unwrap();

        assert_eq!(rebuilt.tags, vec!["a", "b"]);
        assert_eq!(rebuilt.prep_time, original.prep_time);
        assert_eq!(rebuilt.ingredients, original.ingredients);
        assert_eq!(rebuilt.instructions, original.instructions);
    }

    #[test]
    fn split_tags_trims_and_drops_empties() {
        assert_eq!(split_tags(" quick ,  easy,,"), vec!["quick", "easy"]);
        assert!(split_tags("").is_empty());
        assert!(split_tags(" , ").is_empty());
    }

    #[test]
    fn set_by_name_accepts_both_spellings() {
        let mut draft = RecipeDraft::default();
        draft.set_by_name("prepTime", "12").unwrap();
        assert_eq!(draft.prep_time, "12");
        draft.set_by_name("cook_time", "30").unwrap();
        assert_eq!(draft.cook_time, "30");
        draft.set_by_name("influencerId", "inf-9").unwrap();
        assert_eq!(draft.get(DraftField::InfluencerId), "inf-9");

        let err = draft.set_by_name("rating", "5").unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownField {
                name: "rating".into()
            }
        );
    }

    #[test]
    fn numeric_fields_are_checked() {
        let mut draft = RecipeDraft::from(&recipe());
        draft.prep_time = "ten".into();
        draft.servings = "-2".into();
        draft.calories = "99999999999".into();
        draft.cook_time = " ".into();

        let errors = draft.to_new_recipe().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(matches!(
            errors.for_field(DraftField::PrepTime),
            Some(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            errors.for_field(DraftField::Servings),
            Some(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            errors.for_field(DraftField::Calories),
            Some(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            errors.for_field(DraftField::CookTime),
            Some(ValidationError::Empty { .. })
        ));
    }

    #[test]
    fn trailing_garbage_is_not_a_number() {
        let mut draft = RecipeDraft::from(&recipe());
        draft.prep_time = "12abc".into();
        let errors = draft.to_new_recipe().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "prepTime must be a whole number, got '12abc'"
        );
    }

    #[test]
    fn counts_must_fit_an_integer_column() {
        let mut draft = RecipeDraft::from(&recipe());
        draft.calories = "2147483647".into();
        assert_eq!(draft.to_new_recipe().unwrap().calories, 2_147_483_647);

        draft.calories = "3000000000".into();
        draft.servings = "900000000000000000000000000000000000000000".into();
        let errors = draft.to_new_recipe().unwrap_err();
        assert!(matches!(
            errors.for_field(DraftField::Calories),
            Some(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            errors.for_field(DraftField::Servings),
            Some(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn untouched_tags_keep_embedded_commas() {
        let mut original = recipe();
        original.tags = vec!["salt, pepper".into(), "quick".into()];

        let mut draft = RecipeDraft::from(&original);
        assert_eq!(draft.tags, "salt, pepper, quick");
        assert_eq!(draft.to_new_recipe().unwrap().tags, original.tags);

        draft.tags = "salt, pepper".into();
        assert_eq!(draft.to_new_recipe().unwrap().tags, vec!["salt", "pepper"]);
    }

    #[test]
    fn influencer_is_required() {
        let errors = RecipeDraft::default().to_new_recipe().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.to_string(), "influencerId cannot be empty");
    }

    #[test]
    fn numbers_are_trimmed() {
        let mut draft = RecipeDraft::from(&recipe());
        draft.servings = " 6 ".into();
        assert_eq!(draft.to_new_recipe().unwrap().servings, 6);
    }
}
