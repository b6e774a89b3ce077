//! Recipe service

use larder_core::Recipe;
use tracing::debug;

use super::{DbError, EntityService};
use crate::client::Query;

/// CRUD + search over `recipes`; search covers `title` and `description`.
pub type RecipeService = EntityService<Recipe>;

impl EntityService<Recipe> {
    /// Recipes credited to one influencer.
    pub async fn by_influencer(&self, influencer_id: &str) -> Result<Vec<Recipe>, DbError> {
        debug!(influencer_id, "recipes by influencer");
        let rows = self
            .client()
            .execute(Query::select("recipes").eq("influencer_id", influencer_id))
            .await?;
        Self::decode_all(rows)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use larder_core::{Ingredient, NewRecipe, RecipePatch};

    use super::*;
    use crate::memory::MemoryClient;

    fn service() -> RecipeService {
        RecipeService::new(Arc::new(MemoryClient::new()))
    }

    fn soup(influencer_id: &str) -> NewRecipe {
        NewRecipe {
            title: "Tomato Soup".into(),
            description: "Smooth and bright".into(),
            image: "soup.jpg".into(),
            prep_time: 10,
            cook_time: 25,
            servings: 4,
            calories: 180,
            tags: vec!["soup".into(), "vegetarian".into()],
            ingredients: vec![
                Ingredient::new("tomatoes", "800", "g"),
                Ingredient::new("basil", "1", "bunch"),
            ],
            instructions: vec!["Simmer".into(), "Blend".into()],
            influencer_id: influencer_id.into(),
        }
    }

    #[tokio::test]
    async fn create_then_get_preserves_order_of_lists() {
        let service = service();
        let created = service.create(&soup("inf-1")).await.unwrap();
        let fetched = service.get_by_id(&created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.instructions, vec!["Simmer", "Blend"]);
        assert_eq!(fetched.ingredients[1].name, "basil");
    }

    #[tokio::test]
    async fn update_replaces_list_field_only() {
        let service = service();
        let created = service.create(&soup("inf-1")).await.unwrap();

        let patch = RecipePatch {
            tags: Some(vec!["quick".into()]),
            ..Default::default()
        };
        let updated = service.update(&created.id, &patch).await.unwrap();
        assert_eq!(updated.tags, vec!["quick"]);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.ingredients, created.ingredients);
    }

    #[tokio::test]
    async fn search_covers_title_and_description() {
        let service = service();
        service.create(&soup("inf-1")).await.unwrap();

        assert_eq!(service.search("TOMATO").await.unwrap().len(), 1);
        assert_eq!(service.search("bright").await.unwrap().len(), 1);
        assert!(service.search("vegetarian").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn by_influencer_filters() {
        let service = service();
        service.create(&soup("inf-1")).await.unwrap();
        service.create(&soup("inf-1")).await.unwrap();
        service.create(&soup("inf-2")).await.unwrap();

        assert_eq!(service.by_influencer("inf-1").await.unwrap().len(), 2);
        assert!(service.by_influencer("inf-3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let service = service();
        let created = service.create(&soup("inf-1")).await.unwrap();
        service.delete(&created.id).await.unwrap();

        let err = service.get_by_id(&created.id).await.unwrap_err();
        assert_eq!(err.to_string(), format!("recipe not found: {}", created.id));
    }
}
