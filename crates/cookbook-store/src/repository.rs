//! Recipe repository implementations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cookbook_core::{CookbookError, RecipeEntity, Result};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A recipe as held by a repository.
#[derive(Debug, Clone)]
pub struct StoredRecipe {
    /// The published recipe.
    pub recipe: RecipeEntity,

    /// When the repository accepted it.
    pub published_at: DateTime<Utc>,
}

/// Trait for recipe repositories.
///
/// `add_recipe` completes exactly once per call, with success or a failure
/// whose message is shown to the user. Implementations are not expected to
/// retry.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Issue a fresh recipe identifier.
    fn new_uid(&self) -> String;

    /// Persist a finished recipe.
    async fn add_recipe(&self, recipe: RecipeEntity) -> Result<()>;
}

#[async_trait]
impl<R: RecipeRepository + ?Sized> RecipeRepository for Arc<R> {
    fn new_uid(&self) -> String {
        (**self).new_uid()
    }

    async fn add_recipe(&self, recipe: RecipeEntity) -> Result<()> {
        (**self).add_recipe(recipe).await
    }
}

/// In-memory implementation of RecipeRepository.
pub struct InMemoryRecipeRepository {
    /// Published recipes keyed by id.
    recipes: Arc<RwLock<HashMap<String, StoredRecipe>>>,

    /// Number of `add_recipe` calls received, successful or not.
    add_calls: AtomicUsize,

    /// When set, every `add_recipe` fails with this message.
    failure: Option<String>,
}

impl InMemoryRecipeRepository {
    /// Create a new, empty repository.
    pub fn new() -> Self {
        Self {
            recipes: Arc::new(RwLock::new(HashMap::new())),
            add_calls: AtomicUsize::new(0),
            failure: None,
        }
    }

    /// Create a repository that rejects every recipe with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    /// Get a published recipe by id.
    pub async fn get(&self, id: &str) -> Option<StoredRecipe> {
        let recipes = self.recipes.read().await;
        recipes.get(id).cloned()
    }

    /// All published recipes, oldest first.
    pub async fn list(&self) -> Vec<StoredRecipe> {
        let recipes = self.recipes.read().await;
        let mut stored: Vec<StoredRecipe> = recipes.values().cloned().collect();
        stored.sort_by_key(|entry| entry.published_at);
        stored
    }

    /// Number of published recipes.
    pub async fn len(&self) -> usize {
        self.recipes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.recipes.read().await.is_empty()
    }

    /// How many times `add_recipe` has been invoked.
    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryRecipeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecipeRepository for InMemoryRecipeRepository {
    fn new_uid(&self) -> String {
        Uuid::new_v4().to_string()
    }

    async fn add_recipe(&self, recipe: RecipeEntity) -> Result<()> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(ref message) = self.failure {
            return Err(CookbookError::RemoteFailure {
                message: message.clone(),
            });
        }

        let mut recipes = self.recipes.write().await;
        if recipes.contains_key(&recipe.id) {
            return Err(CookbookError::RemoteFailure {
                message: format!("Recipe {} already exists", recipe.id),
            });
        }

        tracing::debug!(recipe_id = %recipe.id, "Stored recipe");

        recipes.insert(
            recipe.id.clone(),
            StoredRecipe {
                recipe,
                published_at: Utc::now(),
            },
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cookbook_core::{Instruction, RecipeDraftBuilder};

    fn recipe(id: &str) -> RecipeEntity {
        let mut draft = RecipeDraftBuilder::new();
        draft.set_id(id);
        draft.set_name("Pancakes");
        draft.add_instruction(Instruction::new("Whisk", None, None).unwrap());
        draft.add_ingredient_and_measurement("Eggs", "2").unwrap();
        draft.set_picture_reference("pancakes.jpg");
        draft.build().unwrap()
    }

    #[test]
    fn test_new_uid_is_unique() {
        let repo = InMemoryRecipeRepository::new();
        assert_ne!(repo.new_uid(), repo.new_uid());
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let repo = InMemoryRecipeRepository::new();
        let id = repo.new_uid();

        repo.add_recipe(recipe(&id)).await.unwrap();

        let stored = repo.get(&id).await.unwrap();
        assert_eq!(stored.recipe.name, "Pancakes");
        assert_eq!(repo.len().await, 1);
        assert_eq!(repo.add_calls(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let repo = InMemoryRecipeRepository::new();
        repo.add_recipe(recipe("r1")).await.unwrap();

        let result = repo.add_recipe(recipe("r1")).await;
        assert!(matches!(result, Err(CookbookError::RemoteFailure { .. })));
        assert_eq!(repo.len().await, 1);
        assert_eq!(repo.add_calls(), 2);
    }

    #[tokio::test]
    async fn test_failing_repository() {
        let repo = InMemoryRecipeRepository::failing("Network error");

        let result = repo.add_recipe(recipe("r1")).await;
        assert_eq!(
            result,
            Err(CookbookError::RemoteFailure {
                message: "Network error".to_string()
            })
        );
        assert!(repo.is_empty().await);
        assert_eq!(repo.add_calls(), 1);
    }

    #[tokio::test]
    async fn test_list_in_publish_order() {
        let repo = InMemoryRecipeRepository::new();
        repo.add_recipe(recipe("first")).await.unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
        repo.add_recipe(recipe("second")).await.unwrap();

        let ids: Vec<String> = repo.list().await.into_iter().map(|s| s.recipe.id).collect();
        assert_eq!(ids, vec!["first".to_string(), "second".to_string()]);
    }

    #[tokio::test]
    async fn test_shared_handle_forwards() {
        let repo = Arc::new(InMemoryRecipeRepository::new());
        let shared: Arc<dyn RecipeRepository> = repo.clone();

        shared.add_recipe(recipe("r1")).await.unwrap();
        assert_eq!(repo.add_calls(), 1);
    }
}
