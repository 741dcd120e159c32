//! Adapter for callback-style recipe backends.
//!
//! Mobile persistence SDKs report completion through a success/failure
//! callback pair instead of a future. [`CallbackAdapter`] turns such a
//! backend into a [`RecipeRepository`]: the first callback to fire settles
//! the call and anything after it is ignored.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cookbook_core::{CookbookError, RecipeEntity, Result};
use tokio::sync::oneshot;
use tracing::warn;

use crate::repository::RecipeRepository;

/// Invoked when the backend accepted the recipe.
pub type OnSuccess = Box<dyn FnOnce() + Send + 'static>;

/// Invoked when the backend rejected the recipe.
pub type OnFailure = Box<dyn FnOnce(CookbookError) + Send + 'static>;

/// A recipe backend that reports completion through callbacks.
///
/// The callbacks may be invoked from any thread, before or after
/// `add_recipe` returns.
pub trait CallbackRecipeRepository: Send + Sync {
    /// Issue a fresh recipe identifier.
    fn new_uid(&self) -> String;

    /// Start persisting a recipe.
    fn add_recipe(&self, recipe: RecipeEntity, on_success: OnSuccess, on_failure: OnFailure);
}

/// Exposes a [`CallbackRecipeRepository`] as an async [`RecipeRepository`].
pub struct CallbackAdapter<R> {
    inner: R,
}

impl<R: CallbackRecipeRepository> CallbackAdapter<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &R {
        &self.inner
    }
}

type Settle = Arc<Mutex<Option<oneshot::Sender<Result<()>>>>>;

fn settle(slot: &Settle, recipe_id: &str, result: Result<()>) {
    let sender = match slot.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    };

    match sender {
        // The receiver is gone only if the publish future was dropped.
        Some(tx) => {
            let _ = tx.send(result);
        }
        None => warn!(recipe_id, "Ignoring repeated publish callback"),
    }
}

#[async_trait]
impl<R: CallbackRecipeRepository> RecipeRepository for CallbackAdapter<R> {
    fn new_uid(&self) -> String {
        self.inner.new_uid()
    }

    async fn add_recipe(&self, recipe: RecipeEntity) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let slot: Settle = Arc::new(Mutex::new(Some(tx)));
        let recipe_id = recipe.id.clone();

        let on_success: OnSuccess = {
            let slot = slot.clone();
            let recipe_id = recipe_id.clone();
            Box::new(move || settle(&slot, &recipe_id, Ok(())))
        };
        let on_failure: OnFailure = {
            let slot = slot.clone();
            let recipe_id = recipe_id.clone();
            Box::new(move |err| settle(&slot, &recipe_id, Err(err)))
        };
        drop(slot);

        self.inner.add_recipe(recipe, on_success, on_failure);

        match rx.await {
            Ok(result) => result,
            Err(_) => Err(CookbookError::RemoteFailure {
                message: format!("Backend dropped the callbacks for recipe {}", recipe_id),
            }),
        }
    }
}
