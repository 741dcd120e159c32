//! # Cookbook Store
//!
//! Persistence seam for published recipes.

pub mod callback;
pub mod repository;

pub use callback::{CallbackAdapter, CallbackRecipeRepository, OnFailure, OnSuccess};
pub use repository::{InMemoryRecipeRepository, RecipeRepository, StoredRecipe};
