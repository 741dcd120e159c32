//! # Cookbook Core
//!
//! Recipe draft model for the Cookbook authoring flow.
//!
//! This crate provides:
//! - [`RecipeDraftBuilder`] - mutable draft with commit-time validation
//! - [`RecipeEntity`] - the validated, immutable recipe
//! - [`Instruction`] and [`IngredientMeasurement`] - draft contents
//! - [`CookbookError`] - error types shared by the workspace

pub mod draft;
pub mod error;
pub mod recipe;
pub mod types;

// Re-exports for convenience
pub use draft::RecipeDraftBuilder;
pub use error::{CookbookError, Result, ValidationFailure};
pub use recipe::{IngredientMeasurement, Instruction, RecipeEntity};
pub use types::IconTag;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::draft::RecipeDraftBuilder;
    pub use crate::error::{CookbookError, Result, ValidationFailure};
    pub use crate::recipe::{IngredientMeasurement, Instruction, RecipeEntity};
    pub use crate::types::IconTag;
}
