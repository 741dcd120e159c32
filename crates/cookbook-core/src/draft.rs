//! The mutable recipe draft and its commit-time validation.
//!
//! Setters accept anything; invariants are only checked by
//! [`RecipeDraftBuilder::build`], which reports the first unmet one.

use crate::error::{CookbookError, Result, ValidationFailure};
use crate::recipe::{IngredientMeasurement, Instruction, RecipeEntity};

/// Accumulates a recipe across the steps of the creation wizard.
#[derive(Debug, Clone, Default)]
pub struct RecipeDraftBuilder {
    id: String,
    name: String,
    category: Option<String>,
    origin: Option<String>,
    instructions: Vec<Instruction>,
    picture: String,
    ingredients: Vec<IngredientMeasurement>,
    time: Option<String>,
    difficulty: Option<String>,
    price: Option<String>,
    url: Option<String>,
}

impl RecipeDraftBuilder {
    /// Create an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recipe id. Publishing assigns one from the repository.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Set the recipe name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Set or clear the category.
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
    }

    /// Set or clear the cuisine of origin.
    pub fn set_origin(&mut self, origin: Option<String>) {
        self.origin = origin;
    }

    /// Set the reference of the uploaded picture.
    pub fn set_picture_reference(&mut self, picture: impl Into<String>) {
        self.picture = picture.into();
    }

    /// Set or clear the total time.
    pub fn set_time(&mut self, time: Option<String>) {
        self.time = time;
    }

    /// Set or clear the difficulty.
    pub fn set_difficulty(&mut self, difficulty: Option<String>) {
        self.difficulty = difficulty;
    }

    /// Set or clear the price indication.
    pub fn set_price(&mut self, price: Option<String>) {
        self.price = price;
    }

    /// Set or clear the source URL.
    pub fn set_url(&mut self, url: Option<String>) {
        self.url = url;
    }

    /// Recipe id; empty until one is assigned.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Recipe name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category, if set.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Cuisine of origin, if set.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Picture reference; empty until set.
    pub fn picture_reference(&self) -> &str {
        &self.picture
    }

    /// Total time, if set.
    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    /// Difficulty, if set.
    pub fn difficulty(&self) -> Option<&str> {
        self.difficulty.as_deref()
    }

    /// Price indication, if set.
    pub fn price(&self) -> Option<&str> {
        self.price.as_deref()
    }

    /// Source URL, if set.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Append a step to the end of the instruction list.
    pub fn add_instruction(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Read the step at `index`.
    pub fn instruction(&self, index: usize) -> Result<&Instruction> {
        self.check_index(index)?;
        Ok(&self.instructions[index])
    }

    /// Replace the step at `index` in place.
    pub fn modify_instruction(&mut self, index: usize, instruction: Instruction) -> Result<()> {
        self.check_index(index)?;
        self.instructions[index] = instruction;
        Ok(())
    }

    /// Remove the step at `index`; later steps shift down by one.
    pub fn delete_instruction(&mut self, index: usize) -> Result<Instruction> {
        self.check_index(index)?;
        Ok(self.instructions.remove(index))
    }

    /// All steps in order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of steps.
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    /// Append an ingredient/measurement pair. Duplicates are allowed.
    pub fn add_ingredient_and_measurement(
        &mut self,
        ingredient: impl Into<String>,
        measurement: impl Into<String>,
    ) -> Result<()> {
        let pair = IngredientMeasurement::new(ingredient, measurement)?;
        self.ingredients.push(pair);
        Ok(())
    }

    /// Replace the first pair equal to `(old_ingredient, old_measurement)`.
    ///
    /// Returns whether a pair was replaced; no match is not an error. The
    /// replacement is validated even when nothing matches.
    pub fn update_ingredient_and_measurement(
        &mut self,
        old_ingredient: &str,
        old_measurement: &str,
        new_ingredient: impl Into<String>,
        new_measurement: impl Into<String>,
    ) -> Result<bool> {
        let replacement = IngredientMeasurement::new(new_ingredient, new_measurement)?;
        match self.find_ingredient(old_ingredient, old_measurement) {
            Some(position) => {
                self.ingredients[position] = replacement;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the first pair equal to `(ingredient, measurement)`.
    ///
    /// Returns whether a pair was removed.
    pub fn delete_ingredient_and_measurement(
        &mut self,
        ingredient: &str,
        measurement: &str,
    ) -> bool {
        match self.find_ingredient(ingredient, measurement) {
            Some(position) => {
                self.ingredients.remove(position);
                true
            }
            None => false,
        }
    }

    /// A copy of the ingredient list; changes to it do not reach the draft.
    pub fn ingredients_and_measurements(&self) -> Vec<IngredientMeasurement> {
        self.ingredients.clone()
    }

    /// Number of ingredient pairs.
    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    /// Returns true when nothing has been entered yet.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
            && self.name.is_empty()
            && self.category.is_none()
            && self.origin.is_none()
            && self.instructions.is_empty()
            && self.picture.is_empty()
            && self.ingredients.is_empty()
            && self.time.is_none()
            && self.difficulty.is_none()
            && self.price.is_none()
            && self.url.is_none()
    }

    /// Check the draft invariants without building.
    pub fn validate(&self) -> std::result::Result<(), ValidationFailure> {
        if self.name.trim().is_empty() {
            return Err(ValidationFailure::BlankName);
        }
        if self.instructions.is_empty() {
            return Err(ValidationFailure::NoInstructions);
        }
        if self.ingredients.is_empty() {
            return Err(ValidationFailure::NoIngredients);
        }
        if self.picture.trim().is_empty() {
            return Err(ValidationFailure::BlankPicture);
        }
        Ok(())
    }

    /// Snapshot the draft into a [`RecipeEntity`].
    ///
    /// The draft itself is left as is.
    pub fn build(&self) -> Result<RecipeEntity> {
        self.validate()?;

        Ok(RecipeEntity {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            origin: self.origin.clone(),
            instructions: self.instructions.clone(),
            picture: self.picture.clone(),
            ingredients: self.ingredients.clone(),
            time: self.time.clone(),
            difficulty: self.difficulty.clone(),
            price: self.price.clone(),
            url: self.url.clone(),
        })
    }

    /// Reset every field and empty both lists.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.instructions.len() {
            return Err(CookbookError::IndexOutOfRange {
                index,
                len: self.instructions.len(),
            });
        }
        Ok(())
    }

    fn find_ingredient(&self, ingredient: &str, measurement: &str) -> Option<usize> {
        self.ingredients
            .iter()
            .position(|pair| pair.matches(ingredient, measurement))
    }
}
