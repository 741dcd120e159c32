//! Recipe authoring session.
//!
//! One [`DraftOrchestrator`] lives for as long as the creation wizard is
//! open. Screens call its update operations as the user moves through the
//! wizard steps, and finally `publish_recipe`.
//!
//! # Instruction selection
//!
//! The selected instruction is a position, checked only when it is used.
//! Deleting through the session keeps it pointing at the same step:
//! deleting the selected step clears the selection, deleting an earlier
//! step moves it down by one.

use std::sync::Arc;

use cookbook_core::{
    CookbookError, IngredientMeasurement, Instruction, RecipeDraftBuilder, Result,
};
use cookbook_store::RecipeRepository;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info};

use crate::config::{AuthoringConfig, PublishPolicy};
use crate::publish::{PublishCallbacks, PublishCoordinator, PublishTicket};
use crate::status::{PublishStatus, StatusSlot};

/// Authoring session state for one recipe.
pub struct DraftOrchestrator {
    /// The recipe being written.
    draft: RecipeDraftBuilder,

    /// Instruction currently open for editing.
    selected: Option<usize>,

    /// Outcome of the latest publish attempt.
    status: StatusSlot,

    coordinator: PublishCoordinator,

    config: Arc<AuthoringConfig>,
}

impl DraftOrchestrator {
    /// Start a session with default configuration.
    pub fn new(repository: Arc<dyn RecipeRepository>) -> Self {
        Self::with_config(repository, AuthoringConfig::default())
    }

    /// Start a session with the given configuration.
    pub fn with_config(repository: Arc<dyn RecipeRepository>, config: AuthoringConfig) -> Self {
        let config = Arc::new(config);
        let status = StatusSlot::new();
        let coordinator = PublishCoordinator::new(repository, status.clone(), config.clone());

        debug!(policy = ?config.publish_policy, "Authoring session started");

        Self {
            draft: RecipeDraftBuilder::new(),
            selected: None,
            status,
            coordinator,
            config,
        }
    }

    /// Read access to the draft.
    pub fn draft(&self) -> &RecipeDraftBuilder {
        &self.draft
    }

    /// Configuration the session was started with.
    pub fn config(&self) -> &AuthoringConfig {
        &self.config
    }

    /// Set the recipe name. Blank names are rejected.
    pub fn update_recipe_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CookbookError::blank("name"));
        }
        self.draft.set_name(name);
        Ok(())
    }

    /// Set or clear the category.
    pub fn update_recipe_category(&mut self, category: Option<String>) {
        self.draft.set_category(category);
    }

    /// Set or clear the cuisine of origin.
    pub fn update_recipe_origin(&mut self, origin: Option<String>) {
        self.draft.set_origin(origin);
    }

    /// Set the picture reference returned by the image upload.
    pub fn update_recipe_picture(&mut self, picture: impl Into<String>) {
        self.draft.set_picture_reference(picture);
    }

    /// Set or clear the total time.
    pub fn update_recipe_time(&mut self, time: Option<String>) {
        self.draft.set_time(time);
    }

    /// Set or clear the difficulty.
    pub fn update_recipe_difficulty(&mut self, difficulty: Option<String>) {
        self.draft.set_difficulty(difficulty);
    }

    /// Set or clear the price indication.
    pub fn update_recipe_price(&mut self, price: Option<String>) {
        self.draft.set_price(price);
    }

    /// Set or clear the source URL.
    pub fn update_recipe_url(&mut self, url: Option<String>) {
        self.draft.set_url(url);
    }

    /// Append a step.
    pub fn add_recipe_instruction(&mut self, instruction: Instruction) {
        self.draft.add_instruction(instruction);
    }

    /// All steps in order.
    pub fn instructions(&self) -> &[Instruction] {
        self.draft.instructions()
    }

    /// The step at `index`.
    pub fn instruction(&self, index: usize) -> Result<&Instruction> {
        self.draft.instruction(index)
    }

    /// Replace the step at `index`. The selection is unaffected.
    pub fn modify_instruction(&mut self, index: usize, instruction: Instruction) -> Result<()> {
        self.draft.modify_instruction(index, instruction)
    }

    /// Remove the step at `index`, keeping the selection on the same step.
    pub fn delete_instruction(&mut self, index: usize) -> Result<Instruction> {
        let removed = self.draft.delete_instruction(index)?;

        match self.selected {
            Some(selected) if selected == index => {
                debug!(index, "Selected instruction deleted, clearing selection");
                self.selected = None;
            }
            Some(selected) if selected > index => {
                self.selected = Some(selected - 1);
            }
            _ => {}
        }

        Ok(removed)
    }

    /// Mark the step at `index` as being edited. Not bounds-checked here.
    pub fn select_instruction(&mut self, index: usize) {
        self.selected = Some(index);
    }

    /// Index of the selected step, if any. May be out of range.
    pub fn selected_instruction_index(&self) -> Option<usize> {
        self.selected
    }

    /// Deselect the current step.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The step currently selected for editing.
    pub fn selected_instruction(&self) -> Result<&Instruction> {
        let index = self.selected.ok_or(CookbookError::NoInstructionSelected)?;
        self.draft.instruction(index)
    }

    /// Replace the selected step.
    pub fn modify_selected_instruction(&mut self, instruction: Instruction) -> Result<()> {
        let index = self.selected.ok_or(CookbookError::NoInstructionSelected)?;
        self.draft.modify_instruction(index, instruction)
    }

    /// Remove the selected step. The selection is cleared.
    pub fn delete_selected_instruction(&mut self) -> Result<Instruction> {
        let index = self.selected.ok_or(CookbookError::NoInstructionSelected)?;
        self.delete_instruction(index)
    }

    /// Append an ingredient. Blank fields are rejected before the draft is
    /// touched.
    pub fn add_ingredient_and_measurement(
        &mut self,
        ingredient: impl Into<String>,
        measurement: impl Into<String>,
    ) -> Result<()> {
        self.draft.add_ingredient_and_measurement(ingredient, measurement)
    }

    /// Replace the first matching pair. Returns whether one was replaced.
    pub fn update_ingredient_and_measurement(
        &mut self,
        old_ingredient: &str,
        old_measurement: &str,
        new_ingredient: impl Into<String>,
        new_measurement: impl Into<String>,
    ) -> Result<bool> {
        self.draft.update_ingredient_and_measurement(
            old_ingredient,
            old_measurement,
            new_ingredient,
            new_measurement,
        )
    }

    /// Remove the first matching pair. Returns whether one was removed.
    pub fn delete_ingredient_and_measurement(
        &mut self,
        ingredient: &str,
        measurement: &str,
    ) -> bool {
        self.draft.delete_ingredient_and_measurement(ingredient, measurement)
    }

    /// Copy of the ingredient list.
    pub fn ingredients_and_measurements(&self) -> Vec<IngredientMeasurement> {
        self.draft.ingredients_and_measurements()
    }

    /// Publish the draft without caller callbacks.
    ///
    /// See [`publish_recipe_with`](Self::publish_recipe_with).
    pub fn publish_recipe(&mut self) -> Result<PublishTicket> {
        self.publish(PublishCallbacks::none())
    }

    /// Publish the draft.
    ///
    /// Assigns a fresh id, validates, and hands the recipe to the repository
    /// on a background task. Validation and repository failures never come
    /// back as `Err`: they land in the publish status and in `on_failure`.
    /// `Err` is reserved for attempts that could not start at all.
    ///
    /// The callback runs before the attempt stops counting as in flight, so
    /// publishing again from inside it is refused under `RejectWhilePending`.
    pub fn publish_recipe_with(
        &mut self,
        on_success: impl FnOnce() + Send + 'static,
        on_failure: impl FnOnce(String) + Send + 'static,
    ) -> Result<PublishTicket> {
        self.publish(PublishCallbacks::new(on_success, on_failure))
    }

    fn publish(&mut self, callbacks: PublishCallbacks) -> Result<PublishTicket> {
        if self.config.publish_policy == PublishPolicy::RejectWhilePending
            && self.coordinator.in_flight() > 0
        {
            return Err(CookbookError::PublishInFlight);
        }

        let id = self.coordinator.new_uid();
        self.draft.set_id(id);

        match self.draft.build() {
            Ok(recipe) => self.coordinator.dispatch(recipe, callbacks),
            Err(CookbookError::Validation(failure)) => {
                Ok(self.coordinator.reject(failure, callbacks))
            }
            Err(e) => Err(e),
        }
    }

    /// Returns true while a publish attempt awaits the repository.
    pub fn is_publishing(&self) -> bool {
        self.coordinator.in_flight() > 0
    }

    /// Current publish status.
    pub fn publish_status(&self) -> PublishStatus {
        self.status.get()
    }

    /// Observe publish status changes.
    pub fn subscribe_status(&self) -> watch::Receiver<PublishStatus> {
        self.status.subscribe()
    }

    /// Publish status changes as a stream.
    pub fn status_stream(&self) -> WatchStream<PublishStatus> {
        self.status.stream()
    }

    /// Reset the status to idle. The draft is left alone.
    pub fn clear_publish_error(&mut self) {
        self.status.clear();
    }

    /// Throw the draft away, as when the wizard is cancelled.
    ///
    /// An attempt still waiting on the repository is not cancelled and will
    /// write its status when it resolves.
    pub fn discard(&mut self) {
        info!(recipe_id = %self.draft.id(), "Discarding recipe draft");
        self.draft.clear();
        self.selected = None;
        self.status.clear();
    }
}
