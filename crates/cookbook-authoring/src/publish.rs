//! Publishing finished recipes to the repository.
//!
//! A publish attempt resolves exactly once: the status slot is written, one
//! of the caller's callbacks runs, and the returned [`PublishTicket`]
//! yields the same outcome. There are no retries and no timeout.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cookbook_core::{CookbookError, RecipeEntity, Result, ValidationFailure};
use cookbook_store::RecipeRepository;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::AuthoringConfig;
use crate::status::{PublishStatus, StatusSlot};

/// How a publish attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The repository accepted the recipe.
    Published { recipe_id: String },
    /// Validation or the repository rejected it; `message` is what the
    /// status slot shows.
    Failed { message: String },
}

impl PublishOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, PublishOutcome::Published { .. })
    }
}

/// Caller hooks for a publish attempt. At most one of them runs.
#[derive(Default)]
pub struct PublishCallbacks {
    on_success: Option<Box<dyn FnOnce() + Send + 'static>>,
    on_failure: Option<Box<dyn FnOnce(String) + Send + 'static>>,
}

impl PublishCallbacks {
    pub fn new(
        on_success: impl FnOnce() + Send + 'static,
        on_failure: impl FnOnce(String) + Send + 'static,
    ) -> Self {
        Self {
            on_success: Some(Box::new(on_success)),
            on_failure: Some(Box::new(on_failure)),
        }
    }

    /// No hooks; observe the status or the ticket instead.
    pub fn none() -> Self {
        Self::default()
    }

    fn succeed(self) {
        if let Some(on_success) = self.on_success {
            on_success();
        }
    }

    fn fail(self, message: &str) {
        if let Some(on_failure) = self.on_failure {
            on_failure(message.to_string());
        }
    }
}

/// Handle to a publish attempt.
///
/// Dropping it does not cancel the attempt.
pub struct PublishTicket {
    state: TicketState,
}

enum TicketState {
    Ready(PublishOutcome),
    Pending(JoinHandle<PublishOutcome>),
}

impl PublishTicket {
    /// A ticket for an attempt that resolved without going remote.
    pub fn ready(outcome: PublishOutcome) -> Self {
        Self {
            state: TicketState::Ready(outcome),
        }
    }

    /// Returns true while the repository has not answered.
    pub fn is_pending(&self) -> bool {
        match &self.state {
            TicketState::Ready(_) => false,
            TicketState::Pending(handle) => !handle.is_finished(),
        }
    }

    /// Wait for the attempt to resolve.
    pub async fn outcome(self) -> PublishOutcome {
        match self.state {
            TicketState::Ready(outcome) => outcome,
            TicketState::Pending(handle) => match handle.await {
                Ok(outcome) => outcome,
                Err(e) => PublishOutcome::Failed {
                    message: format!("Publish task ended abnormally: {}", e),
                },
            },
        }
    }
}

/// Decrements the in-flight counter when a publish task finishes, even if
/// the repository or a callback panics.
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Bridges the authoring session and the recipe repository.
pub struct PublishCoordinator {
    repository: Arc<dyn RecipeRepository>,
    status: StatusSlot,
    config: Arc<AuthoringConfig>,
    in_flight: Arc<AtomicUsize>,
}

impl PublishCoordinator {
    pub fn new(
        repository: Arc<dyn RecipeRepository>,
        status: StatusSlot,
        config: Arc<AuthoringConfig>,
    ) -> Self {
        Self {
            repository,
            status,
            config,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Ask the repository for a fresh recipe id.
    pub fn new_uid(&self) -> String {
        self.repository.new_uid()
    }

    /// Number of attempts waiting on the repository.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Resolve an attempt that failed validation. The repository is not
    /// contacted.
    pub fn reject(&self, failure: ValidationFailure, callbacks: PublishCallbacks) -> PublishTicket {
        let message = failure.message().to_string();
        info!(reason = %message, "Publish rejected by validation");

        self.status.set(PublishStatus::Failed(message.clone()));
        callbacks.fail(&message);

        PublishTicket::ready(PublishOutcome::Failed { message })
    }

    /// Hand a finished recipe to the repository on a background task and
    /// return immediately.
    pub fn dispatch(
        &self,
        recipe: RecipeEntity,
        callbacks: PublishCallbacks,
    ) -> Result<PublishTicket> {
        let runtime = Handle::try_current().map_err(|_| CookbookError::RuntimeUnavailable)?;

        let guard = InFlightGuard::enter(&self.in_flight);
        let repository = self.repository.clone();
        let status = self.status.clone();
        let config = self.config.clone();
        let recipe_id = recipe.id.clone();

        info!(recipe_id = %recipe_id, name = %recipe.name, "Publishing recipe");

        let handle = runtime.spawn(async move {
            let result = repository.add_recipe(recipe).await;

            // The attempt counts as in flight until its status is written and
            // its callback has returned.
            let outcome = match result {
                Ok(()) => {
                    info!(recipe_id = %recipe_id, "Recipe published");
                    status.set(PublishStatus::Succeeded(config.success_message.clone()));
                    callbacks.succeed();
                    PublishOutcome::Published { recipe_id }
                }
                Err(e) => {
                    let message = config.failure_message(&remote_detail(&e));
                    warn!(recipe_id = %recipe_id, error = %e, "Recipe publish failed");
                    status.set(PublishStatus::Failed(message.clone()));
                    callbacks.fail(&message);
                    PublishOutcome::Failed { message }
                }
            };
            drop(guard);
            outcome
        });

        Ok(PublishTicket {
            state: TicketState::Pending(handle),
        })
    }
}

/// The part of a repository error worth showing to the user.
fn remote_detail(err: &CookbookError) -> String {
    match err {
        CookbookError::RemoteFailure { message } => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cookbook_core::{Instruction, RecipeDraftBuilder};
    use cookbook_store::InMemoryRecipeRepository;
    use std::sync::Mutex;

    fn recipe(id: &str) -> RecipeEntity {
        let mut draft = RecipeDraftBuilder::new();
        draft.set_id(id);
        draft.set_name("Risotto");
        draft.add_instruction(Instruction::new("Stir", None, None).unwrap());
        draft.add_ingredient_and_measurement("Rice", "300g").unwrap();
        draft.set_picture_reference("risotto.jpg");
        draft.build().unwrap()
    }

    fn coordinator(repo: Arc<InMemoryRecipeRepository>) -> (PublishCoordinator, StatusSlot) {
        let status = StatusSlot::new();
        let coordinator =
            PublishCoordinator::new(repo, status.clone(), Arc::new(AuthoringConfig::default()));
        (coordinator, status)
    }

    #[tokio::test]
    async fn test_dispatch_success() {
        let repo = Arc::new(InMemoryRecipeRepository::new());
        let (coordinator, status) = coordinator(repo.clone());

        let ticket = coordinator.dispatch(recipe("r1"), PublishCallbacks::none()).unwrap();
        let outcome = ticket.outcome().await;

        assert_eq!(
            outcome,
            PublishOutcome::Published {
                recipe_id: "r1".to_string()
            }
        );
        assert_eq!(
            status.get(),
            PublishStatus::Succeeded("Recipe published successfully".to_string())
        );
        assert_eq!(coordinator.in_flight(), 0);
        assert!(repo.get("r1").await.is_some());
    }

    #[tokio::test]
    async fn test_dispatch_failure_wraps_message() {
        let repo = Arc::new(InMemoryRecipeRepository::failing("Network error"));
        let (coordinator, status) = coordinator(repo);

        let outcome = coordinator
            .dispatch(recipe("r1"), PublishCallbacks::none())
            .unwrap()
            .outcome()
            .await;

        let expected = "Failed to publish recipe: Network error".to_string();
        assert_eq!(outcome, PublishOutcome::Failed { message: expected.clone() });
        assert_eq!(status.get(), PublishStatus::Failed(expected));
    }

    #[tokio::test]
    async fn test_exactly_one_callback_runs() {
        let repo = Arc::new(InMemoryRecipeRepository::failing("offline"));
        let (coordinator, _status) = coordinator(repo);

        let log = Arc::new(Mutex::new(Vec::new()));
        let success_log = log.clone();
        let failure_log = log.clone();
        let callbacks = PublishCallbacks::new(
            move || success_log.lock().unwrap().push("success".to_string()),
            move |message| failure_log.lock().unwrap().push(message),
        );

        coordinator.dispatch(recipe("r1"), callbacks).unwrap().outcome().await;

        let entries = log.lock().unwrap().clone();
        assert_eq!(entries, vec!["Failed to publish recipe: offline".to_string()]);
    }

    #[tokio::test]
    async fn test_reject_skips_repository() {
        let repo = Arc::new(InMemoryRecipeRepository::new());
        let (coordinator, status) = coordinator(repo.clone());

        let ticket = coordinator.reject(ValidationFailure::NoIngredients, PublishCallbacks::none());
        assert!(!ticket.is_pending());

        let outcome = ticket.outcome().await;
        assert!(!outcome.is_published());
        assert_eq!(status.get().message(), Some("Recipe must have at least one ingredient"));
        assert_eq!(repo.add_calls(), 0);
    }

    #[test]
    fn test_dispatch_without_runtime() {
        let repo = Arc::new(InMemoryRecipeRepository::new());
        let (coordinator, status) = coordinator(repo.clone());

        let result = coordinator.dispatch(recipe("r1"), PublishCallbacks::none());
        assert!(matches!(result, Err(CookbookError::RuntimeUnavailable)));
        assert!(status.get().is_idle());
        assert_eq!(coordinator.in_flight(), 0);
        assert_eq!(repo.add_calls(), 0);
    }
}
