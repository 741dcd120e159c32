//! # Cookbook Authoring
//!
//! The recipe creation session: draft orchestration and publishing.
//!
//! - [`DraftOrchestrator`] - per-wizard session state
//! - [`PublishCoordinator`] - async hand-off to the recipe repository
//! - [`PublishStatus`] - single-slot publish outcome observable

pub mod config;
pub mod orchestrator;
pub mod publish;
pub mod status;

pub use config::{AuthoringConfig, PublishPolicy};
pub use orchestrator::DraftOrchestrator;
pub use publish::{PublishCallbacks, PublishCoordinator, PublishOutcome, PublishTicket};
pub use status::{PublishStatus, StatusSlot};
