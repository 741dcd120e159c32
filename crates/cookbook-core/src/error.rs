//! Error types for recipe authoring.

use std::fmt;

use thiserror::Error;

/// A draft invariant that `build()` found unmet.
///
/// Checks run in declaration order and stop at the first failure, so only
/// one of these is ever reported per build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    /// The recipe name is empty or whitespace.
    BlankName,
    /// No instruction has been added.
    NoInstructions,
    /// No ingredient/measurement pair has been added.
    NoIngredients,
    /// The picture reference is empty or whitespace.
    BlankPicture,
}

impl ValidationFailure {
    /// Fixed, user-facing message for this failure.
    pub fn message(&self) -> &'static str {
        match self {
            ValidationFailure::BlankName => "Recipe name cannot be empty",
            ValidationFailure::NoInstructions => "Recipe must have at least one instruction",
            ValidationFailure::NoIngredients => "Recipe must have at least one ingredient",
            ValidationFailure::BlankPicture => "Recipe must have a picture",
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Main error type for Cookbook operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CookbookError {
    /// An instruction index fell outside the current list.
    #[error("Instruction index {index} out of range: valid range is 0..{len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A field value was rejected before reaching the draft.
    #[error("Invalid {field}: {message}")]
    IllegalArgument { field: &'static str, message: String },

    /// The draft failed its commit-time checks.
    #[error("Recipe validation failed: {0}")]
    Validation(ValidationFailure),

    /// The remote recipe repository reported a failure.
    #[error("Remote failure: {message}")]
    RemoteFailure { message: String },

    /// A selection-based operation ran with nothing selected.
    #[error("No instruction is selected")]
    NoInstructionSelected,

    /// A publish was requested while another is still unresolved.
    #[error("A publish is already in progress")]
    PublishInFlight,

    /// Publishing requires a running async runtime.
    #[error("No async runtime available to publish on")]
    RuntimeUnavailable,

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CookbookError {
    /// Returns true if the caller can fix the input and try again.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CookbookError::IndexOutOfRange { .. } => true,
            CookbookError::IllegalArgument { .. } => true,
            CookbookError::Validation(_) => true,
            CookbookError::RemoteFailure { .. } => true,
            CookbookError::NoInstructionSelected => true,
            CookbookError::PublishInFlight => true,
            _ => false,
        }
    }

    /// Shorthand for a blank-field rejection.
    pub fn blank(field: &'static str) -> Self {
        CookbookError::IllegalArgument {
            field,
            message: format!("{} cannot be blank", field),
        }
    }
}

/// Convenience Result type for Cookbook operations.
pub type Result<T> = std::result::Result<T, CookbookError>;

impl From<ValidationFailure> for CookbookError {
    fn from(failure: ValidationFailure) -> Self {
        CookbookError::Validation(failure)
    }
}

impl From<serde_json::Error> for CookbookError {
    fn from(err: serde_json::Error) -> Self {
        CookbookError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for CookbookError {
    fn from(err: toml::de::Error) -> Self {
        CookbookError::ConfigError(err.to_string())
    }
}
