//! Error types for recipe construction, activation, and execution.

use thiserror::Error;

/// Errors from recipe operations.
///
/// Execution errors are deliberately cheap to construct: the engine turns
/// every one of them into a diagnostic and keeps going, so a faulty recipe
/// can never abort the unit it is visiting, let alone the round.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecipeError {
    /// A recipe faulted while visiting a node.
    #[error("recipe '{recipe}' failed: {message}")]
    Execution {
        /// Identifier of the faulting recipe.
        recipe: String,
        /// Description of the fault.
        message: String,
    },

    /// A recipe was constructed with invalid arguments.
    #[error("invalid arguments for recipe '{recipe}': {message}")]
    InvalidArguments {
        /// Identifier of the recipe being constructed.
        recipe: String,
        /// Description of the invalid argument.
        message: String,
    },

    /// No recipe with the requested identifier is registered.
    #[error("unknown recipe: '{name}'")]
    UnknownRecipe {
        /// The identifier that failed to resolve.
        name: String,
    },

    /// No style with the requested name is registered.
    #[error("unknown style: '{name}'")]
    UnknownStyle {
        /// The name that failed to resolve.
        name: String,
    },

    /// A recipe or style with the same identifier is already registered.
    #[error("'{name}' is already registered")]
    AlreadyRegistered {
        /// The duplicate identifier.
        name: String,
    },
}

impl RecipeError {
    /// Creates an execution fault.
    #[must_use]
    pub fn execution(recipe: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            recipe: recipe.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid-arguments error.
    #[must_use]
    pub fn invalid_arguments(recipe: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            recipe: recipe.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown-recipe error.
    #[must_use]
    pub fn unknown_recipe(name: impl Into<String>) -> Self {
        Self::UnknownRecipe { name: name.into() }
    }

    /// Creates an unknown-style error.
    #[must_use]
    pub fn unknown_style(name: impl Into<String>) -> Self {
        Self::UnknownStyle { name: name.into() }
    }

    /// Creates an already-registered error.
    #[must_use]
    pub fn already_registered(name: impl Into<String>) -> Self {
        Self::AlreadyRegistered { name: name.into() }
    }
}
